//! Deposit and withdrawal requests.

use std::{fmt::Display, str::FromStr};

use time::OffsetDateTime;

use crate::{
    models::{DatabaseID, Status, UnknownVariant, UserID, Username, impl_text_column},
    money::Money,
};

/// The ID of a [Transaction].
pub type TransactionId = DatabaseID;

/// Whether money is coming into or leaving the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// Money paid into the wallet.
    Deposit,
    /// Money paid out of the wallet.
    Withdrawal,
}

impl TransactionType {
    /// Every type, in the order they are offered in forms.
    pub const ALL: [TransactionType; 2] = [TransactionType::Deposit, TransactionType::Withdrawal];

    /// The value stored in the database and submitted by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }

    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "إيداع",
            TransactionType::Withdrawal => "سحب",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            other => Err(UnknownVariant::new("transaction type", other)),
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl_text_column!(TransactionType);

/// How the money is paid in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    /// A bank transfer.
    Bank,
    /// A PayPal payment.
    Paypal,
    /// A payment made by scanning a QR code.
    QrCode,
    /// Cash handed over in person.
    Cash,
}

impl PaymentMethod {
    /// Every method, in the order they are offered in forms.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Bank,
        PaymentMethod::Paypal,
        PaymentMethod::QrCode,
        PaymentMethod::Cash,
    ];

    /// The value stored in the database and submitted by forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Bank => "bank",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::QrCode => "qrcode",
            PaymentMethod::Cash => "cash",
        }
    }

    /// The label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Bank => "تحويل بنكي",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::QrCode => "QR Code",
            PaymentMethod::Cash => "نقدي",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(PaymentMethod::Bank),
            "paypal" => Ok(PaymentMethod::Paypal),
            "qrcode" => Ok(PaymentMethod::QrCode),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(UnknownVariant::new("payment method", other)),
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl_text_column!(PaymentMethod);

/// A recorded deposit or withdrawal request.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user who made the request.
    pub user_id: UserID,
    /// Whether money is paid in or out.
    pub transaction_type: TransactionType,
    /// How much is paid in or out.
    pub amount: Money,
    /// How the money is paid.
    pub method: PaymentMethod,
    /// When the request was made, in UTC.
    pub created_at: OffsetDateTime,
    /// Where the request is in its processing.
    pub status: Status,
}

/// A deposit or withdrawal request that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The user making the request.
    pub user_id: UserID,
    /// Whether money is paid in or out.
    pub transaction_type: TransactionType,
    /// How much is paid in or out.
    pub amount: Money,
    /// How the money is paid.
    pub method: PaymentMethod,
}

/// A transaction together with the name of the user who requested it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDetails {
    /// The stored transaction.
    pub transaction: Transaction,
    /// The name of the user who made the request.
    pub username: Username,
}
