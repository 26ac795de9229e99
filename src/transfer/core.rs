//! The rules a transfer between two wallets has to pass.

use crate::{
    Error,
    models::{NewTransfer, TransferDetails, User},
    money::Money,
    stores::{BalanceStore, TransferStore, UserStore},
};

/// Reasons a transfer is refused.
///
/// The `Display` text is shown to the user on the transfer form.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TransferError {
    /// No user has the receiver's username.
    #[error("المستخدم المستقبل غير موجود.")]
    ReceiverNotFound,

    /// The sender named themselves as the receiver.
    #[error("لا يمكنك تحويل رصيد لنفسك.")]
    SelfTransfer,

    /// The amount is more than the sender's wallet balance.
    #[error("رصيدك لا يكفي لإتمام التحويل.")]
    InsufficientFunds,

    /// A database or lock error.
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Move `amount` from `sender`'s wallet to the wallet of the user called
/// `receiver_username`.
///
/// Checked in order: the receiver exists, the receiver is not the sender,
/// and the sender's balance covers the amount. Run inside a SQL transaction
/// while holding the connection lock so that the balance check and the
/// insert cannot interleave with another request.
///
/// # Errors
///
/// Returns the first [TransferError] that applies.
pub fn transfer_funds<S>(
    store: &S,
    sender: &User,
    receiver_username: &str,
    amount: Money,
) -> Result<TransferDetails, TransferError>
where
    S: UserStore + BalanceStore + TransferStore,
{
    let receiver = match store.get_user_by_username(receiver_username.trim()) {
        Ok(receiver) => receiver,
        Err(Error::NotFound) => return Err(TransferError::ReceiverNotFound),
        Err(error) => return Err(error.into()),
    };

    if receiver.id == sender.id {
        return Err(TransferError::SelfTransfer);
    }

    if amount > store.wallet_balance(sender.id)? {
        return Err(TransferError::InsufficientFunds);
    }

    let transfer = store.create_transfer(NewTransfer {
        sender_id: sender.id,
        receiver_id: receiver.id,
        amount,
    })?;

    Ok(TransferDetails {
        transfer,
        sender_username: sender.username.clone(),
        receiver_username: receiver.username,
    })
}

#[cfg(test)]
mod transfer_funds_tests {
    use rusqlite::Connection;

    use crate::{
        models::{NewTransaction, PaymentMethod, Status, TransactionType, User},
        money::Money,
        stores::{
            BalanceStore, TransactionStore, TransferStore,
            test_utils::{get_test_connection, insert_test_user},
        },
    };

    use super::{TransferError, transfer_funds};

    fn setup(sender_balance: Money) -> (Connection, User, User) {
        let connection = get_test_connection();
        let sender = insert_test_user(&connection, "layla");
        let receiver = insert_test_user(&connection, "omar");

        connection
            .create_transaction(NewTransaction {
                user_id: sender.id,
                transaction_type: TransactionType::Deposit,
                amount: sender_balance,
                method: PaymentMethod::Cash,
            })
            .unwrap();

        (connection, sender, receiver)
    }

    #[test]
    fn transfer_moves_balance_between_wallets() {
        let (connection, sender, receiver) = setup(Money::from_dinar(100));

        let details =
            transfer_funds(&connection, &sender, "omar", Money::from_minor_units(3550)).unwrap();

        assert_eq!(details.transfer.status, Status::Completed);
        assert_eq!(details.receiver_username.as_ref(), "omar");
        assert_eq!(
            connection.wallet_balance(sender.id).unwrap(),
            Money::from_minor_units(6450)
        );
        assert_eq!(
            connection.wallet_balance(receiver.id).unwrap(),
            Money::from_minor_units(3550)
        );
    }

    #[test]
    fn unknown_receiver_is_rejected() {
        let (connection, sender, _) = setup(Money::from_dinar(100));

        let result = transfer_funds(&connection, &sender, "nobody", Money::from_dinar(1));

        assert_eq!(result, Err(TransferError::ReceiverNotFound));
    }

    #[test]
    fn self_transfer_is_rejected() {
        let (connection, sender, _) = setup(Money::from_dinar(100));

        let result = transfer_funds(&connection, &sender, "layla", Money::from_dinar(1));

        assert_eq!(result, Err(TransferError::SelfTransfer));
    }

    #[test]
    fn self_transfer_is_rejected_before_balance_check() {
        let (connection, sender, _) = setup(Money::from_dinar(1));

        let result = transfer_funds(&connection, &sender, "layla", Money::from_dinar(1000));

        assert_eq!(result, Err(TransferError::SelfTransfer));
    }

    #[test]
    fn amount_above_balance_is_rejected() {
        let (connection, sender, receiver) = setup(Money::from_dinar(100));

        let result = transfer_funds(
            &connection,
            &sender,
            "omar",
            Money::from_minor_units(10001),
        );

        assert_eq!(result, Err(TransferError::InsufficientFunds));
        assert!(connection.get_sent_transfers(sender.id).unwrap().is_empty());
        assert_eq!(
            connection.wallet_balance(receiver.id).unwrap(),
            Money::ZERO
        );
    }

    #[test]
    fn whole_balance_can_be_sent() {
        let (connection, sender, _) = setup(Money::from_dinar(100));

        transfer_funds(&connection, &sender, "omar", Money::from_dinar(100)).unwrap();

        assert_eq!(connection.wallet_balance(sender.id).unwrap(), Money::ZERO);
    }
}
