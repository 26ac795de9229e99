//! This module defines the domain data types.

pub use password::{PasswordHash, ValidatedPassword};
pub use plan::{InvestmentPlan, NewPlan, PlanError, PlanId};
pub use status::Status;
pub use subscription::{NewSubscription, Subscription, SubscriptionDetails, SubscriptionId};
pub use transaction::{
    NewTransaction, PaymentMethod, Transaction, TransactionDetails, TransactionId,
    TransactionType,
};
pub use transfer::{NewTransfer, Transfer, TransferDetails, TransferId};
pub use user::{NewUser, User, UserID, Username, UsernameError};

mod password;
mod plan;
mod status;
mod subscription;
mod transaction;
mod transfer;
mod user;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;

/// A stored enum column held a value that does not match any variant.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Implements `ToSql` and `FromSql` for a fieldless enum that has `as_str`
/// and a `FromStr` impl returning [UnknownVariant].
macro_rules! impl_text_column {
    ($type:ty) => {
        impl rusqlite::types::ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $type {
            fn column_result(
                value: rusqlite::types::ValueRef<'_>,
            ) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|error| rusqlite::types::FromSqlError::Other(Box::new(error)))
            }
        }
    };
}

pub(crate) use impl_text_column;
