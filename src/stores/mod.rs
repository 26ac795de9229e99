//! Contains traits for objects that store the domain [models](crate::models)
//! and their implementations for a SQLite [Connection](rusqlite::Connection).
//!
//! The traits are implemented directly on the connection so that the same
//! code runs against a plain connection or inside a SQL transaction
//! (`&*transaction` derefs to a connection).

mod balance;
mod plan;
mod subscription;
mod transaction;
mod transfer;
mod user;

pub use balance::BalanceStore;
pub use plan::PlanStore;
pub use subscription::SubscriptionStore;
pub use transaction::TransactionStore;
pub use transfer::TransferStore;
pub use user::UserStore;
