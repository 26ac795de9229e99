//! Deposit and withdrawal requests.
//!
//! A request is recorded as a pending [Transaction](crate::models::Transaction)
//! and counts toward the wallet balance straight away. Nothing in the app
//! moves a request out of the pending state.

mod page;

pub use page::{create_transaction_endpoint, get_transaction_page};
