//! Sending wallet balance to another user.

mod core;
mod page;

pub use core::{TransferError, transfer_funds};
pub use page::{get_transfer_page, post_transfer};
