//! Investing wallet balance in a plan.

mod core;
mod page;

pub use core::{SubscriptionError, subscribe_to_plan};
pub use page::{get_subscribe_page, post_subscribe};
