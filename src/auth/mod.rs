//! Registration, log-in and the cookie based sessions that protect the wallet pages.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod token;

pub(crate) use cookie::DEFAULT_COOKIE_DURATION;
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::auth_guard;
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub(crate) use cookie::{COOKIE_TOKEN, set_auth_cookie};
