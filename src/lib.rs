//! Dinar Wallet is a web app for a small investment platform and e-wallet in
//! Jordanian dinar.
//!
//! Users register, request deposits and withdrawals, subscribe to fixed-term
//! investment plans and transfer wallet balance to each other. The library
//! serves server-rendered Arabic HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod admin;
mod app_state;
mod auth;
mod config;
mod dashboard;
pub mod db;
mod endpoints;
mod html;
mod index;
mod internal_server_error;
mod logging;
pub mod models;
pub mod money;
mod navigation;
mod not_found;
mod routing;
pub mod stores;
mod subscription;
mod timezone;
mod transaction;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::AppConfig;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use models::{PasswordHash, ValidatedPassword};
pub use routing::build_router;

use crate::{
    internal_server_error::InternalServerError,
    not_found::{get_403_forbidden_response, get_404_not_found_response},
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Validation problems with user input are not errors of this type: they are
/// shown next to the form field that caused them.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password do not match a registered user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// The auth cookie could not be read as a token.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The auth cookie is past its expiry date.
    #[error("the session has expired")]
    SessionExpired,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The username is already taken by another user.
    #[error("the username already exists in the database")]
    DuplicateUsername,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user is logged in but may not see the requested page.
    #[error("the user does not have permission to view this page")]
    Forbidden,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Forbidden => get_403_forbidden_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "إعدادات المنطقة الزمنية غير صالحة",
                fix: &format!(
                    "تعذر تحديد المنطقة الزمنية \"{timezone}\". تحقق من إعدادات الخادم واستخدم \
                    اسماً معيارياً مثل Asia/Amman."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use super::Error;

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn unique_username_violation_is_duplicate_username() {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute("CREATE TABLE user (username TEXT UNIQUE NOT NULL)", ())
            .unwrap();
        connection
            .execute("INSERT INTO user (username) VALUES ('layla')", ())
            .unwrap();

        let error = connection
            .execute("INSERT INTO user (username) VALUES ('layla')", ())
            .unwrap_err();

        assert_eq!(Error::from(error), Error::DuplicateUsername);
    }

    #[test]
    fn error_responses_have_matching_status_codes() {
        assert_eq!(
            Error::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            Error::DatabaseLockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::InvalidTimezoneError("Mars/Olympus".to_owned())
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
