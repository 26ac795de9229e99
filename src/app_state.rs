//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{AppConfig, Error, db::initialize, timezone::get_local_offset};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Amman".
    pub local_timezone: String,

    /// Whether subscriptions must invest at least the plan's minimum amount.
    pub enforce_plan_minimum: bool,

    /// The database connection.
    ///
    /// Handlers that check a balance and then write hold the lock for both steps.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or
    /// `config.local_timezone` is not a valid, canonical timezone name.
    pub fn new(db_connection: Connection, config: &AppConfig) -> Result<Self, Error> {
        if get_local_offset(&config.local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(config.local_timezone.clone()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(&config.cookie_secret),
            cookie_duration: config.cookie_duration,
            local_timezone: config.local_timezone.clone(),
            enforce_plan_minimum: config.enforce_plan_minimum,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use crate::{AppConfig, Error};

    use super::{AppState, create_cookie_key};

    #[test]
    fn new_rejects_unknown_timezone() {
        let config = AppConfig {
            local_timezone: "Middle/Earth".to_owned(),
            ..AppConfig::new("secret")
        };

        let result = AppState::new(Connection::open_in_memory().unwrap(), &config);

        assert_eq!(
            result.err(),
            Some(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }

    #[test]
    fn new_copies_config() {
        let config = AppConfig {
            enforce_plan_minimum: false,
            ..AppConfig::new("secret")
        };

        let state = AppState::new(Connection::open_in_memory().unwrap(), &config).unwrap();

        assert!(!state.enforce_plan_minimum);
        assert_eq!(state.local_timezone, "Asia/Amman");
        assert_eq!(
            state.cookie_key.master(),
            create_cookie_key("secret").master()
        );
    }
}
