//! Runtime settings for the application.

use time::Duration;

use crate::auth::DEFAULT_COOKIE_DURATION;

/// The timezone used to display dates when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Asia/Amman";

/// Settings passed to [AppState::new](crate::AppState::new) at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The secret the private cookie key is derived from.
    pub cookie_secret: String,

    /// The canonical name of the timezone dates are shown in, e.g. "Asia/Amman".
    pub local_timezone: String,

    /// How long a session lasts without activity when "remember me" is not ticked.
    pub cookie_duration: Duration,

    /// Whether subscriptions must invest at least the plan's minimum amount.
    ///
    /// When `false`, only the wallet balance limits how much can be invested.
    pub enforce_plan_minimum: bool,
}

impl AppConfig {
    /// Create a config with the default timezone, session length and plan
    /// minimum check.
    pub fn new(cookie_secret: &str) -> Self {
        Self {
            cookie_secret: cookie_secret.to_owned(),
            local_timezone: DEFAULT_TIMEZONE.to_owned(),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            enforce_plan_minimum: true,
        }
    }
}

#[cfg(test)]
mod app_config_tests {
    use time::Duration;

    use super::AppConfig;

    #[test]
    fn defaults() {
        let config = AppConfig::new("secret");

        assert_eq!(config.local_timezone, "Asia/Amman");
        assert_eq!(config.cookie_duration, Duration::minutes(5));
        assert!(config.enforce_plan_minimum);
    }
}
