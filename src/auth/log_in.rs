//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{cookie::set_auth_cookie, redirect::normalize_redirect_url},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, base, error_alert, form_card, password_input, text_input},
    models::User,
    stores::UserStore,
    timezone::get_local_offset,
};

/// How long the auth cookie should last if the user selects "remember me" at log-in.
pub(crate) const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// Shown for an unknown username and for a wrong password alike.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "يرجى إدخال اسم مستخدم وكلمة مرور صحيحين.";

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Amman".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

fn log_in_view(username: &str, error_message: Option<&str>, next: Option<&str>) -> Markup {
    let form = html! {
        @if let Some(error_message) = error_message {
            (error_alert(error_message))
        }

        form action=(endpoints::LOG_IN) method="post"
        {
            @if let Some(next) = next {
                input type="hidden" name="next" value=(next);
            }

            (text_input("اسم المستخدم", "username", "text", username, None))
            (password_input(None))

            div class="form-check mb-3"
            {
                input type="checkbox" name="remember_me" id="remember_me" class="form-check-input";
                label for="remember_me" class="form-check-label" { "تذكرني لمدة أسبوع" }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "تسجيل الدخول" }
        }

        p class="mt-3 mb-0 text-center"
        {
            "ليس لديك حساب؟ "
            a href=(endpoints::REGISTER) { "أنشئ حساباً" }
        }
    };

    base("تسجيل الدخول", &form_card("تسجيل الدخول", &form))
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<NextQuery>) -> Response {
    let next = parse_redirect_url(query.next.as_deref(), "log-in query");

    log_in_view("", None, next.as_deref()).into_response()
}

/// The raw data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password hash in the database.
#[derive(Clone, Deserialize)]
pub struct LogInForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set.
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value.
    pub remember_me: Option<String>,

    /// Where to go after logging in, see [normalize_redirect_url].
    pub next: Option<String>,
}

fn verify_credentials(state: &LogInState, form: &LogInForm) -> Result<User, Error> {
    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match connection.get_user_by_username(form.username.trim()) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    match user.password_hash.verify(&form.password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to `next` or the dashboard. Otherwise, the page is shown again
/// with an error message.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let next = parse_redirect_url(form.next.as_deref(), "log-in form");

    let user = match verify_credentials(&state, &form) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("Failed log-in attempt for username {:?}", form.username);
            return log_in_view(
                &form.username,
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                next.as_deref(),
            )
            .into_response();
        }
        Err(error) => return error.into_response(),
    };

    let cookie_duration = if form.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone).into_response();
    };

    match set_auth_cookie(jar, user.id, cookie_duration, local_offset) {
        Ok(jar) => {
            let redirect_url = next.as_deref().unwrap_or(endpoints::DASHBOARD);
            (jar, Redirect::to(redirect_url)).into_response()
        }
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            error.into_response()
        }
    }
}
