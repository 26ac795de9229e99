//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::{build_log_in_redirect_url, build_log_in_redirect_url_from_target},
    },
    endpoints,
    models::User,
    stores::UserStore,
    timezone::get_local_offset,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Amman".
    pub local_timezone: String,
    /// The database the logged in user is loaded from.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AuthState {
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
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

fn load_user(state: &AuthState, jar: &PrivateCookieJar) -> Result<User, Error> {
    let token = get_token_from_cookies(jar)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    connection.get_user(token.user_id)
}

/// Middleware function that checks for a valid authorization cookie.
///
/// The logged in [User] is placed into the request and the request executed
/// normally if the cookie is valid, otherwise a redirect to the log-in page
/// is returned. The log-in URL carries the requested page as `next`.
///
/// Each authenticated request pushes the session expiry out to at least
/// the configured cookie duration from now.
///
/// **Note**: Route handlers can use the function argument `Extension(user): Extension<User>` to receive the user.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let log_in_redirect_url = build_log_in_redirect_url(&request).unwrap_or_else(|| {
        tracing::warn!("Invalid redirect URL from request URI. Falling back to dashboard.");

        build_log_in_redirect_url_from_target(endpoints::DASHBOARD)
            .unwrap_or_else(|| endpoints::LOG_IN.to_owned())
    });
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Error getting local timezone. Redirecting to log in page.");
        return Redirect::to(&log_in_redirect_url).into_response();
    };

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to log in page.");
            return Redirect::to(&log_in_redirect_url).into_response();
        }
    };

    let user = match load_user(&state, &jar) {
        Ok(user) => user,
        Err(Error::DatabaseLockError) => return Error::DatabaseLockError.into_response(),
        Err(error) => {
            tracing::debug!("Rejected session: {error}. Redirecting to log in page.");
            return Redirect::to(&log_in_redirect_url).into_response();
        }
    };

    parts.extensions.insert(user);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(
        jar.clone(),
        state.cookie_duration,
        local_offset,
    ) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending cookie duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}
