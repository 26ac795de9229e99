//! Log-out route handler that invalidates authentication cookies and redirects users.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and redirect the client to the landing page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::ROOT)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{body::Body, http::Response, http::header::SET_COOKIE};
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        auth::cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, set_auth_cookie},
        endpoints,
        models::UserID,
        test_utils::assert_redirect,
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie_and_redirects() {
        let cookie_jar = set_auth_cookie(
            get_jar(),
            UserID::new(123),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let response = get_log_out(cookie_jar).await;

        assert_redirect(&response, endpoints::ROOT);
        assert_cookie_expired(&response);
    }

    fn get_jar() -> PrivateCookieJar {
        let key = Key::from(&Sha512::digest("42"));
        PrivateCookieJar::new(key)
    }

    #[track_caller]
    fn assert_cookie_expired(response: &Response<Body>) {
        let cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|header| Cookie::parse(header.to_str().ok()?.to_owned()).ok())
            .find(|cookie| cookie.name() == COOKIE_TOKEN)
            .expect("No token cookie set");

        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }
}
