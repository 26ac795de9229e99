//! Defines functions for handling user authentication with cookies.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::token::Token, models::UserID};

/// The name of the cookie holding the session [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// How long a session lasts without activity.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn build_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .expires(expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// The session expires `duration` from now. The expiry is recorded in
/// `local_offset` so that it reads naturally when inspected.
///
/// # Errors
///
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = (OffsetDateTime::now_utc() + duration).to_offset(local_offset);
    let token = Token {
        user_id,
        expires_at,
    };
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(build_cookie(token_string, expires_at)))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the session token from `jar`.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no auth cookie,
/// - [Error::InvalidToken] if the cookie does not hold a token,
/// - [Error::SessionExpired] if the token's expiry has passed.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::InvalidToken(error.to_string()))?;

    if token.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::SessionExpired);
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the later of now plus
/// `duration` and the current expiry.
///
/// A "remember me" session is therefore never shortened by activity.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
/// Returns the errors of [get_token_from_cookies] and [set_auth_cookie].
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let expires_at = max(token.expires_at, OffsetDateTime::now_utc() + duration);
    let remaining = expires_at - OffsetDateTime::now_utc();

    set_auth_cookie(jar, token.user_id, remaining, local_offset)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{Error, models::UserID};

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn amman_offset() -> UtcOffset {
        UtcOffset::from_hms(3, 0, 0).unwrap()
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn can_set_cookie() {
        let user_id = UserID::new(1);

        let jar = set_auth_cookie(get_jar(), user_id, DEFAULT_COOKIE_DURATION, amman_offset())
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_eq!(token.user_id, user_id);
        assert_eq!(token.expires_at.offset(), amman_offset());
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(5),
        );

        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn missing_cookie() {
        assert_eq!(
            get_token_from_cookies(&get_jar()),
            Err(Error::CookieMissing)
        );
    }

    #[test]
    fn cookie_without_token_is_invalid() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "not json"));

        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidToken(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            Duration::seconds(-10),
            UtcOffset::UTC,
        )
        .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::SessionExpired));
    }

    #[test]
    fn can_extend_cookie_duration() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            Duration::seconds(5),
            UtcOffset::UTC,
        )
        .unwrap();

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), UtcOffset::UTC)
                .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10),
        );
        assert_date_time_close(
            jar.get(COOKIE_TOKEN).unwrap().expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + Duration::minutes(10),
        );
    }

    #[test]
    fn longer_session_is_not_shortened() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), UtcOffset::UTC)
            .unwrap();

        let jar = extend_auth_cookie_duration_if_needed(
            jar,
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::days(7),
        );
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let jar = set_auth_cookie(
            get_jar(),
            UserID::new(1),
            DEFAULT_COOKIE_DURATION,
            UtcOffset::UTC,
        )
        .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::InvalidToken(_))
        ));
    }
}
