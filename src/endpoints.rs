//! The URIs of the app's pages.
//!
//! For endpoints that take a parameter, e.g., '/subscribe/{plan_id}/', use [format_endpoint].

/// The landing page with the active investment plans.
pub const ROOT: &str = "/";
/// The page for creating an account.
pub const REGISTER: &str = "/register/";
/// The page for logging in.
pub const LOG_IN: &str = "/login/";
/// The route that logs out the current user.
pub const LOG_OUT: &str = "/logout/";
/// The wallet overview for logged in users.
pub const DASHBOARD: &str = "/dashboard/";
/// The page for investing in a plan.
pub const SUBSCRIBE: &str = "/subscribe/{plan_id}/";
/// The page for requesting a deposit or withdrawal.
pub const TRANSACTION: &str = "/transaction/";
/// The page for sending balance to another user.
pub const TRANSFER: &str = "/transfer/";
/// The read-only overview for staff.
pub const ADMIN: &str = "/admin/";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR: &str = "/error/";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/subscribe/{plan_id}/', '{plan_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// `endpoint_path` unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::REGISTER);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD);
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::SUBSCRIBE, 1));
        assert_endpoint_is_valid_uri(endpoints::TRANSACTION);
        assert_endpoint_is_valid_uri(endpoints::TRANSFER);
        assert_endpoint_is_valid_uri(endpoints::ADMIN);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR);
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(format_endpoint(endpoints::SUBSCRIBE, 12), "/subscribe/12/");
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(format_endpoint(endpoints::DASHBOARD, 12), endpoints::DASHBOARD);
    }

    #[test]
    fn format_endpoint_with_unclosed_parameter_replaces_rest() {
        assert_eq!(format_endpoint("/plans/{plan_id", 3), "/plans/3");
    }
}
