//! Helpers for the `next` URL carried through the log-in page.

use axum::{extract::Request, http::Uri};
use tracing::error;

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN
}

/// Reduce `raw_url` to a local path and query.
///
/// Returns `None` for absolute URLs, protocol relative URLs and the log-in
/// page itself, so that `next` cannot send users to another site or in a loop.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in URL that returns the user to `request`'s page afterwards,
/// e.g. "/login/?next=%2Ftransfer%2F".
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let path_and_query = request.uri().path_and_query()?.as_str();
    let target = normalize_redirect_url(path_and_query)?;

    build_log_in_redirect_url_from_target(&target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("next", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN, param)),
        Err(error) => {
            error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}
