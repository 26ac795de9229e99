//! Application router configuration with protected and unprotected route definitions.

use axum::{Router, middleware, routing::get};

use crate::{
    AppState,
    admin::get_admin_page,
    auth::{
        auth_guard, get_log_in_page, get_log_out, get_register_page, post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    index::get_index_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    subscription::{get_subscribe_page, post_subscribe},
    transaction::{create_transaction_endpoint, get_transaction_page},
    transfer::{get_transfer_page, post_transfer},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::REGISTER,
            get(get_register_page).post(register_user),
        )
        .route(endpoints::LOG_IN, get(get_log_in_page).post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD, get(get_dashboard_page))
        .route(
            endpoints::SUBSCRIBE,
            get(get_subscribe_page).post(post_subscribe),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_page).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSFER,
            get(get_transfer_page).post(post_transfer),
        )
        .route(endpoints::ADMIN, get(get_admin_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
