//! Admin API: inspect the live redirect table.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::get,
    Router,
};
use crate::http::server::AppState;
use self::handlers::{get_resolve, get_rules, get_status};
use self::auth::admin_auth_middleware;

pub fn setup_admin_router(state: AppState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/rules", get(get_rules))
        .route("/admin/resolve", get(get_resolve))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
