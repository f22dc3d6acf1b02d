//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::auth;
use crate::state::AppState;

/// Challenge/response flow and token introspection
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/request", post(auth::request_challenge))
        .route("/response", post(auth::submit_response))
        .route("/auth/me", get(auth::get_current_account))
}
