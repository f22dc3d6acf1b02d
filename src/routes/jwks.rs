//! Key discovery routes

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

pub fn jwks_routes() -> Router<AppState> {
    Router::new().route("/.well-known/jwks.json", get(handlers::jwks))
}
