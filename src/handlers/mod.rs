//! API handlers for Web3Auth

pub mod auth;
pub mod jwks;

use axum::{extract::State, Json};

pub use auth::*;
pub use jwks::jwks;

// Re-export the token extractor from middleware for handler use
pub use crate::middleware::auth::AuthenticatedAccount;

use crate::models::HealthResponse;
use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> &'static str {
    "Web3Auth API Server"
}

/// GET /health - Liveness and the currently published key id
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        key_id: state.key_manager.key_id().to_string(),
        signature_digest: state.auth_service.convention().as_str().to_string(),
    })
}
