//! JWKS discovery handler

use std::sync::Arc;

use axum::{extract::State, Json};
use jsonwebtoken::jwk::JwkSet;

use crate::auth::KeyManager;

/// GET /.well-known/jwks.json - The one public key tokens are signed with
pub async fn jwks(State(keys): State<Arc<KeyManager>>) -> Json<JwkSet> {
    tracing::debug!(kid = %keys.key_id(), "Provided JWKS");

    Json(keys.public_jwks())
}
