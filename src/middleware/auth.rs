//! Authentication middleware
//!
//! Extractor for bearer tokens issued by this service.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{Address, AuthService, JwtError};

/// Account extracted from a valid token
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub address: Address,
    pub jti: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// Error response for authentication failures
#[derive(Debug, Serialize)]
struct AuthError {
    error: AuthErrorDetails,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetails {
    code: String,
    message: String,
}

impl AuthError {
    fn new(code: &str, message: &str) -> Self {
        Self {
            error: AuthErrorDetails {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Extractor for authenticated accounts
///
/// Verifies the token from the Authorization header against the process
/// signing key. Tokens from before a restart fail with `INVALID_TOKEN`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(account: AuthenticatedAccount) -> impl IntoResponse {
///     format!("Hello, {}", account.address)
/// }
/// ```
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AuthError::new(
                        "MISSING_TOKEN",
                        "Authorization header with Bearer token required",
                    )
                    .into_response()
                })?;

        let auth_service = Arc::<AuthService>::from_ref(state);

        let claims = auth_service
            .tokens()
            .verify_token(bearer.token())
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                let (code, message) = match e {
                    JwtError::TokenExpired => ("TOKEN_EXPIRED", "Token has expired"),
                    _ => ("INVALID_TOKEN", "Invalid token"),
                };
                AuthError::new(code, message).into_response()
            })?;

        Ok(AuthenticatedAccount {
            address: Address::from(claims.sub),
            jti: claims.jti,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}
