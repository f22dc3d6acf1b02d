//! Authentication HTTP handlers
//!
//! Endpoints for the wallet challenge/response flow.

use axum::{extract::State, Json};
use validator::Validate;

use super::AuthenticatedAccount;
use crate::auth::ChallengeSubmission;
use crate::error::ApiResult;
use crate::models::{
    AccountRequest, AccountResponse, ChallengeResponse, ResponseRequest, TokenResponse,
};
use crate::state::AppState;

/// POST /request - Request a one-time nonce to sign with the wallet
pub async fn request_challenge(
    State(state): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> ApiResult<Json<ChallengeResponse>> {
    req.validate()?;

    let challenge = state.auth_service.request_challenge(&req.account);

    Ok(Json(challenge.into()))
}

/// POST /response - Submit the signed nonce and receive a token
pub async fn submit_response(
    State(state): State<AppState>,
    Json(req): Json<ResponseRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()?;

    tracing::info!(
        account = %req.challenged_account,
        "Challenge response received"
    );

    let submission: ChallengeSubmission = req.into();
    let issued = state.auth_service.submit_response(&submission)?;

    Ok(Json(issued.into()))
}

/// GET /auth/me - Identity carried by the presented token
pub async fn get_current_account(account: AuthenticatedAccount) -> Json<AccountResponse> {
    Json(AccountResponse {
        checksum_address: account.address.to_checksum(),
        account: account.address.to_string(),
        issued_at: account.issued_at,
        expires_at: account.expires_at,
    })
}
