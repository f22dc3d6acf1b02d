//! Authentication models for Web3Auth

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::auth::{Address, Challenge, ChallengeSubmission, IssuedToken};

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Request for an authentication challenge. The account may be EIP-55 checksummed.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AccountRequest {
    #[validate(custom = "validate_account")]
    pub account: String,
}

/// Challenge for the client: the nonce to sign and the account it was requested for
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    pub nonce: String,
    pub challenged_account: String,
}

/// Signed nonce sent back by the client
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRequest {
    /// Signature over the nonce digest, `0x`-prefixed hex
    pub signed_message: String,
    #[validate(custom = "validate_account")]
    pub challenged_account: String,
}

/// Auth token response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT in compact serialization
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Identity carried by a valid token
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account: String,
    pub checksum_address: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

/// `0x` followed by 40 hex digits, any case
fn validate_account(account: &str) -> Result<(), ValidationError> {
    Address::parse(account).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("account_format");
        error.message = Some(e.to_string().into());
        error
    })
}

impl From<Challenge> for ChallengeResponse {
    fn from(challenge: Challenge) -> Self {
        Self {
            nonce: challenge.nonce,
            challenged_account: challenge.challenged_account,
        }
    }
}

impl From<ResponseRequest> for ChallengeSubmission {
    fn from(req: ResponseRequest) -> Self {
        Self {
            signed_message: req.signed_message,
            challenged_account: req.challenged_account,
        }
    }
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: "Bearer".to_string(),
            expires_in: issued.expires_in,
        }
    }
}
