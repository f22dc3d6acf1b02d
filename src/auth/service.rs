//! Authentication service
//!
//! Core challenge/response logic for wallet-based authentication.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::address::Address;
use super::challenge_store::ChallengeStore;
use super::crypto::{recover_address, CryptoError, DigestConvention};
use super::jwt::{JwtError, TokenIssuer};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Signature recovery failed: {0}")]
    SignatureRecovery(String),

    #[error("Wrong account in response")]
    NoOutstandingChallenge,

    #[error("Invalid signature for challenge!")]
    InvalidSignature,

    #[error("Token error: {0}")]
    TokenError(String),
}

impl From<CryptoError> for AuthError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::MalformedSignature(msg) => AuthError::MalformedSignature(msg),
            CryptoError::RecoveryFailed(msg) => AuthError::SignatureRecovery(msg),
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        AuthError::TokenError(e.to_string())
    }
}

/// Challenge handed to the client: the nonce to sign and the account it was issued for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub nonce: String,
    pub challenged_account: String,
}

/// Client's answer to a challenge
#[derive(Debug, Clone)]
pub struct ChallengeSubmission {
    /// `0x`-prefixed 65-byte signature over the nonce
    pub signed_message: String,
    /// Account the nonce was requested for
    pub challenged_account: String,
}

/// Token minted for a successfully authenticated account
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub subject: Address,
    pub expires_in: i64,
}

/// Authentication service
pub struct AuthService {
    challenges: ChallengeStore,
    tokens: TokenIssuer,
    convention: DigestConvention,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(tokens: TokenIssuer, convention: DigestConvention) -> Self {
        Self {
            challenges: ChallengeStore::new(),
            tokens,
            convention,
        }
    }

    /// Issue a fresh nonce for an account, replacing any outstanding one
    pub fn request_challenge(&self, account: &str) -> Challenge {
        let nonce = Uuid::new_v4();
        let key = Address::from(account);

        self.challenges.put(key.clone(), nonce);

        tracing::info!(account = %key, nonce = %nonce, "Challenge issued");

        Challenge {
            nonce: nonce.to_string(),
            challenged_account: account.to_string(),
        }
    }

    /// Validate a signed nonce and issue a token for the challenged account
    pub fn submit_response(
        &self,
        submission: &ChallengeSubmission,
    ) -> Result<IssuedToken, AuthError> {
        let account = Address::from(submission.challenged_account.as_str());

        let nonce = self
            .challenges
            .get(&account)
            .ok_or(AuthError::NoOutstandingChallenge)?;

        let recovered = recover_address(
            &nonce.to_string(),
            &submission.signed_message,
            self.convention,
        )
        .map_err(|e| {
            tracing::warn!(account = %account, error = %e, "Rejected unparseable response");
            AuthError::from(e)
        })?;

        if recovered != account {
            // Nonce stays outstanding for the real owner
            tracing::warn!(
                account = %account,
                recovered = %recovered,
                "Signature does not match challenged account"
            );
            return Err(AuthError::InvalidSignature);
        }

        // Single use: a replayed signature finds no challenge
        self.challenges.remove(&account);

        let token = self.tokens.issue_token(recovered.as_str())?;

        tracing::info!(account = %recovered, "Challenge response accepted, token issued");

        Ok(IssuedToken {
            token,
            subject: recovered,
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Outstanding nonce for an account, if any
    pub fn outstanding_nonce(&self, account: &str) -> Option<Uuid> {
        self.challenges.get(&Address::from(account))
    }

    /// Number of accounts with an outstanding challenge
    pub fn outstanding_challenges(&self) -> usize {
        self.challenges.len()
    }

    pub fn convention(&self) -> DigestConvention {
        self.convention
    }

    /// Token issuer (for middleware access)
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    #[cfg(test)]
    pub(crate) fn set_nonce(&self, account: &str, nonce: Uuid) {
        self.challenges.put(Address::from(account), nonce);
    }
}
