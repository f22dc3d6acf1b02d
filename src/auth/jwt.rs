//! JWT token generation and validation
//!
//! Issues short-lived ES256 tokens for authenticated accounts, signed with
//! the process key and carrying its key id in the header.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::keys::KeyManager;

/// Issuer claim used when none is configured
pub const DEFAULT_ISSUER: &str = "web3auth";

/// Token lifetime used when none is configured
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims for issued tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (canonical account address)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// JWT ID
    pub jti: String,
}

/// Builds and checks tokens signed with the process key
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyManager>,
    issuer: String,
    ttl_seconds: i64,
}

impl TokenIssuer {
    pub fn new(keys: Arc<KeyManager>, issuer: String, ttl_seconds: i64) -> Self {
        Self {
            keys,
            issuer,
            ttl_seconds,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Create a signed token with the given account as subject
    pub fn issue_token(&self, subject: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.ttl_seconds);

        let claims = Claims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::ES256);
        header.kid = Some(self.keys.key_id().to_string());

        encode(&header, &claims, self.keys.encoding_key())
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify and decode a token issued by this process
    ///
    /// # Returns
    /// * `Ok(Claims)` if signature, key id, issuer and expiry all check out
    /// * `Err(JwtError)` otherwise
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::DecodingFailed(e.to_string()))?;

        if header.kid.as_deref() != Some(self.keys.key_id()) {
            return Err(JwtError::InvalidToken("unknown key id".to_string()));
        }

        let mut validation = Validation::new(Algorithm::ES256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, self.keys.decoding_key(), &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::DecodingFailed(e.to_string()),
            },
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::keys::test_support::fixed_key_manager;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(
            Arc::new(fixed_key_manager()),
            DEFAULT_ISSUER.to_string(),
            DEFAULT_TOKEN_TTL_SECONDS,
        )
    }

    #[test]
    fn test_issue_token() {
        let issuer = issuer();
        let before = Utc::now().timestamp();

        let token = issuer.issue_token("0xf00").unwrap();
        let claims = issuer.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "0xf00");
        assert_eq!(claims.iss, "web3auth");
        assert!(claims.iat >= before);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp - claims.iat, 60);
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_header_carries_key_id() {
        let issuer = issuer();
        let token = issuer.issue_token("0xf00").unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::ES256);
        assert_eq!(header.kid.as_deref(), Some(issuer.keys.key_id()));
    }

    #[test]
    fn test_token_ids_are_unique() {
        let issuer = issuer();
        let a = issuer.verify_token(&issuer.issue_token("0xf00").unwrap()).unwrap();
        let b = issuer.verify_token(&issuer.issue_token("0xf00").unwrap()).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new(Arc::new(fixed_key_manager()), "web3auth".to_string(), -10);
        let token = issuer.issue_token("0xf00").unwrap();

        assert!(matches!(
            issuer.verify_token(&token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let other = TokenIssuer::new(
            Arc::new(KeyManager::generate().unwrap()),
            "web3auth".to_string(),
            60,
        );
        let token = other.issue_token("0xf00").unwrap();

        assert!(matches!(
            issuer().verify_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let other = TokenIssuer::new(Arc::new(fixed_key_manager()), "someone-else".to_string(), 60);
        let token = other.issue_token("0xf00").unwrap();

        assert!(issuer().verify_token(&token).is_err());
    }

    #[test]
    fn test_invalid_token() {
        assert!(issuer().verify_token("invalid.token.here").is_err());
    }
}
