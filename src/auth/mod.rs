//! Authentication module for Web3Auth
//!
//! Provides wallet-based authentication for EVM accounts.
//! - Challenge-response authentication with single-use nonces
//! - Signer address recovery from secp256k1 signatures
//! - ES256 token issuance with a published JWKS

mod address;
mod challenge_store;
mod crypto;
mod jwt;
mod keys;
mod service;

pub use address::{Address, AddressError};
pub use challenge_store::ChallengeStore;
pub use crypto::{recover_address, CryptoError, DigestConvention};
pub use jwt::{Claims, JwtError, TokenIssuer, DEFAULT_ISSUER, DEFAULT_TOKEN_TTL_SECONDS};
pub use keys::{KeyError, KeyManager};
pub use service::{AuthError, AuthService, Challenge, ChallengeSubmission, IssuedToken};
