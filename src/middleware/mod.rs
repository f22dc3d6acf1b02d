//! Middleware for the Web3Auth API
//!
//! This module provides middleware for request tracing, security headers,
//! and bearer-token authentication.

pub mod auth;
mod security;
mod tracing;

pub use auth::AuthenticatedAccount;
pub use security::{hsts_header, security_headers};
pub use self::tracing::request_tracing;
