//! Web3Auth Server Library
//!
//! Wallet challenge/response authentication: clients prove control of an
//! Ethereum account by signing a one-time nonce and receive a short-lived
//! ES256 token verifiable against the published JWKS.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::create_router;
