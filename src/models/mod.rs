//! Data models for the Web3Auth API

use serde::Serialize;

pub mod auth;
pub use auth::*;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub key_id: String,
    pub signature_digest: String,
}
