//! Configuration management for Web3Auth
//!
//! This module handles loading and validating configuration from environment variables,
//! with support for different environments (development, staging, production).

use std::env;
use std::net::IpAddr;
use thiserror::Error;

use crate::auth::{DigestConvention, DEFAULT_ISSUER, DEFAULT_TOKEN_TTL_SECONDS};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment value: {0}")]
    InvalidValue(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    #[error("Invalid host address: {0}")]
    InvalidHost(String),
}

/// Application environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "staging" => Ok(Environment::Staging),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidValue(format!(
                "Invalid environment: '{}'. Expected: dev, staging, or prod",
                s
            ))),
        }
    }

    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Get the environment name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Current environment
    pub environment: Environment,

    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// CORS allowed origins (comma separated)
    pub cors_allowed_origins: Option<String>,

    /// Log level (RUST_LOG)
    pub log_level: String,

    /// Issuer claim of issued tokens
    pub jwt_issuer: String,

    /// Token TTL in seconds (default: 60)
    pub jwt_ttl_seconds: i64,

    /// Digest convention clients sign nonces with
    pub signature_digest: DigestConvention,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            cors_allowed_origins: None,
            log_level: "info".to_string(),
            jwt_issuer: DEFAULT_ISSUER.to_string(),
            jwt_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            signature_digest: DigestConvention::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str(&s))
            .unwrap_or(Ok(Environment::Development))?;

        let host = match env::var("HOST") {
            Ok(s) => s
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(s.clone()))?,
            Err(_) => defaults.host,
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort("PORT must be a valid number".to_string()))?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS").ok();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let jwt_issuer = env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer);

        let jwt_ttl_seconds = env::var("JWT_TTL_SECONDS")
            .unwrap_or_else(|_| DEFAULT_TOKEN_TTL_SECONDS.to_string())
            .parse::<i64>()
            .ok()
            .filter(|ttl| *ttl > 0)
            .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);

        let signature_digest = match env::var("SIGNATURE_DIGEST") {
            Ok(s) => DigestConvention::from_str(&s).ok_or_else(|| {
                ConfigError::InvalidValue(format!(
                    "Invalid signature digest: '{}'. Expected: personal or raw",
                    s
                ))
            })?,
            Err(_) => defaults.signature_digest,
        };

        Ok(Config {
            environment,
            host,
            port,
            cors_allowed_origins,
            log_level,
            jwt_issuer,
            jwt_ttl_seconds,
            signature_digest,
        })
    }
}
