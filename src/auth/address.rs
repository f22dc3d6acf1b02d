//! EVM account addresses
//!
//! Addresses are kept in one canonical form (`0x` + 40 lowercase hex digits)
//! so that checksummed (EIP-55) and lowercase spellings of the same account
//! compare equal. The mixed-case form is only produced for display.

use std::fmt;

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Errors raised by strict address parsing
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("Address must start with 0x")]
    MissingPrefix,

    #[error("Address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("Address contains non-hex characters")]
    InvalidCharacters,
}

/// Canonical (lowercase) account address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse an address, rejecting anything that is not `0x` followed by
    /// exactly 40 hex digits. Accepts any letter case.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let hex_part = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;

        if hex_part.len() != 40 {
            return Err(AddressError::InvalidLength(hex_part.len()));
        }

        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidCharacters);
        }

        Ok(Self::from(s))
    }

    /// Derive the address owned by a secp256k1 public key
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        // Skip the 0x04 uncompressed tag
        let hash = Keccak256::digest(&point.as_bytes()[1..]);

        Address(format!("0x{}", hex::encode(&hash[12..])))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// EIP-55 mixed-case checksum encoding
    pub fn to_checksum(&self) -> String {
        let hex_part = self.0.trim_start_matches("0x");
        let hash = Keccak256::digest(hex_part.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");

        for (i, c) in hex_part.chars().enumerate() {
            let nibble = if i % 2 == 0 {
                hash[i / 2] >> 4
            } else {
                hash[i / 2] & 0x0f
            };

            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }

        out
    }
}

/// Normalizes without validating; the challenge store treats the result as an opaque key.
impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.trim().to_ascii_lowercase())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address::from(s.as_str())
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
