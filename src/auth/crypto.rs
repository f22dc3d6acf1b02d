//! Signer recovery for wallet signatures
//!
//! Recovers the secp256k1 public key (and from it the account address) that
//! produced a 65-byte `r || s || v` signature over a challenge nonce.

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use thiserror::Error;

use super::address::Address;

/// Length of an `r || s || v` signature in bytes
const SIGNATURE_LEN: usize = 65;

/// Prefix wallets apply in `personal_sign`, followed by the message length.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Errors that can occur during signer recovery
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Signature recovery failed: {0}")]
    RecoveryFailed(String),
}

/// How the nonce is turned into the digest the wallet signed.
///
/// Both conventions start from `keccak256(nonce)`. They must match what the
/// client-side signer does; a mismatch recovers a different, valid-looking
/// address rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestConvention {
    /// `personal_sign` of the 32-byte nonce hash:
    /// `keccak256("\x19Ethereum Signed Message:\n32" || keccak256(nonce))`
    #[default]
    PersonalSign,
    /// `eth_sign` of the nonce hash with no prefix: `keccak256(nonce)`
    Raw,
}

impl DigestConvention {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "personal" | "personal_sign" | "eip191" => Some(DigestConvention::PersonalSign),
            "raw" | "eth_sign" => Some(DigestConvention::Raw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DigestConvention::PersonalSign => "personal_sign",
            DigestConvention::Raw => "raw",
        }
    }

    /// Compute the 32-byte digest a signature over `nonce` commits to
    pub fn digest(&self, nonce: &str) -> [u8; 32] {
        let nonce_hash = Keccak256::digest(nonce.as_bytes());

        let hash = match self {
            DigestConvention::Raw => nonce_hash,
            DigestConvention::PersonalSign => {
                let mut hasher = Keccak256::new();
                hasher.update(PERSONAL_MESSAGE_PREFIX);
                hasher.update(nonce_hash);
                hasher.finalize()
            }
        };

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hash);
        digest
    }
}

/// Recover the address that signed `nonce`
///
/// # Arguments
/// * `nonce` - The challenge nonce as issued (UUID text)
/// * `signature` - `0x`-prefixed hex of `r (32) || s (32) || v (1)`
/// * `convention` - Digest convention the client signed with
pub fn recover_address(
    nonce: &str,
    signature: &str,
    convention: DigestConvention,
) -> Result<Address, CryptoError> {
    let (signature, recovery_id) = parse_signature(signature)?;
    let digest = convention.digest(nonce);

    let verifying_key = VerifyingKey::recover_from_prehash(&digest, &signature, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;

    Ok(Address::from_public_key(&verifying_key))
}

/// Split a hex signature into its ECDSA components
fn parse_signature(signature: &str) -> Result<(Signature, RecoveryId), CryptoError> {
    let hex_part = signature
        .strip_prefix("0x")
        .ok_or_else(|| CryptoError::MalformedSignature("missing 0x prefix".to_string()))?;

    if hex_part.len() != SIGNATURE_LEN * 2 {
        return Err(CryptoError::MalformedSignature(format!(
            "expected {} hex digits, got {}",
            SIGNATURE_LEN * 2,
            hex_part.len()
        )));
    }

    let bytes =
        hex::decode(hex_part).map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;

    let recovery_id = recovery_id_from_v(bytes[64])?;

    let signature = Signature::from_slice(&bytes[..64])
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;

    // k256 only verifies low-s signatures; flip parity when normalizing
    Ok(match signature.normalize_s() {
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (signature, recovery_id),
    })
}

/// Map the trailing `v` byte to a recovery id. Wallets emit 27/28; raw
/// signers emit 0/1.
fn recovery_id_from_v(v: u8) -> Result<RecoveryId, CryptoError> {
    let id = match v {
        27..=30 => v - 27,
        0..=3 => v,
        _ => {
            return Err(CryptoError::RecoveryFailed(format!(
                "recovery indicator out of range: {}",
                v
            )))
        }
    };

    RecoveryId::from_byte(id)
        .ok_or_else(|| CryptoError::RecoveryFailed(format!("invalid recovery id: {}", id)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use k256::ecdsa::SigningKey;

    use super::DigestConvention;

    /// Sign `nonce` the way a wallet would and return the `0x` hex signature
    pub fn sign_nonce(key: &SigningKey, nonce: &str, convention: DigestConvention) -> String {
        let digest = convention.digest(nonce);
        let (signature, recovery_id) = key.sign_prehash_recoverable(&digest).unwrap();

        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());

        format!("0x{}", hex::encode(bytes))
    }
}
