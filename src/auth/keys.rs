//! Token signing key management
//!
//! Holds the single P-256 key pair used to sign issued tokens for the
//! lifetime of the process. The key is never persisted or rotated, so a
//! restart invalidates every token issued before it and consumers of the
//! published JWKS must re-fetch.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::jwk::{
    AlgorithmParameters, CommonParameters, EllipticCurve, EllipticCurveKeyParameters,
    EllipticCurveKeyType, Jwk, JwkSet, KeyAlgorithm, PublicKeyUse,
};
use jsonwebtoken::{DecodingKey, EncodingKey};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::EncodePrivateKey;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Attempts at drawing a valid scalar before giving up
const MAX_GENERATION_ATTEMPTS: usize = 8;

/// Key management errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Entropy source unavailable: {0}")]
    Entropy(String),

    #[error("Key generation failed after {0} attempts")]
    Generation(usize),

    #[error("Key encoding failed: {0}")]
    Encoding(String),
}

/// Process-wide signing key pair and its published form
pub struct KeyManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_jwk: Jwk,
    key_id: String,
}

impl KeyManager {
    /// Generate a fresh P-256 key pair from the OS entropy source
    pub fn generate() -> Result<Self, KeyError> {
        let mut seed = [0u8; 32];

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            OsRng
                .try_fill_bytes(&mut seed)
                .map_err(|e| KeyError::Entropy(e.to_string()))?;

            // Rejects zero and scalars >= the curve order
            if let Ok(signing_key) = SigningKey::from_slice(&seed) {
                seed.fill(0);
                return Self::from_signing_key(signing_key);
            }
        }

        Err(KeyError::Generation(MAX_GENERATION_ATTEMPTS))
    }

    /// Build from an existing key (fixed keys in tests)
    pub fn from_signing_key(signing_key: SigningKey) -> Result<Self, KeyError> {
        let point = signing_key.verifying_key().to_encoded_point(false);
        let (x, y) = match (point.x(), point.y()) {
            (Some(x), Some(y)) => (URL_SAFE_NO_PAD.encode(x), URL_SAFE_NO_PAD.encode(y)),
            _ => {
                return Err(KeyError::Encoding(
                    "public key has no affine coordinates".to_string(),
                ))
            }
        };

        let key_id = jwk_thumbprint(&x, &y);

        let pkcs8 = signing_key
            .to_pkcs8_der()
            .map_err(|e| KeyError::Encoding(e.to_string()))?;
        let encoding_key = EncodingKey::from_ec_der(pkcs8.as_bytes());

        let public_jwk = Jwk {
            common: CommonParameters {
                public_key_use: Some(PublicKeyUse::Signature),
                key_algorithm: Some(KeyAlgorithm::ES256),
                key_id: Some(key_id.clone()),
                ..Default::default()
            },
            algorithm: AlgorithmParameters::EllipticCurve(EllipticCurveKeyParameters {
                key_type: EllipticCurveKeyType::EC,
                curve: EllipticCurve::P256,
                x,
                y,
            }),
        };

        let decoding_key =
            DecodingKey::from_jwk(&public_jwk).map_err(|e| KeyError::Encoding(e.to_string()))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            public_jwk,
            key_id,
        })
    }

    /// Stable key identifier (RFC 7638 thumbprint of the public key)
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Public half of the key as a JWK. Contains no private material.
    pub fn public_jwk(&self) -> &Jwk {
        &self.public_jwk
    }

    /// JWK Set containing exactly the one signing key
    pub fn public_jwks(&self) -> JwkSet {
        JwkSet {
            keys: vec![self.public_jwk.clone()],
        }
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// RFC 7638 thumbprint of an EC public key: SHA-256 over the required members
/// in lexicographic order, no whitespace, base64url without padding.
fn jwk_thumbprint(x: &str, y: &str) -> String {
    let canonical = format!(
        r#"{{"crv":"P-256","kty":"EC","x":"{}","y":"{}"}}"#,
        x, y
    );
    URL_SAFE_NO_PAD.encode(Sha256::digest(canonical.as_bytes()))
}


#[cfg(test)]
mod tests {
    use super::test_support::fixed_key_manager;
    use super::*;

    // P-256 example key from RFC 7517 appendix A.1
    const RFC_X: &str = "MKBCTNIcKUSDii11ySs3526iDZ8AiTo7Tu6KPAqv7D4";
    const RFC_Y: &str = "4Etl6SRW2YiLUrN5vfvVHuhp7x8PxltmWWlbbM4IFyM";

    #[test]
    fn test_generate_produces_distinct_keys() {
        let a = KeyManager::generate().unwrap();
        let b = KeyManager::generate().unwrap();
        assert_ne!(a.key_id(), b.key_id());
    }

    #[test]
    fn test_fixed_key_is_deterministic() {
        assert_eq!(fixed_key_manager().key_id(), fixed_key_manager().key_id());
    }

    #[test]
    fn test_thumbprint_of_rfc_example_key() {
        assert_eq!(
            jwk_thumbprint(RFC_X, RFC_Y),
            "cn-I_WNMClehiVp51i_0VpOENW1upEerA8sEam5hn-s"
        );
        assert_ne!(jwk_thumbprint(RFC_X, RFC_Y), jwk_thumbprint(RFC_Y, RFC_X));
    }

    #[test]
    fn test_public_jwks_has_no_private_material() {
        let keys = fixed_key_manager();
        let json = serde_json::to_value(keys.public_jwks()).unwrap();

        let key = &json["keys"][0];
        assert_eq!(json["keys"].as_array().unwrap().len(), 1);
        assert_eq!(key["kty"], "EC");
        assert_eq!(key["crv"], "P-256");
        assert_eq!(key["use"], "sig");
        assert_eq!(key["alg"], "ES256");
        assert_eq!(key["kid"], keys.key_id());
        assert!(key["x"].is_string());
        assert!(key["y"].is_string());
        assert!(key.get("d").is_none());
    }

    #[test]
    fn test_key_id_matches_published_coordinates() {
        let keys = fixed_key_manager();
        match &keys.public_jwk().algorithm {
            AlgorithmParameters::EllipticCurve(params) => {
                assert_eq!(jwk_thumbprint(&params.x, &params.y), keys.key_id());
            }
            other => panic!("unexpected key parameters: {:?}", other),
        }
    }
}
