//! In-process signing service: blake3 keyed hash over the payload.

use anchorwatch_core::config::RepairConfig;
use anchorwatch_core::constants::SIGNING_KEY_CONTEXT;
use anchorwatch_core::errors::SigningError;
use anchorwatch_core::models::Signature;
use anchorwatch_core::traits::ISigner;

/// Keyed-hash signer. Signatures are 64 hex chars.
#[derive(Clone)]
pub struct KeyedHashSigner {
    key: [u8; 32],
}

impl std::fmt::Debug for KeyedHashSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedHashSigner")
            .field("key", &"<redacted>")
            .finish()
    }
}

impl KeyedHashSigner {
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Key from 64 hex chars.
    pub fn from_hex(hex: &str) -> Result<Self, SigningError> {
        let hash = blake3::Hash::from_hex(hex).map_err(|e| SigningError::InvalidKey {
            reason: e.to_string(),
        })?;
        Ok(Self::new(*hash.as_bytes()))
    }

    /// Key derived from seed material under the repair-signing context.
    pub fn derive(seed: &str) -> Self {
        Self::new(blake3::derive_key(SIGNING_KEY_CONTEXT, seed.as_bytes()))
    }

    pub fn from_config(config: &RepairConfig) -> Result<Self, SigningError> {
        match &config.signing_key_hex {
            Some(hex) => Self::from_hex(hex),
            None => Ok(Self::derive(&config.signing_key_seed)),
        }
    }

    fn mac(&self, payload: &[u8]) -> blake3::Hash {
        blake3::keyed_hash(&self.key, payload)
    }
}

impl ISigner for KeyedHashSigner {
    fn sign(&self, payload: &[u8]) -> Result<Signature, SigningError> {
        Ok(Signature::from_hex(self.mac(payload).to_hex().to_string()))
    }

    fn verify(&self, payload: &[u8], signature: &Signature) -> Result<bool, SigningError> {
        let claimed = blake3::Hash::from_hex(signature.as_hex()).map_err(|e| {
            SigningError::MalformedSignature {
                reason: e.to_string(),
            }
        })?;
        // blake3::Hash equality is constant-time.
        Ok(self.mac(payload) == claimed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify() {
        let signer = KeyedHashSigner::derive("seed");
        let sig = signer.sign(b"payload").unwrap();
        assert_eq!(sig.as_hex().len(), 64);
        assert!(signer.verify(b"payload", &sig).unwrap());
        assert!(!signer.verify(b"payl0ad", &sig).unwrap());
    }

    #[test]
    fn different_keys_disagree() {
        let a = KeyedHashSigner::derive("a");
        let b = KeyedHashSigner::derive("b");
        let sig = a.sign(b"x").unwrap();
        assert!(!b.verify(b"x", &sig).unwrap());
    }

    #[test]
    fn malformed_signature_is_an_error() {
        let signer = KeyedHashSigner::derive("seed");
        let err = signer
            .verify(b"x", &Signature::from_hex("not-hex"))
            .unwrap_err();
        assert!(matches!(err, SigningError::MalformedSignature { .. }));
    }

    #[test]
    fn key_from_config() {
        let config = RepairConfig {
            signing_key_hex: Some("ab".repeat(32)),
            ..RepairConfig::default()
        };
        assert!(KeyedHashSigner::from_config(&config).is_ok());

        let bad = RepairConfig {
            signing_key_hex: Some("zz".into()),
            ..RepairConfig::default()
        };
        assert!(matches!(
            KeyedHashSigner::from_config(&bad),
            Err(SigningError::InvalidKey { .. })
        ));
    }

    #[test]
    fn debug_redacts_key() {
        let signer = KeyedHashSigner::new([7; 32]);
        assert!(!format!("{signer:?}").contains('7'));
    }
}
