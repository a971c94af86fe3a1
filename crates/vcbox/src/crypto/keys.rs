//! Ed25519 wallet key pairs.
//!
//! A wallet's key pair is recovered deterministically from its secret, so
//! the same secret always yields the same public key, key id and DID.

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::derivation::{self, WALLET_KEY_CONTEXT};
use crate::error::{Result, VcBoxError};

/// An Ed25519 key pair for a wallet identity.
///
/// `SigningKey` zeroizes its secret bytes when dropped.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl Ed25519KeyPair {
    /// Generate a new random Ed25519 key pair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct a key pair from raw signing key bytes.
    pub fn from_signing_key_bytes(bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(bytes);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Recover the key pair for a wallet secret.
    ///
    /// A secret of exactly 64 hex digits (optionally `0x`-prefixed) is the
    /// private key itself. Any other secret is stretched to 32 bytes with
    /// HKDF-SHA256.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::InvalidKey` for an empty secret.
    pub fn from_secret(secret: &str) -> Result<Self> {
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return Err(VcBoxError::InvalidKey(
                "wallet secret must not be empty".to_string(),
            ));
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let mut bytes = Zeroizing::new([0u8; 32]);
        if digits.len() == 64 && hex::decode_to_slice(digits, &mut bytes[..]).is_ok() {
            return Ok(Self::from_signing_key_bytes(&bytes));
        }

        *bytes = derivation::derive_key(trimmed.as_bytes(), WALLET_KEY_CONTEXT)?;
        Ok(Self::from_signing_key_bytes(&bytes))
    }

    /// Return a reference to the signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Return the verifying (public) key.
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Return the verifying key bytes.
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Lowercase hex of the public key. Used as the key id.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.verifying_key_bytes())
    }

    /// Lowercase hex of the private key. Caller must zeroize after use.
    pub fn private_key_hex(&self) -> String {
        let mut bytes = self.signing_key.to_bytes();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }
}
