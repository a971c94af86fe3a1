//! `SecretBox` — wraps private key material before it enters the store.
//!
//! Sealed values are hex strings of `nonce (12 bytes) || ciphertext`, so a
//! wrapped key still fits the `privateKeyHex` field of a private key record.

use zeroize::Zeroize;

use crate::crypto::encryption::{self, NONCE_LEN, TAG_LEN};
use crate::crypto::random;
use crate::error::{Result, VcBoxError};

/// A 32-byte ChaCha20-Poly1305 key for wrapping private keys at rest.
///
/// The key is zeroized on drop.
pub struct SecretBox {
    key: [u8; 32],
}

impl SecretBox {
    /// Build from a 32-byte key given as 64 hex digits, optionally
    /// `0x`- or `0X`-prefixed.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::InvalidKey` if the input is not 32 bytes of hex.
    pub fn from_hex(key_hex: &str) -> Result<Self> {
        let digits = key_hex.trim();
        let digits = digits
            .strip_prefix("0x")
            .or_else(|| digits.strip_prefix("0X"))
            .unwrap_or(digits);
        let mut key = [0u8; 32];
        hex::decode_to_slice(digits, &mut key).map_err(|_| {
            VcBoxError::InvalidKey("store encryption key must be 32 bytes of hex".to_string())
        })?;
        Ok(Self { key })
    }

    /// A box with a fresh random key.
    pub fn generate() -> Self {
        Self {
            key: random::random_bytes(),
        }
    }

    /// Encrypt `plaintext` and return the sealed hex string.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let (nonce, ciphertext) = encryption::encrypt(&self.key, plaintext.as_bytes())?;
        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(hex::encode(sealed))
    }

    /// Open a sealed hex string produced by [`SecretBox::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::DecryptionFailed` for malformed input, a wrong
    /// key, or tampered data.
    pub fn decrypt(&self, sealed_hex: &str) -> Result<String> {
        let sealed = hex::decode(sealed_hex)
            .map_err(|_| VcBoxError::DecryptionFailed("sealed value is not hex".to_string()))?;
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(VcBoxError::DecryptionFailed(
                "sealed value is too short".to_string(),
            ));
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LEN);
        let mut plaintext = encryption::decrypt(&self.key, nonce, ciphertext)?;
        let result = String::from_utf8(plaintext.clone())
            .map_err(|_| VcBoxError::DecryptionFailed("plaintext is not UTF-8".to_string()));
        plaintext.zeroize();
        result
    }
}

impl Drop for SecretBox {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl std::fmt::Debug for SecretBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretBox(<redacted>)")
    }
}
