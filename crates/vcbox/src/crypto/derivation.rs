//! Key derivation using HKDF-SHA256.
//!
//! Turns a free-form wallet secret into 32 bytes of key material. The
//! context string scopes the output so the same secret can feed several
//! independent keys.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::{Result, VcBoxError};

/// HKDF context for the wallet's signing key. Must remain stable across
/// versions or existing wallets derive a different identity.
pub const WALLET_KEY_CONTEXT: &str = "vcbox/wallet-key";

/// Derive a 32-byte key from input key material and a context string.
///
/// Uses HKDF-SHA256 (RFC 5869) with `ikm` as input key material and the
/// context as info.
pub fn derive_key(ikm: &[u8], context: &str) -> Result<[u8; 32]> {
    let hk = Hkdf::<Sha256>::new(None, ikm);
    let mut output = [0u8; 32];
    hk.expand(context.as_bytes(), &mut output)
        .map_err(|e| VcBoxError::DerivationFailed(format!("HKDF expand failed: {e}")))?;
    Ok(output)
}
