//! Cryptographic primitives for vcbox.
//!
//! This module provides:
//! - Ed25519 wallet key pairs derived from a wallet secret
//! - HKDF-SHA256 key derivation
//! - ChaCha20-Poly1305 authenticated encryption
//! - `SecretBox` wrapping of private key material at rest
//! - Cryptographically secure random number generation

pub mod derivation;
pub mod encryption;
pub mod keys;
pub mod random;
pub mod secret_box;
