//! Secure random number generation.
//!
//! Uses the operating system's cryptographic random source via `rand`.

use rand::{Rng, RngCore};

/// Fill a buffer with cryptographically secure random bytes.
pub fn fill_random(buf: &mut [u8]) {
    rand::thread_rng().fill_bytes(buf);
}

/// Generate a fixed-size array of cryptographically secure random bytes.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    fill_random(&mut buf);
    buf
}

/// Generate a random 12-byte nonce (for ChaCha20-Poly1305).
pub fn random_nonce_12() -> [u8; 12] {
    random_bytes()
}

/// Uniform integer in `1..=max`.
pub fn random_in_range(max: u32) -> u32 {
    rand::thread_rng().gen_range(1..=max)
}
