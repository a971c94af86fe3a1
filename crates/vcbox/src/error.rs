//! Error types for vcbox.
//!
//! All errors are strongly typed and propagated without panicking.
//! Private key material is never included in error messages.

/// Error types covering store, persistence and wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum VcBoxError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persisted state that failed to parse. Load recovers from this by
    /// starting empty, so it is only ever logged.
    #[error("Corrupt persisted state: {0}")]
    CorruptState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid provider: {0}")]
    InvalidProvider(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Identity with alias '{alias}' is controlled by a different key")]
    IdentityMismatch { alias: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unknown table: {0}")]
    InvalidTable(String),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, VcBoxError>;
