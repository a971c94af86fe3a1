//! Wallet configuration.
//!
//! Configuration is plain JSON, for example:
//!
//! ```json
//! {
//!     "dbName": "wallet",
//!     "walletSecret": "…",
//!     "walletAlias": "Wallet: 1",
//!     "chains": [
//!         {
//!             "name": "goerli",
//!             "chainId": 5,
//!             "default": true,
//!             "provider": { "url": "https://rpc.example.org" },
//!             "didRegistry": "0xdca7ef03e98e0dc2b855be647c39abe984fcf21b"
//!         }
//!     ],
//!     "storage": { "type": "file", "dir": "." }
//! }
//! ```
//!
//! Secrets (`walletSecret`, `storeEncryptKey`) are never printed by the
//! `Debug` implementation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, VcBoxError};

/// Provider URL schemes accepted for chain RPC endpoints.
const PROVIDER_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];

// ── Chains ────────────────────────────────────────────────────────────────────

/// RPC endpoint for a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// A chain whose DID registry identities are anchored on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub name: String,
    pub chain_id: u64,
    /// Exactly one configured chain should be the default.
    #[serde(default)]
    pub default: bool,
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub did_registry: Option<String>,
}

impl Chain {
    /// DID namespace of identities on this chain: `did:ethr:{name}`, or
    /// plain `did:ethr` on mainnet.
    pub fn namespace(&self) -> String {
        if self.name == "mainnet" {
            "did:ethr".to_string()
        } else {
            format!("did:ethr:{}", self.name)
        }
    }

    /// Check that the provider is a usable RPC URL.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::InvalidProvider` unless the URL has an
    /// `http`, `https`, `ws` or `wss` scheme and a non-empty host.
    pub fn validate_provider(&self) -> Result<()> {
        let invalid = |reason: String| {
            VcBoxError::InvalidProvider(format!(
                "chain '{}' has unusable provider url '{}': {reason}",
                self.name, self.provider.url
            ))
        };
        let url = Url::parse(self.provider.url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !PROVIDER_SCHEMES.contains(&url.scheme()) {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(invalid("missing host".to_string())),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────────────────────

/// Where the wallet's record store lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageKind {
    /// `{dir}/{db_name}.json` on disk.
    File { dir: PathBuf },
    /// An entry named `db_name` in the process-wide local storage area.
    Local,
}

impl Default for StorageKind {
    fn default() -> Self {
        StorageKind::File {
            dir: PathBuf::from("."),
        }
    }
}

// ── WalletConfig ──────────────────────────────────────────────────────────────

/// Everything [`Wallet::setup`](crate::wallet::Wallet::setup) needs.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub db_name: String,
    /// Private key hex or passphrase the wallet identity is derived from.
    #[serde(default)]
    pub wallet_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_alias: Option<String>,
    #[serde(default)]
    pub chains: Vec<Chain>,
    /// 32-byte hex key wrapping private keys at rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_encrypt_key: Option<String>,
    #[serde(default)]
    pub storage: StorageKind,
}

impl WalletConfig {
    /// A file-backed configuration with no chains.
    pub fn new(db_name: impl Into<String>, wallet_secret: impl Into<String>) -> Self {
        Self {
            db_name: db_name.into(),
            wallet_secret: wallet_secret.into(),
            wallet_alias: None,
            chains: Vec::new(),
            store_encrypt_key: None,
            storage: StorageKind::default(),
        }
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::Io` if the file cannot be read or
    /// `VcBoxError::Configuration` if it is not a valid configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            VcBoxError::Configuration(format!("invalid config {}: {e}", path.display()))
        })
    }

    /// The first chain flagged `default`.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::Configuration` if no chain is the default.
    pub fn default_chain(&self) -> Result<&Chain> {
        self.chains.iter().find(|chain| chain.default).ok_or_else(|| {
            VcBoxError::Configuration(
                "no default chain provided, one chain must be default".to_string(),
            )
        })
    }
}

impl std::fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletConfig")
            .field("db_name", &self.db_name)
            .field("wallet_secret", &"<redacted>")
            .field("wallet_alias", &self.wallet_alias)
            .field("chains", &self.chains)
            .field(
                "store_encrypt_key",
                &self.store_encrypt_key.as_ref().map(|_| "<redacted>"),
            )
            .field("storage", &self.storage)
            .finish()
    }
}
