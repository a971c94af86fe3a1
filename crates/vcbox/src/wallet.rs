//! Wallet — a record store bound to one identity derived from a secret.
//!
//! [`Wallet::setup`] validates the chain configuration, opens the record
//! store on the configured persistence, and resolves the wallet identity:
//!
//! 1. Derive an Ed25519 key pair from the wallet secret.
//! 2. Look up the identifier carrying the wallet alias.
//! 3. Reuse it if its controller key is the derived key; reject it if the
//!    alias belongs to a different key; import a new identifier otherwise.
//!
//! Setting up twice with the same secret and alias yields the same identity
//! and writes nothing the second time.

use std::sync::Arc;

use serde_json::json;
use zeroize::Zeroize;

use crate::config::{Chain, WalletConfig};
use crate::crypto::keys::Ed25519KeyPair;
use crate::crypto::random;
use crate::crypto::secret_box::SecretBox;
use crate::error::{Result, VcBoxError};
use crate::storage::{self, Persistence};
use crate::store::records::{Identifier, KeyType, ManagedKey, ManagedPrivateKey};
use crate::store::RecordStore;

/// Name of the key management system that holds wallet keys.
pub const LOCAL_KMS: &str = "local";

/// Upper bound of the number in a generated `Wallet: N` alias.
const MAX_ALIAS_NUMBER: u32 = 9_999_999;

/// An opened wallet.
pub struct Wallet {
    store: RecordStore,
    persistence: Arc<dyn Persistence>,
    identifier: Identifier,
    chains: Vec<Chain>,
    default_chain: Chain,
    secret_box: Option<SecretBox>,
}

impl Wallet {
    /// Open the wallet described by `config`.
    ///
    /// # Errors
    ///
    /// - `VcBoxError::Configuration` if no chain is the default.
    /// - `VcBoxError::InvalidProvider` if a chain's provider URL is unusable.
    /// - `VcBoxError::InvalidKey` for an empty secret or a malformed store
    ///   encryption key.
    /// - `VcBoxError::IdentityMismatch` if the alias already belongs to an
    ///   identity controlled by another key.
    /// - `VcBoxError::Io` if the store location cannot be opened or written.
    pub fn setup(config: &WalletConfig) -> Result<Self> {
        let default_chain = config.default_chain()?.clone();
        for chain in &config.chains {
            chain.validate_provider()?;
        }
        let secret_box = config
            .store_encrypt_key
            .as_deref()
            .map(SecretBox::from_hex)
            .transpose()?;

        let persistence = storage::open_persistence(&config.storage, &config.db_name);
        let mut store = RecordStore::open(Arc::clone(&persistence))?;

        let identifier = identity_from_secret(
            &mut store,
            &config.wallet_secret,
            &default_chain,
            config.wallet_alias.as_deref(),
            secret_box.as_ref(),
        )?;

        Ok(Self {
            store,
            persistence,
            identifier,
            chains: config.chains.clone(),
            default_chain,
            secret_box,
        })
    }

    /// The wallet's own identity.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn did(&self) -> &str {
        &self.identifier.did
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut RecordStore {
        &mut self.store
    }

    /// The key wrapping private keys at rest, if configured.
    pub fn secret_box(&self) -> Option<&SecretBox> {
        self.secret_box.as_ref()
    }

    pub fn chains(&self) -> &[Chain] {
        &self.chains
    }

    pub fn default_chain(&self) -> &Chain {
        &self.default_chain
    }

    /// Where the record store is persisted.
    pub fn location(&self) -> String {
        self.persistence.location()
    }

    /// Erase all wallet state.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::NotFound` if the store location no longer exists.
    pub fn remove_store(self) -> Result<()> {
        let location = self.persistence.location();
        self.persistence.remove()?;
        log::info!("removed wallet store at {location}");
        Ok(())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("did", &self.identifier.did)
            .field("location", &self.persistence.location())
            .field("default_chain", &self.default_chain.name)
            .finish_non_exhaustive()
    }
}

/// Resolve the identity for `secret` on `chain`, importing it if needed.
///
/// Without an alias a random `Wallet: N` alias is generated, so every call
/// without one imports a fresh identifier record.
///
/// # Errors
///
/// Returns `VcBoxError::IdentityMismatch` if `alias` is taken by an
/// identity whose controller key is not the one derived from `secret`.
pub fn identity_from_secret(
    store: &mut RecordStore,
    secret: &str,
    chain: &Chain,
    alias: Option<&str>,
    secret_box: Option<&SecretBox>,
) -> Result<Identifier> {
    let key_pair = Ed25519KeyPair::from_secret(secret)?;
    let kid = key_pair.public_key_hex();
    let alias = alias.map_or_else(random_wallet_alias, str::to_string);

    if let Some(existing) = store.identifier_by_alias(&alias)? {
        if existing.controller_key_id.as_deref() != Some(kid.as_str()) {
            return Err(VcBoxError::IdentityMismatch { alias });
        }
        log::info!("reusing identifier {} for alias '{alias}'", existing.did);
        return Ok(existing);
    }

    let provider = chain.namespace();
    let identifier = Identifier {
        did: format!("{provider}:0x{kid}"),
        alias: Some(alias),
        provider,
        controller_key_id: Some(kid.clone()),
        keys: vec![ManagedKey {
            kid: kid.clone(),
            kms: LOCAL_KMS.to_string(),
            key_type: KeyType::Ed25519,
            public_key_hex: kid.clone(),
            meta: Some(json!({ "algorithms": ["EdDSA", "Ed25519"] })),
        }],
        services: Vec::new(),
    };

    let mut private_key = ManagedPrivateKey {
        alias: kid,
        key_type: KeyType::Ed25519,
        private_key_hex: key_pair.private_key_hex(),
    };
    let imported = store.import_identifier(
        &identifier,
        std::slice::from_ref(&private_key),
        secret_box,
    );
    private_key.private_key_hex.zeroize();
    imported?;

    Ok(identifier)
}

fn random_wallet_alias() -> String {
    format!("Wallet: {}", random::random_in_range(MAX_ALIAS_NUMBER))
}
