//! vcbox — a local record store for a verifiable-credential wallet.
//!
//! All wallet state (identifiers, keys, credentials, claims, presentations,
//! messages) lives in one in-memory [`Snapshot`]. Every mutation of the
//! [`RecordStore`] notifies a change listener, which by default persists the
//! whole snapshot through a [`Persistence`] backend: a JSON file or a
//! local-storage entry.
//!
//! [`Wallet`] ties a store to an identity derived from a wallet secret.

pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;
pub mod store;
pub mod time;
pub mod wallet;

// Re-export primary types
pub use config::{Chain, Provider, StorageKind, WalletConfig};
pub use crypto::secret_box::SecretBox;
pub use error::{Result, VcBoxError};
pub use storage::json_file::JsonFileStore;
pub use storage::local_storage::{LocalStorage, LocalStorageStore};
pub use storage::{PersistOnChange, Persistence};
pub use store::records::{
    ClaimEntry, CredentialEntry, Identifier, KeyType, ManagedKey, ManagedPrivateKey, Message,
    PresentationEntry, Service,
};
pub use store::{ChangeListener, Mutation, RecordStore, Snapshot, Table, TableMap};
pub use wallet::Wallet;
