//! Integration test: full end-to-end workflow.
//!
//! Tests the complete lifecycle:
//! 1. Cold start on an empty directory
//! 2. Raw table writes persisted in the exact wire form
//! 3. Reload in a fresh store
//! 4. Wallet identity import and credential storage
//! 5. Removal of the whole store

use std::sync::Arc;

use serde_json::json;

use vcbox::config::{Chain, Provider, StorageKind, WalletConfig};
use vcbox::{JsonFileStore, Persistence, RecordStore, Table, VcBoxError, Wallet};

const EMPTY_WIRE: &str = r#"{"dids":{},"keys":{},"privateKeys":{},"credentials":{},"claims":{},"presentations":{},"messages":{}}"#;

fn open(dir: &std::path::Path) -> (Arc<dyn Persistence>, RecordStore) {
    let persistence: Arc<dyn Persistence> = Arc::new(JsonFileStore::for_db(dir, "wallet"));
    let store = RecordStore::open(Arc::clone(&persistence)).unwrap();
    (persistence, store)
}

fn wallet_config(dir: &std::path::Path, secret: &str) -> WalletConfig {
    let mut config = WalletConfig::new("wallet", secret);
    config.wallet_alias = Some("Wallet: 7".to_string());
    config.chains.push(Chain {
        name: "mainnet".to_string(),
        chain_id: 1,
        default: true,
        provider: Provider {
            url: "https://rpc.example.org".to_string(),
            network: None,
        },
        did_registry: None,
    });
    config.storage = StorageKind::File {
        dir: dir.to_path_buf(),
    };
    config
}

#[test]
fn full_workflow_wallet_json_round_trip_and_removal() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("wallet.json");

    // ── Step 1: Cold start ──────────────────────────────────────────────
    let (persistence, mut store) = open(tmp.path());
    assert!(path.exists(), "load should create the store file");
    assert!(store.snapshot().is_empty());

    // ── Step 2: Single put is persisted verbatim ────────────────────────
    store
        .put(Table::Dids, "did:example:abc", json!({"alias": "Wallet: 123"}))
        .unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"dids":{"did:example:abc":{"alias":"Wallet: 123"}},"keys":{},"privateKeys":{},"credentials":{},"claims":{},"presentations":{},"messages":{}}"#
    );

    // ── Step 3: Fresh store sees the same state ─────────────────────────
    drop(store);
    let (_, reloaded) = open(tmp.path());
    assert_eq!(
        reloaded.get(Table::Dids, "did:example:abc").unwrap(),
        &json!({"alias": "Wallet: 123"})
    );

    // ── Step 4: Delete back to empty ────────────────────────────────────
    let mut reloaded = reloaded;
    reloaded.delete(Table::Dids, "did:example:abc").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), EMPTY_WIRE);

    // ── Step 5: Removal ─────────────────────────────────────────────────
    persistence.remove().unwrap();
    assert!(!path.exists());
    assert!(matches!(persistence.remove(), Err(VcBoxError::NotFound(_))));
}

#[test]
fn full_workflow_wallet_identity_and_credentials() {
    let tmp = tempfile::tempdir().unwrap();

    // ── Step 1: Set up the wallet ───────────────────────────────────────
    let mut wallet = Wallet::setup(&wallet_config(tmp.path(), "workflow secret")).unwrap();
    let did = wallet.did().to_string();
    assert!(did.starts_with("did:ethr:0x"), "mainnet DIDs have no network part: {did}");

    // ── Step 2: Store a credential issued to the wallet ─────────────────
    let credential = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiableCredential", "EmailCredential"],
        "issuer": {"id": "did:example:issuer"},
        "issuanceDate": "2024-01-01T00:00:00Z",
        "credentialSubject": {"id": did, "email": "holder@example.org", "verified": true},
        "proof": {"type": "JwtProof2020", "jwt": "eyJ..."}
    });
    let hash = wallet.store_mut().save_credential(&credential).unwrap();
    assert_eq!(wallet.store().claims_for(&hash).unwrap().len(), 2);

    // ── Step 3: Reopen and find everything again ────────────────────────
    drop(wallet);
    let wallet = Wallet::setup(&wallet_config(tmp.path(), "workflow secret")).unwrap();
    assert_eq!(wallet.did(), did);

    let stored = wallet.store().credential(&hash).unwrap();
    assert_eq!(stored.issuer, "did:example:issuer");
    assert_eq!(stored.parsed_credential, credential);
    assert_eq!(wallet.store().identifiers().unwrap().len(), 1);

    // ── Step 4: Remove the wallet ───────────────────────────────────────
    wallet.remove_store().unwrap();
    assert!(!tmp.path().join("wallet.json").exists());
}

#[test]
fn full_workflow_two_wallets_one_directory() {
    let tmp = tempfile::tempdir().unwrap();

    let mut alice = wallet_config(tmp.path(), "alice secret");
    alice.db_name = "alice".to_string();
    let mut bob = wallet_config(tmp.path(), "bob secret");
    bob.db_name = "bob".to_string();

    let alice = Wallet::setup(&alice).unwrap();
    let bob = Wallet::setup(&bob).unwrap();

    assert_ne!(alice.did(), bob.did());
    assert_eq!(alice.store().len(Table::Dids), 1);
    assert_eq!(bob.store().len(Table::Dids), 1);
    assert!(tmp.path().join("alice.json").exists());
    assert!(tmp.path().join("bob.json").exists());
}
