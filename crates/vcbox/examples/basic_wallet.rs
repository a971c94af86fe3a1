//! Basic Wallet — open a wallet, store a credential, reopen, remove.
//!
//! Run with:
//!   cargo run --example basic_wallet -p vcbox

use serde_json::json;

use vcbox::config::{Chain, Provider, StorageKind, WalletConfig};
use vcbox::{Table, Wallet};

fn main() -> vcbox::Result<()> {
    let dir = std::env::temp_dir().join(format!("vcbox-demo-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;

    // ── 1. Set up the wallet ────────────────────────────────────────────────
    //
    // The identity is derived from the secret; the alias makes setup
    // idempotent across runs.
    let mut config = WalletConfig::new("demo", "correct horse battery staple");
    config.wallet_alias = Some("demo".to_string());
    config.chains.push(Chain {
        name: "sepolia".to_string(),
        chain_id: 11_155_111,
        default: true,
        provider: Provider {
            url: "https://rpc.sepolia.org".to_string(),
            network: None,
        },
        did_registry: None,
    });
    config.storage = StorageKind::File { dir: dir.clone() };

    let mut wallet = Wallet::setup(&config)?;
    println!("Wallet opened");
    println!("  DID:   {}", wallet.did());
    println!("  Store: {}", wallet.location());
    println!();

    // ── 2. Store a credential ───────────────────────────────────────────────
    let credential = json!({
        "@context": ["https://www.w3.org/2018/credentials/v1"],
        "type": ["VerifiableCredential"],
        "issuer": "did:example:university",
        "issuanceDate": "2024-06-01T00:00:00Z",
        "credentialSubject": {"id": wallet.did(), "degree": "BSc"}
    });
    let hash = wallet.store_mut().save_credential(&credential)?;
    println!("Credential stored: {hash}");
    for claim in wallet.store().claims_for(&hash)? {
        println!("  claim {} = {}", claim.claim_type, claim.value);
    }
    println!();

    // ── 3. Reopen ───────────────────────────────────────────────────────────
    drop(wallet);
    let wallet = Wallet::setup(&config)?;
    println!(
        "Reopened: {} identifier(s), {} credential(s)",
        wallet.store().len(Table::Dids),
        wallet.store().len(Table::Credentials)
    );

    // ── 4. Remove ───────────────────────────────────────────────────────────
    wallet.remove_store()?;
    std::fs::remove_dir(&dir)?;
    println!("Store removed");

    Ok(())
}
