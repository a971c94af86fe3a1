//! vcbox CLI — `vcbox` command.
//!
//! Creates a wallet identity from a secret and inspects or edits the
//! wallet's record store table by table.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use vcbox::config::{Chain, Provider, StorageKind, WalletConfig};
use vcbox::{JsonFileStore, Persistence, RecordStore, Table, Wallet};

/// Environment variable holding the wallet secret for `init`.
const SECRET_ENV: &str = "VCBOX_WALLET_SECRET";

// ── Directory helpers ─────────────────────────────────────────────────────────

fn default_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME not set; pass --dir")?;
    Ok(PathBuf::from(home).join(".vcbox"))
}

fn store_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => default_dir(),
    }
}

fn create_store_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create store directory {}", dir.display()))
}

fn open_store(dir: &Path, db: &str) -> Result<RecordStore> {
    let persistence: Arc<dyn Persistence> = Arc::new(JsonFileStore::for_db(dir, db));
    log::debug!("opening store {}", persistence.location());
    RecordStore::open(persistence).context("failed to open record store")
}

/// Open the store only if its file exists; otherwise an empty, unsaved one.
fn open_existing_store(dir: &Path, db: &str) -> Result<RecordStore> {
    if JsonFileStore::for_db(dir, db).path().exists() {
        open_store(dir, db)
    } else {
        Ok(RecordStore::in_memory())
    }
}

fn parse_table(name: &str) -> Result<Table> {
    name.parse::<Table>().map_err(|e| anyhow!("{e}"))
}

// ── Secret helper ─────────────────────────────────────────────────────────────

fn read_secret(prompt: &str) -> Result<String> {
    if let Ok(secret) = std::env::var(SECRET_ENV) {
        return Ok(secret);
    }
    eprint!("{prompt}");
    let mut secret = String::new();
    std::io::stdin()
        .read_line(&mut secret)
        .context("failed to read wallet secret")?;
    Ok(secret.trim().to_string())
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// vcbox CLI — manage a verifiable-credential wallet's local record store.
#[derive(Parser, Debug)]
#[command(
    name = "vcbox",
    about = "vcbox wallet CLI",
    version,
    long_about = "vcbox — wallet record store CLI\n\nCreate a wallet identity from a secret and inspect or edit the\nwallet's tables: dids, keys, privateKeys, credentials, claims,\npresentations and messages."
)]
struct Cli {
    /// Directory holding the store file (default: $HOME/.vcbox)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Database name; the store file is {dir}/{db}.json
    #[arg(long, global = true, default_value = "wallet")]
    db: String,

    /// JSON wallet configuration supplying chains and storage options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or reopen the wallet identity and print its DID
    Init {
        /// Wallet alias (default: a random "Wallet: N")
        #[arg(long)]
        alias: Option<String>,

        /// Default chain name when no --config is given
        #[arg(long, default_value = "mainnet")]
        chain: String,

        /// Chain id of the default chain
        #[arg(long, default_value_t = 1)]
        chain_id: u64,

        /// RPC provider URL of the default chain
        #[arg(long, default_value = "http://localhost:8545")]
        provider: String,
    },

    /// Insert or overwrite a record
    Put {
        /// Table name (dids, keys, privateKeys, credentials, claims, presentations, messages)
        table: String,
        /// Record key
        key: String,
        /// Record value as JSON
        json: String,
    },

    /// Print a record as JSON
    Get { table: String, key: String },

    /// Delete a record (no-op if absent)
    Delete { table: String, key: String },

    /// List the keys of a table
    List { table: String },

    /// Export the whole store as JSON
    Export {
        /// Output file path (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Erase all wallet state
    Remove,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let verbose = cli.verbose;
    let db = cli.db.clone();

    let result = store_dir(cli.dir).and_then(|dir| match cli.command {
        Commands::Init {
            alias,
            chain,
            chain_id,
            provider,
        } => {
            let default_chain = Chain {
                name: chain,
                chain_id,
                default: true,
                provider: Provider {
                    url: provider,
                    network: None,
                },
                did_registry: None,
            };
            cmd_init(
                &dir,
                &db,
                cli.config.as_deref(),
                alias,
                default_chain,
                verbose,
            )
        }
        Commands::Put { table, key, json } => cmd_put(&dir, &db, &table, &key, &json, verbose),
        Commands::Get { table, key } => cmd_get(&dir, &db, &table, &key),
        Commands::Delete { table, key } => cmd_delete(&dir, &db, &table, &key, verbose),
        Commands::List { table } => cmd_list(&dir, &db, &table),
        Commands::Export { output } => cmd_export(&dir, &db, output.as_deref()),
        Commands::Remove => cmd_remove(&dir, &db),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `vcbox init [--alias A] [--chain NAME] [--chain-id N] [--provider URL]`
fn cmd_init(
    dir: &Path,
    db: &str,
    config_path: Option<&Path>,
    alias: Option<String>,
    default_chain: Chain,
    verbose: bool,
) -> Result<()> {
    create_store_dir(dir)?;
    let mut config = match config_path {
        Some(path) => WalletConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let mut config = WalletConfig::new(db, "");
            config.chains.push(default_chain);
            config
        }
    };
    // Flags decide where the store lives.
    config.db_name = db.to_string();
    config.storage = StorageKind::File {
        dir: dir.to_path_buf(),
    };
    if alias.is_some() {
        config.wallet_alias = alias;
    }
    if config.wallet_secret.is_empty() {
        config.wallet_secret = read_secret("Enter wallet secret: ")?;
    }
    if config.wallet_secret.is_empty() {
        return Err(anyhow!("wallet secret cannot be empty"));
    }

    let wallet = Wallet::setup(&config).context("failed to set up wallet")?;

    println!("{}", wallet.did());
    if verbose {
        let identifier = wallet.identifier();
        eprintln!("  Alias: {}", identifier.alias.as_deref().unwrap_or("-"));
        eprintln!("  Chain: {}", wallet.default_chain().name);
        eprintln!("  Store: {}", wallet.location());
    }

    Ok(())
}

/// `vcbox put TABLE KEY JSON`
fn cmd_put(dir: &Path, db: &str, table: &str, key: &str, json: &str, verbose: bool) -> Result<()> {
    let table = parse_table(table)?;
    let value: serde_json::Value =
        serde_json::from_str(json).with_context(|| format!("invalid JSON value: {json}"))?;

    create_store_dir(dir)?;
    let mut store = open_store(dir, db)?;
    store
        .put(table, key, value)
        .with_context(|| format!("failed to store {table}/{key}"))?;

    if verbose {
        eprintln!("Stored {table}/{key}");
    }
    Ok(())
}

/// `vcbox get TABLE KEY`
fn cmd_get(dir: &Path, db: &str, table: &str, key: &str) -> Result<()> {
    let table = parse_table(table)?;
    let store = open_existing_store(dir, db)?;
    let value = store.get(table, key)?;
    let json = serde_json::to_string_pretty(value).context("failed to serialize record")?;
    println!("{json}");
    Ok(())
}

/// `vcbox delete TABLE KEY`
fn cmd_delete(dir: &Path, db: &str, table: &str, key: &str, verbose: bool) -> Result<()> {
    let table = parse_table(table)?;
    let mut store = open_existing_store(dir, db)?;
    let existed = store.contains(table, key);
    store
        .delete(table, key)
        .with_context(|| format!("failed to delete {table}/{key}"))?;

    if verbose {
        if existed {
            eprintln!("Deleted {table}/{key}");
        } else {
            eprintln!("No record {table}/{key}");
        }
    }
    Ok(())
}

/// `vcbox list TABLE`
fn cmd_list(dir: &Path, db: &str, table: &str) -> Result<()> {
    let table = parse_table(table)?;
    let store = open_existing_store(dir, db)?;
    for key in store.keys(table) {
        println!("{key}");
    }
    Ok(())
}

/// `vcbox export [--output FILE]`
fn cmd_export(dir: &Path, db: &str, output: Option<&Path>) -> Result<()> {
    let store = open_existing_store(dir, db)?;
    let json =
        serde_json::to_string_pretty(store.snapshot()).context("failed to serialize store")?;

    if let Some(out_path) = output {
        std::fs::write(out_path, &json)
            .with_context(|| format!("failed to write to {}", out_path.display()))?;
        println!(
            "Exported {} record(s) to {}",
            store.snapshot().record_count(),
            out_path.display()
        );
    } else {
        println!("{json}");
    }
    Ok(())
}

/// `vcbox remove`
fn cmd_remove(dir: &Path, db: &str) -> Result<()> {
    let store = JsonFileStore::for_db(dir, db);
    store
        .remove()
        .with_context(|| format!("failed to remove {}", store.location()))?;
    println!("Removed {}", store.location());
    Ok(())
}
