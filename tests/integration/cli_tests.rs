//! Integration tests for the CLI binary.
//!
//! This test is registered as a [[test]] in the vcbox-cli crate so that
//! CARGO_BIN_EXE_vcbox is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `vcbox` binary.
fn vcbox_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vcbox"))
}

/// Run `vcbox --dir DIR ARGS...` with a scrubbed secret environment.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    vcbox_binary()
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("VCBOX_WALLET_SECRET")
        .output()
        .expect("failed to execute vcbox")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn cli_responds_to_help() {
    let output = vcbox_binary()
        .arg("--help")
        .output()
        .expect("failed to execute vcbox --help");

    assert!(
        output.status.success(),
        "vcbox --help should exit with success, stderr: {}",
        stderr(&output)
    );
    assert!(
        stdout(&output).contains("Usage"),
        "vcbox --help output should contain usage information, got: {}",
        stdout(&output)
    );
}

#[test]
fn cli_responds_to_version() {
    let output = vcbox_binary()
        .arg("--version")
        .output()
        .expect("failed to execute vcbox --version");

    assert!(output.status.success());
    assert!(
        stdout(&output).contains("0.1"),
        "vcbox --version should contain version info, got: {}",
        stdout(&output)
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = vcbox_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute vcbox");

    assert!(
        !output.status.success(),
        "vcbox with unknown flag should exit with error"
    );
}

#[test]
fn cli_put_get_list_delete() {
    let dir = tempfile::tempdir().unwrap();

    let put = run_in(
        dir.path(),
        &["put", "dids", "did:example:abc", r#"{"alias":"Wallet: 123"}"#],
    );
    assert!(put.status.success(), "put failed: {}", stderr(&put));

    let raw = std::fs::read_to_string(dir.path().join("wallet.json")).unwrap();
    assert_eq!(
        raw,
        r#"{"dids":{"did:example:abc":{"alias":"Wallet: 123"}},"keys":{},"privateKeys":{},"credentials":{},"claims":{},"presentations":{},"messages":{}}"#
    );

    let get = run_in(dir.path(), &["get", "dids", "did:example:abc"]);
    assert!(get.status.success(), "get failed: {}", stderr(&get));
    let value: serde_json::Value = serde_json::from_str(&stdout(&get)).unwrap();
    assert_eq!(value["alias"], "Wallet: 123");

    let list = run_in(dir.path(), &["list", "dids"]);
    assert_eq!(stdout(&list).trim(), "did:example:abc");

    let delete = run_in(dir.path(), &["delete", "dids", "did:example:abc"]);
    assert!(delete.status.success());
    let list = run_in(dir.path(), &["list", "dids"]);
    assert!(stdout(&list).trim().is_empty());
}

#[test]
fn cli_get_missing_record_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["get", "keys", "nope"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error:"), "{}", stderr(&output));
}

#[test]
fn cli_rejects_unknown_table() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["list", "widgets"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("widgets"));
}

#[test]
fn cli_rejects_invalid_json_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["put", "keys", "k1", "{not json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid JSON"));
}

#[test]
fn cli_init_prints_did_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let init = |dir: &Path| {
        vcbox_binary()
            .arg("--dir")
            .arg(dir)
            .args(["init", "--alias", "main", "--chain", "goerli", "--chain-id", "5"])
            .env("VCBOX_WALLET_SECRET", "cli test secret")
            .output()
            .expect("failed to execute vcbox init")
    };

    let first = init(dir.path());
    assert!(first.status.success(), "init failed: {}", stderr(&first));
    let did = stdout(&first).trim().to_string();
    assert!(did.starts_with("did:ethr:goerli:0x"), "unexpected DID {did}");

    let second = init(dir.path());
    assert!(second.status.success());
    assert_eq!(stdout(&second).trim(), did);

    let list = run_in(dir.path(), &["list", "dids"]);
    assert_eq!(stdout(&list).trim(), did);
}

#[test]
fn cli_init_rejects_bad_provider() {
    let dir = tempfile::tempdir().unwrap();
    let output = vcbox_binary()
        .arg("--dir")
        .arg(dir.path())
        .args(["init", "--provider", "localhost"])
        .env("VCBOX_WALLET_SECRET", "cli test secret")
        .output()
        .expect("failed to execute vcbox init");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    run_in(dir.path(), &["put", "messages", "m1", r#"{"type":"ping"}"#]);

    let out = dir.path().join("export.json");
    let output = run_in(dir.path(), &["export", "--output", out.to_str().unwrap()]);
    assert!(output.status.success(), "export failed: {}", stderr(&output));

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(exported["messages"]["m1"]["type"], "ping");
    assert_eq!(exported["dids"], serde_json::json!({}));
}

#[test]
fn cli_remove() {
    let dir = tempfile::tempdir().unwrap();
    run_in(dir.path(), &["put", "keys", "k1", "{}"]);
    assert!(dir.path().join("wallet.json").exists());

    let output = run_in(dir.path(), &["remove"]);
    assert!(output.status.success(), "remove failed: {}", stderr(&output));
    assert!(!dir.path().join("wallet.json").exists());

    let again = run_in(dir.path(), &["remove"]);
    assert_eq!(again.status.code(), Some(1));
}

#[test]
fn cli_separate_databases() {
    let dir = tempfile::tempdir().unwrap();
    run_in(dir.path(), &["--db", "alpha", "put", "keys", "k1", "{}"]);

    assert!(dir.path().join("alpha.json").exists());
    assert!(!dir.path().join("wallet.json").exists());

    let list = run_in(dir.path(), &["--db", "beta", "list", "keys"]);
    assert!(stdout(&list).trim().is_empty());
}

#[test]
fn cli_read_commands_do_not_create_store_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("not-yet");

    let list = run_in(&missing, &["list", "dids"]);
    assert!(list.status.success(), "list failed: {}", stderr(&list));
    assert!(stdout(&list).trim().is_empty());

    let get = run_in(&missing, &["get", "dids", "did:x"]);
    assert_eq!(get.status.code(), Some(1));

    let export = run_in(&missing, &["export"]);
    assert!(export.status.success(), "export failed: {}", stderr(&export));

    let delete = run_in(&missing, &["delete", "dids", "did:x"]);
    assert!(delete.status.success(), "delete failed: {}", stderr(&delete));

    assert!(!missing.exists(), "read-only commands created {}", missing.display());
}

#[test]
fn cli_remove_missing_store_leaves_no_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("not-yet");

    let output = run_in(&missing, &["remove"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!missing.exists());
}

#[test]
fn cli_put_creates_store_dir() {
    let tmp = tempfile::tempdir().unwrap();
    let nested = tmp.path().join("a").join("b");

    let output = run_in(&nested, &["put", "keys", "k1", "{}"]);
    assert!(output.status.success(), "put failed: {}", stderr(&output));
    assert!(nested.join("wallet.json").exists());
}
