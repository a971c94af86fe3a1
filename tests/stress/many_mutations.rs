//! Stress tests: many mutations, every one persisted before returning.

use std::sync::{Arc, Mutex};

use serde_json::json;

use vcbox::{
    JsonFileStore, Message, Mutation, Persistence, RecordStore, Result, Snapshot, Table,
};

const RECORDS: usize = 500;

fn file_store(dir: &std::path::Path) -> (Arc<dyn Persistence>, RecordStore) {
    let persistence: Arc<dyn Persistence> = Arc::new(JsonFileStore::for_db(dir, "stress"));
    let store = RecordStore::open(Arc::clone(&persistence)).unwrap();
    (persistence, store)
}

#[test]
fn stress_every_put_is_durable() {
    let tmp = tempfile::tempdir().unwrap();
    let (persistence, mut store) = file_store(tmp.path());

    for i in 0..RECORDS {
        let table = Table::ALL[i % Table::ALL.len()];
        store
            .put(table, format!("key-{i:04}"), json!({"i": i}))
            .unwrap();

        if i % 97 == 0 {
            assert_eq!(&persistence.load().unwrap(), store.snapshot());
        }
    }

    assert_eq!(store.snapshot().record_count(), RECORDS);
    assert_eq!(&persistence.load().unwrap(), store.snapshot());
}

#[test]
fn stress_overwrite_same_key_is_last_write_wins() {
    let tmp = tempfile::tempdir().unwrap();
    let (persistence, mut store) = file_store(tmp.path());

    for i in 0..RECORDS {
        store.put(Table::Keys, "hot", json!({"version": i})).unwrap();
    }

    let reloaded = persistence.load().unwrap();
    assert_eq!(reloaded.keys.len(), 1);
    assert_eq!(reloaded.keys["hot"], json!({"version": RECORDS - 1}));
}

#[test]
fn stress_listener_sees_every_transition() {
    let transitions = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&transitions);
    let mut store = RecordStore::new(
        Snapshot::empty(),
        move |old: &Snapshot, new: &Snapshot| -> Result<()> {
            seen.lock()
                .unwrap()
                .push((old.record_count(), new.record_count()));
            Ok(())
        },
    );

    for i in 0..RECORDS {
        store.put(Table::Claims, format!("c{i}"), json!(i)).unwrap();
    }
    for i in 0..RECORDS {
        store.delete(Table::Claims, &format!("c{i}")).unwrap();
    }

    let transitions = transitions.lock().unwrap();
    assert_eq!(transitions.len(), RECORDS * 2);
    assert_eq!(transitions[0], (0, 1));
    assert_eq!(transitions[RECORDS - 1], (RECORDS - 1, RECORDS));
    assert_eq!(transitions[RECORDS * 2 - 1], (1, 0));
}

#[test]
fn stress_large_batch_is_one_save() {
    let tmp = tempfile::tempdir().unwrap();
    let (persistence, mut store) = file_store(tmp.path());

    let batch: Vec<Mutation> = (0..RECORDS)
        .map(|i| {
            let message = Message::new("ping", Some(json!({"seq": i})));
            Mutation::put(Table::Messages, message.id.clone(), json!(message))
        })
        .collect();
    store.apply(batch).unwrap();

    assert_eq!(store.len(Table::Messages), RECORDS);
    assert_eq!(persistence.load().unwrap().messages.len(), RECORDS);
    assert_eq!(store.messages().unwrap().len(), RECORDS);
}

#[test]
fn stress_many_credentials_with_claims() {
    let tmp = tempfile::tempdir().unwrap();
    let (persistence, mut store) = file_store(tmp.path());

    let mut hashes = Vec::new();
    for i in 0..100 {
        let credential = json!({
            "type": ["VerifiableCredential"],
            "issuer": "did:example:issuer",
            "issuanceDate": "2024-01-01T00:00:00Z",
            "credentialSubject": {"id": format!("did:example:{i}"), "score": i, "level": "gold"}
        });
        hashes.push(store.save_credential(&credential).unwrap());
    }
    assert_eq!(store.len(Table::Credentials), 100);
    assert_eq!(store.len(Table::Claims), 200);

    for hash in hashes.iter().step_by(2) {
        store.delete_credential(hash).unwrap();
    }

    let reloaded = persistence.load().unwrap();
    assert_eq!(reloaded.credentials.len(), 50);
    assert_eq!(reloaded.claims.len(), 100);
}
