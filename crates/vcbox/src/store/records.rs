//! Typed records kept in the store's tables.
//!
//! Field names follow the camelCase JSON that identity and credential
//! tooling already exchanges, so records written by other wallets load
//! without translation. The store itself treats every record as opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::random;

/// Key algorithms a managed key can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    Ed25519,
    Secp256k1,
    Secp256r1,
    X25519,
    Bls12381G1,
    Bls12381G2,
}

/// A DID together with the keys and services it controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub did: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// DID method namespace that created this identifier.
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller_key_id: Option<String>,
    #[serde(default)]
    pub keys: Vec<ManagedKey>,
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Identifier {
    /// Ids of every key this identifier references.
    pub fn key_ids(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|k| k.kid.as_str())
    }
}

/// A service endpoint listed on a DID document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub service_endpoint: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Public half of a key held by a key management system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedKey {
    pub kid: String,
    /// Name of the key management system holding the private half.
    pub kms: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub public_key_hex: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Private key material, stored under the key's alias.
///
/// `private_key_hex` holds the wrapped form when the store is configured
/// with a [`SecretBox`](crate::crypto::secret_box::SecretBox).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedPrivateKey {
    pub alias: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub private_key_hex: String,
}

impl std::fmt::Debug for ManagedPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedPrivateKey")
            .field("alias", &self.alias)
            .field("key_type", &self.key_type)
            .field("private_key_hex", &"<redacted>")
            .finish()
    }
}

/// A stored verifiable credential and the fields it is queried by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub issuance_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub parsed_credential: Value,
}

/// One `credentialSubject` property, foreign-keyed to its credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimEntry {
    pub hash: String,
    pub issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub credential_hash: String,
    pub issuance_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub context: Vec<String>,
    pub credential_type: Vec<String>,
    /// Property name in `credentialSubject`.
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: Value,
    pub is_obj: bool,
}

/// A stored verifiable presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationEntry {
    pub hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub holder: String,
    #[serde(default)]
    pub verifier: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Hashes of the credentials embedded in the presentation.
    #[serde(default)]
    pub credentials: Vec<String>,
    pub parsed_presentation: Value,
}

/// A protocol message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl Message {
    /// A new message with a random id, stamped with the current time.
    pub fn new(message_type: impl Into<String>, data: Option<Value>) -> Self {
        let id: [u8; 16] = random::random_bytes();
        Self {
            id: hex::encode(id),
            message_type: message_type.into(),
            created_at: Some(crate::time::now_rfc3339()),
            expires_at: None,
            thread_id: None,
            from: None,
            to: None,
            raw: None,
            data,
            metadata: None,
        }
    }
}
