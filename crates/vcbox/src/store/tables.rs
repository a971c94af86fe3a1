//! Typed table access for the identifier, key, credential and message
//! collaborators.
//!
//! Everything here is built on [`RecordStore::apply`], so operations that
//! touch several tables (importing an identifier, saving a credential with
//! its claims) reach the change listener as a single event.

use serde_json::Value;
use zeroize::Zeroize;

use super::records::{
    ClaimEntry, CredentialEntry, Identifier, ManagedKey, ManagedPrivateKey, Message,
    PresentationEntry,
};
use super::{to_value, Mutation, RecordStore, Table};
use crate::crypto::secret_box::SecretBox;
use crate::error::{Result, VcBoxError};

// ── Identifiers ───────────────────────────────────────────────────────────────

impl RecordStore {
    /// Store an identifier, its public keys, and the matching private keys
    /// in one commit.
    ///
    /// Private keys are wrapped with `secret_box` when one is given.
    pub fn import_identifier(
        &mut self,
        identifier: &Identifier,
        private_keys: &[ManagedPrivateKey],
        secret_box: Option<&SecretBox>,
    ) -> Result<()> {
        let mut mutations = vec![Mutation::put(
            Table::Dids,
            identifier.did.clone(),
            to_value(identifier)?,
        )];
        for key in &identifier.keys {
            mutations.push(Mutation::put(Table::Keys, key.kid.clone(), to_value(key)?));
        }
        for private_key in private_keys {
            mutations.push(Mutation::put(
                Table::PrivateKeys,
                private_key.alias.clone(),
                sealed_private_key(private_key, secret_box)?,
            ));
        }

        self.apply(mutations)?;
        log::info!("imported identifier {}", identifier.did);
        Ok(())
    }

    /// Look up an identifier by DID.
    pub fn identifier(&self, did: &str) -> Result<Identifier> {
        self.get_as(Table::Dids, did)
    }

    /// Find the identifier carrying `alias`.
    ///
    /// A miss is `Ok(None)`; errors are reserved for records that fail to
    /// decode.
    pub fn identifier_by_alias(&self, alias: &str) -> Result<Option<Identifier>> {
        for value in self.snapshot.dids.values() {
            if value.get("alias").and_then(Value::as_str) == Some(alias) {
                let identifier = serde_json::from_value(value.clone())
                    .map_err(|e| VcBoxError::SerializationError(format!("dids: {e}")))?;
                return Ok(Some(identifier));
            }
        }
        Ok(None)
    }

    /// All stored identifiers, ordered by DID.
    pub fn identifiers(&self) -> Result<Vec<Identifier>> {
        self.keys(Table::Dids)
            .map(|did| self.identifier(did))
            .collect()
    }

    /// Remove an identifier together with its keys and private keys.
    pub fn delete_identifier(&mut self, did: &str) -> Result<()> {
        let mut mutations = vec![Mutation::delete(Table::Dids, did)];
        if let Ok(identifier) = self.identifier(did) {
            for kid in identifier.key_ids() {
                mutations.push(Mutation::delete(Table::Keys, kid));
                mutations.push(Mutation::delete(Table::PrivateKeys, kid));
            }
        }
        self.apply(mutations)
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    pub fn key(&self, kid: &str) -> Result<ManagedKey> {
        self.get_as(Table::Keys, kid)
    }

    pub fn save_key(&mut self, key: &ManagedKey) -> Result<()> {
        self.put_as(Table::Keys, key.kid.clone(), key)
    }

    /// Remove a key and its private half.
    pub fn delete_key(&mut self, kid: &str) -> Result<()> {
        self.apply([
            Mutation::delete(Table::Keys, kid),
            Mutation::delete(Table::PrivateKeys, kid),
        ])
    }

    // ── Private keys ──────────────────────────────────────────────────────────

    /// Store private key material under its alias, wrapped with
    /// `secret_box` when given.
    pub fn save_private_key(
        &mut self,
        key: &ManagedPrivateKey,
        secret_box: Option<&SecretBox>,
    ) -> Result<()> {
        let value = sealed_private_key(key, secret_box)?;
        self.put(Table::PrivateKeys, key.alias.clone(), value)
    }

    /// Load private key material, unwrapping it with `secret_box` when given.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::NotFound` if absent or
    /// `VcBoxError::DecryptionFailed` if `secret_box` holds the wrong key.
    pub fn private_key(
        &self,
        alias: &str,
        secret_box: Option<&SecretBox>,
    ) -> Result<ManagedPrivateKey> {
        let mut key: ManagedPrivateKey = self.get_as(Table::PrivateKeys, alias)?;
        if let Some(secret_box) = secret_box {
            let plain = secret_box.decrypt(&key.private_key_hex)?;
            key.private_key_hex.zeroize();
            key.private_key_hex = plain;
        }
        Ok(key)
    }

    // ── Credentials & claims ──────────────────────────────────────────────────

    /// Store a verifiable credential and one claim per `credentialSubject`
    /// property. Returns the credential hash.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::InvalidDocument` if the credential lacks an
    /// issuer, issuance date, or subject object.
    pub fn save_credential(&mut self, credential: &Value) -> Result<String> {
        let hash = content_hash(credential)?;
        let issuer = issuer_of(credential.get("issuer"))
            .ok_or_else(|| VcBoxError::InvalidDocument("credential has no issuer".into()))?;
        let issuance_date = credential
            .get("issuanceDate")
            .or_else(|| credential.get("validFrom"))
            .and_then(Value::as_str)
            .ok_or_else(|| VcBoxError::InvalidDocument("credential has no issuance date".into()))?
            .to_string();
        let subject_doc = credential
            .get("credentialSubject")
            .and_then(Value::as_object)
            .ok_or_else(|| {
                VcBoxError::InvalidDocument("credentialSubject must be an object".into())
            })?;

        let entry = CredentialEntry {
            hash: hash.clone(),
            id: str_field(credential, "id"),
            issuer,
            subject: subject_doc.get("id").and_then(Value::as_str).map(String::from),
            issuance_date,
            expiration_date: str_field(credential, "expirationDate")
                .or_else(|| str_field(credential, "validUntil")),
            context: string_list(credential.get("@context")),
            types: string_list(credential.get("type")),
            parsed_credential: credential.clone(),
        };

        let mut mutations = Vec::with_capacity(subject_doc.len() + 1);
        for (claim_type, value) in subject_doc.iter().filter(|(k, _)| k.as_str() != "id") {
            let claim = ClaimEntry {
                hash: blake3::hash(format!("{hash}:{claim_type}").as_bytes())
                    .to_hex()
                    .to_string(),
                issuer: entry.issuer.clone(),
                subject: entry.subject.clone(),
                credential_hash: hash.clone(),
                issuance_date: entry.issuance_date.clone(),
                expiration_date: entry.expiration_date.clone(),
                context: entry.context.clone(),
                credential_type: entry.types.clone(),
                claim_type: claim_type.clone(),
                value: value.clone(),
                is_obj: value.is_object() || value.is_array(),
            };
            mutations.push(Mutation::put(Table::Claims, claim.hash.clone(), to_value(&claim)?));
        }
        mutations.push(Mutation::put(
            Table::Credentials,
            hash.clone(),
            to_value(&entry)?,
        ));

        self.apply(mutations)?;
        Ok(hash)
    }

    pub fn credential(&self, hash: &str) -> Result<CredentialEntry> {
        self.get_as(Table::Credentials, hash)
    }

    /// All stored credentials, ordered by hash.
    pub fn credentials(&self) -> Result<Vec<CredentialEntry>> {
        self.keys(Table::Credentials)
            .map(|hash| self.credential(hash))
            .collect()
    }

    /// Claims extracted from the credential with `credential_hash`.
    pub fn claims_for(&self, credential_hash: &str) -> Result<Vec<ClaimEntry>> {
        let mut claims = Vec::new();
        for hash in self.keys(Table::Claims) {
            let claim: ClaimEntry = self.get_as(Table::Claims, hash)?;
            if claim.credential_hash == credential_hash {
                claims.push(claim);
            }
        }
        Ok(claims)
    }

    /// Remove a credential and every claim extracted from it.
    pub fn delete_credential(&mut self, hash: &str) -> Result<()> {
        let mut mutations: Vec<Mutation> = self
            .claims_for(hash)?
            .into_iter()
            .map(|claim| Mutation::delete(Table::Claims, claim.hash))
            .collect();
        mutations.push(Mutation::delete(Table::Credentials, hash));
        self.apply(mutations)
    }

    // ── Presentations ─────────────────────────────────────────────────────────

    /// Store a verifiable presentation. Returns the presentation hash.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::InvalidDocument` if the presentation has no holder.
    pub fn save_presentation(&mut self, presentation: &Value) -> Result<String> {
        let hash = content_hash(presentation)?;
        let holder = issuer_of(presentation.get("holder"))
            .ok_or_else(|| VcBoxError::InvalidDocument("presentation has no holder".into()))?;

        let credentials = match presentation.get("verifiableCredential") {
            Some(Value::Array(items)) => items.iter().map(content_hash).collect::<Result<_>>()?,
            Some(single) if !single.is_null() => vec![content_hash(single)?],
            _ => Vec::new(),
        };

        let entry = PresentationEntry {
            hash: hash.clone(),
            id: str_field(presentation, "id"),
            holder,
            verifier: string_list(presentation.get("verifier")),
            issuance_date: str_field(presentation, "issuanceDate"),
            expiration_date: str_field(presentation, "expirationDate"),
            context: string_list(presentation.get("@context")),
            types: string_list(presentation.get("type")),
            credentials,
            parsed_presentation: presentation.clone(),
        };
        self.put_as(Table::Presentations, hash.clone(), &entry)?;
        Ok(hash)
    }

    pub fn presentation(&self, hash: &str) -> Result<PresentationEntry> {
        self.get_as(Table::Presentations, hash)
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Store a message under its id. Returns the id.
    pub fn save_message(&mut self, message: &Message) -> Result<String> {
        self.put_as(Table::Messages, message.id.clone(), message)?;
        Ok(message.id.clone())
    }

    pub fn message(&self, id: &str) -> Result<Message> {
        self.get_as(Table::Messages, id)
    }

    /// All stored messages, ordered by id.
    pub fn messages(&self) -> Result<Vec<Message>> {
        self.keys(Table::Messages).map(|id| self.message(id)).collect()
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn sealed_private_key(key: &ManagedPrivateKey, secret_box: Option<&SecretBox>) -> Result<Value> {
    match secret_box {
        Some(secret_box) => {
            let sealed = ManagedPrivateKey {
                alias: key.alias.clone(),
                key_type: key.key_type,
                private_key_hex: secret_box.encrypt(&key.private_key_hex)?,
            };
            to_value(&sealed)
        }
        None => to_value(key),
    }
}

/// BLAKE3 of the document's JSON encoding, hex encoded.
fn content_hash(document: &Value) -> Result<String> {
    let bytes =
        serde_json::to_vec(document).map_err(|e| VcBoxError::SerializationError(e.to_string()))?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Issuers and holders appear either as a DID string or an object with `id`.
fn issuer_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

fn str_field(document: &Value, field: &str) -> Option<String> {
    document.get(field).and_then(Value::as_str).map(String::from)
}

/// A single string or an array of strings, flattened to a list.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
