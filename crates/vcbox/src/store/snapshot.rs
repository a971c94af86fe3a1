//! Snapshot — the complete set of record tables at one instant.
//!
//! A snapshot is the unit of persistence. Its JSON form is a single object
//! with exactly seven top-level fields, written in this order:
//!
//! ```json
//! {
//!     "dids": {},
//!     "keys": {},
//!     "privateKeys": {},
//!     "credentials": {},
//!     "claims": {},
//!     "presentations": {},
//!     "messages": {}
//! }
//! ```
//!
//! Missing fields deserialize as empty tables and unknown fields are
//! ignored, so files written before a table existed still load.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{Result, VcBoxError};

/// One record table: identifier string to JSON record.
pub type TableMap = BTreeMap<String, Value>;

// ── Table ─────────────────────────────────────────────────────────────────────

/// The seven record tables of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Table {
    /// DID string → identity record.
    Dids,
    /// Key id → public key metadata.
    Keys,
    /// Key id → private key material.
    PrivateKeys,
    /// Credential hash → credential entry.
    Credentials,
    /// Claim hash → claim entry.
    Claims,
    /// Presentation hash → presentation entry.
    Presentations,
    /// Message id → message envelope.
    Messages,
}

impl Table {
    /// Every table, in wire order.
    pub const ALL: [Table; 7] = [
        Table::Dids,
        Table::Keys,
        Table::PrivateKeys,
        Table::Credentials,
        Table::Claims,
        Table::Presentations,
        Table::Messages,
    ];

    /// The field name used in the snapshot's JSON form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Dids => "dids",
            Table::Keys => "keys",
            Table::PrivateKeys => "privateKeys",
            Table::Credentials => "credentials",
            Table::Claims => "claims",
            Table::Presentations => "presentations",
            Table::Messages => "messages",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = VcBoxError;

    /// Accepts the wire name (`privateKeys`) as well as the snake-case
    /// spelling (`private_keys`).
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dids" => Ok(Table::Dids),
            "keys" => Ok(Table::Keys),
            "privateKeys" | "private_keys" => Ok(Table::PrivateKeys),
            "credentials" => Ok(Table::Credentials),
            "claims" => Ok(Table::Claims),
            "presentations" => Ok(Table::Presentations),
            "messages" => Ok(Table::Messages),
            other => Err(VcBoxError::InvalidTable(other.to_string())),
        }
    }
}

// ── Snapshot ──────────────────────────────────────────────────────────────────

/// All seven tables. Every table is always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(deserialize_with = "table_or_empty")]
    pub dids: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub keys: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub private_keys: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub credentials: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub claims: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub presentations: TableMap,
    #[serde(deserialize_with = "table_or_empty")]
    pub messages: TableMap,
}

/// A `null` table reads as an empty one, like an absent table.
fn table_or_empty<'de, D>(deserializer: D) -> std::result::Result<TableMap, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TableMap>::deserialize(deserializer)?.unwrap_or_default())
}

impl Snapshot {
    /// An all-empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Borrow one table.
    pub fn table(&self, table: Table) -> &TableMap {
        match table {
            Table::Dids => &self.dids,
            Table::Keys => &self.keys,
            Table::PrivateKeys => &self.private_keys,
            Table::Credentials => &self.credentials,
            Table::Claims => &self.claims,
            Table::Presentations => &self.presentations,
            Table::Messages => &self.messages,
        }
    }

    /// Mutably borrow one table.
    pub fn table_mut(&mut self, table: Table) -> &mut TableMap {
        match table {
            Table::Dids => &mut self.dids,
            Table::Keys => &mut self.keys,
            Table::PrivateKeys => &mut self.private_keys,
            Table::Credentials => &mut self.credentials,
            Table::Claims => &mut self.claims,
            Table::Presentations => &mut self.presentations,
            Table::Messages => &mut self.messages,
        }
    }

    /// Total number of records across all tables.
    pub fn record_count(&self) -> usize {
        Table::ALL.iter().map(|t| self.table(*t).len()).sum()
    }

    /// True when every table is empty.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Serialize to the compact JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `VcBoxError::SerializationError` if a record cannot be encoded.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| VcBoxError::SerializationError(e.to_string()))
    }

    /// Parse the JSON wire form.
    ///
    /// Blank input is an empty snapshot. Anything that is not a JSON object
    /// of tables is reported as `VcBoxError::CorruptState`.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }
        serde_json::from_slice(bytes).map_err(|e| VcBoxError::CorruptState(e.to_string()))
    }
}
