//! Address records returned by wallets, and their normalization before they
//! are persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An address as returned by a wallet's address methods.
///
/// `publicKey`, `derivationPath` and `tweakedPublicKey` are sensitive and never
/// persisted. They are kept as raw JSON since wallets disagree on their shape.
/// Every other field lands in `extra` and is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressEntry {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tweaked_public_key: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AddressEntry {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            public_key: None,
            derivation_path: None,
            tweaked_public_key: None,
            extra: Map::new(),
        }
    }

    /// Stacks addresses start with `S` (`SP`, `ST`, `SM`, `SN`).
    pub fn is_stacks(&self) -> bool {
        self.address.starts_with('S')
    }
}

/// An address with the sensitive fields removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAddress {
    pub address: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredAddress {
    pub fn is_stacks(&self) -> bool {
        self.address.starts_with('S')
    }

    /// Value of a preserved field, e.g. `symbol` or `purpose`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

impl From<AddressEntry> for StoredAddress {
    fn from(entry: AddressEntry) -> Self {
        Self {
            address: entry.address,
            extra: entry.extra,
        }
    }
}

/// De-duplicate by address and strip sensitive fields.
///
/// The first entry seen for an address wins and output order follows first
/// occurrence.
pub fn normalize(entries: impl IntoIterator<Item = AddressEntry>) -> Vec<StoredAddress> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.address.clone()))
        .map(StoredAddress::from)
        .collect()
}
