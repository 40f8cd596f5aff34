//! Persisted connection state.
//!
//! After an address request the wallet's addresses are normalized and stored
//! under [`STORAGE_KEY`], split into Stacks and Bitcoin lists.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::address::{normalize, AddressEntry, StoredAddress};
use crate::storage::{Storage, StorageError};

/// Storage key of the session record.
pub const STORAGE_KEY: &str = "@stacks/connect";

/// Addresses grouped by chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAddresses {
    #[serde(default)]
    pub stx: Vec<StoredAddress>,
    #[serde(default)]
    pub btc: Vec<StoredAddress>,
}

/// The persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectSession {
    pub addresses: SessionAddresses,
    /// Library version that wrote the record.
    pub version: String,
    /// Milliseconds since the unix epoch.
    pub updated_at: i64,
}

impl ConnectSession {
    /// Build a session from raw wallet addresses.
    pub fn from_entries(entries: impl IntoIterator<Item = AddressEntry>) -> Self {
        let (stx, btc) = normalize(entries)
            .into_iter()
            .partition(StoredAddress::is_stacks);
        Self {
            addresses: SessionAddresses { stx, btc },
            version: env!("CARGO_PKG_VERSION").to_string(),
            updated_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.stx.is_empty() && self.addresses.btc.is_empty()
    }
}

/// Reads and writes the session record through a [`Storage`].
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Load the stored session.
    ///
    /// An unreadable record is logged and treated as absent.
    pub fn load(&self) -> Result<Option<ConnectSession>, StorageError> {
        let Some(raw) = self.storage.get(STORAGE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "discarding unreadable session record");
                Ok(None)
            }
        }
    }

    /// Normalize `entries` and store them, replacing any previous session.
    pub fn save_addresses(
        &self,
        entries: impl IntoIterator<Item = AddressEntry>,
    ) -> Result<ConnectSession, StorageError> {
        let session = ConnectSession::from_entries(entries);
        self.save(&session)?;
        Ok(session)
    }

    pub fn save(&self, session: &ConnectSession) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        self.storage.set(STORAGE_KEY, &raw)?;
        debug!(
            stx = session.addresses.stx.len(),
            btc = session.addresses.btc.len(),
            "session saved"
        );
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(STORAGE_KEY)
    }

    /// True when a session with at least one address is stored.
    pub fn is_connected(&self) -> Result<bool, StorageError> {
        Ok(self.load()?.is_some_and(|s| !s.is_empty()))
    }
}
