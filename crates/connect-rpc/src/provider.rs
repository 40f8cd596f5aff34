//! Wallet provider boundary and provider discovery.
//!
//! A provider is whatever carries a JSON-RPC exchange to a wallet (a browser
//! bridge, a native app channel, a test double). Providers are registered
//! explicitly; the selected provider ID is persisted through [`Storage`].

use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use connect_core::storage::{Storage, StorageError};
use connect_core::ResponseError;

/// Storage key of the selected provider ID.
pub const SELECTED_PROVIDER_KEY: &str = "@stacks/connect/provider";

/// A wallet that answers JSON-RPC requests.
pub trait StacksProvider: Send + Sync {
    /// Send one request; resolves with the result or the wallet's error object.
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Option<Value>,
    ) -> BoxFuture<'a, Result<Value, ResponseError>>;
}

/// Descriptive metadata of a wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    /// Unique ID, e.g. `LeatherProvider`.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub web_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_web_store_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mozilla_addons_url: Option<String>,
}

impl ProviderInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            web_url: String::new(),
            chrome_web_store_url: None,
            mozilla_addons_url: None,
        }
    }
}

struct Registered {
    info: ProviderInfo,
    provider: Arc<dyn StacksProvider>,
}

/// Known providers plus the persisted selection.
pub struct ProviderRegistry {
    providers: Vec<Registered>,
    storage: Arc<dyn Storage>,
}

impl ProviderRegistry {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            providers: Vec::new(),
            storage,
        }
    }

    /// Register a provider. A provider with the same ID is replaced.
    pub fn register(&mut self, info: ProviderInfo, provider: Arc<dyn StacksProvider>) {
        info!(id = %info.id, name = %info.name, "registering wallet provider");
        self.providers.retain(|r| r.info.id != info.id);
        self.providers.push(Registered { info, provider });
    }

    /// Metadata of every registered provider, in registration order.
    pub fn list(&self) -> Vec<&ProviderInfo> {
        self.providers.iter().map(|r| &r.info).collect()
    }

    /// Registered providers passing `filter`.
    pub fn list_approved<F>(&self, filter: F) -> Vec<&ProviderInfo>
    where
        F: Fn(&str) -> bool,
    {
        self.providers
            .iter()
            .filter(|r| filter(&r.info.id))
            .map(|r| &r.info)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn StacksProvider>> {
        self.providers
            .iter()
            .find(|r| r.info.id == id)
            .map(|r| r.provider.clone())
    }

    pub fn info(&self, id: &str) -> Option<&ProviderInfo> {
        self.providers.iter().find(|r| r.info.id == id).map(|r| &r.info)
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Remember `id` as the selected provider.
    pub fn select(&self, id: &str) -> Result<(), StorageError> {
        debug!(id, "selecting wallet provider");
        self.storage.set(SELECTED_PROVIDER_KEY, id)
    }

    /// The persisted selection, if any.
    pub fn selected_id(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(SELECTED_PROVIDER_KEY)
    }

    pub fn clear_selection(&self) -> Result<(), StorageError> {
        self.storage.remove(SELECTED_PROVIDER_KEY)
    }
}
