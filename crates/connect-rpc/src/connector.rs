//! Request pipeline between the application and a wallet provider.
//!
//! [`Connector::request`] resolves a provider, converts legacy Clarity values
//! in the params, performs the exchange and lifts wallet errors into
//! [`JsonRpcError`]. Address results are normalized and persisted when local
//! storage is enabled; a failure to persist fails the request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use connect_core::config::ConnectConfig;
use connect_core::session::{ConnectSession, SessionStore};
use connect_core::storage::{Storage, StorageError};
use connect_core::{
    convert_json, sanitize, ConvertError, JsonRpcError, JsonRpcErrorCode, RequestOptions,
};

use crate::provider::{ProviderInfo, ProviderRegistry, StacksProvider};
use crate::types::{AddressesResult, RequestMethod};

fn storage_error(e: StorageError) -> JsonRpcError {
    JsonRpcError::with_code(JsonRpcErrorCode::InternalError, "storage failure").with_cause(e)
}

fn params_error(e: ConvertError) -> JsonRpcError {
    JsonRpcError::with_code(JsonRpcErrorCode::InvalidParams, format!("invalid params: {e}"))
        .with_cause(e)
}

/// Application-side entry point for wallet requests.
pub struct Connector {
    registry: ProviderRegistry,
    session: SessionStore,
    config: ConnectConfig,
}

impl Connector {
    pub fn new(config: ConnectConfig, storage: Arc<dyn Storage>) -> Self {
        Self {
            registry: ProviderRegistry::new(storage.clone()),
            session: SessionStore::new(storage),
            config,
        }
    }

    pub fn register_provider(&mut self, info: ProviderInfo, provider: Arc<dyn StacksProvider>) {
        self.registry.register(info, provider);
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// Providers the application may offer to the user.
    pub fn available_providers(&self) -> Vec<&ProviderInfo> {
        self.registry
            .list_approved(|id| self.config.is_approved(id))
    }

    /// Pick a provider: explicit ID, then the persisted selection, then the
    /// configured default, then the only approved provider if there is one.
    fn resolve_provider(
        &self,
        explicit: Option<&str>,
    ) -> Result<(String, Arc<dyn StacksProvider>), JsonRpcError> {
        let selected = match explicit {
            Some(id) => Some(id.to_string()),
            None => self.registry.selected_id().map_err(storage_error)?,
        };
        let candidate = selected
            .or_else(|| self.config.default_provider.clone())
            .or_else(|| match self.available_providers().as_slice() {
                [only] => Some(only.id.clone()),
                _ => None,
            });

        let Some(id) = candidate else {
            return Err(JsonRpcError::with_code(
                JsonRpcErrorCode::ProviderNotFound,
                "no wallet provider selected",
            ));
        };
        if !self.config.is_approved(&id) {
            return Err(JsonRpcError::with_code(
                JsonRpcErrorCode::ProviderNotFound,
                format!("wallet provider '{id}' is not approved"),
            ));
        }
        match self.registry.get(&id) {
            Some(provider) => Ok((id, provider)),
            None => Err(JsonRpcError::with_code(
                JsonRpcErrorCode::ProviderNotFound,
                format!("wallet provider '{id}' not found"),
            )),
        }
    }

    /// Send a request by method name.
    pub async fn request_raw(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        self.exchange(None, method, params, self.config.enable_local_storage)
            .await
    }

    /// Send a request for a known method.
    pub async fn request(
        &self,
        method: RequestMethod,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        self.request_raw(method.as_str(), params).await
    }

    /// Send a request to a specific provider and remember it as selected.
    pub async fn request_with_provider(
        &self,
        provider_id: &str,
        method: RequestMethod,
        params: Option<Value>,
    ) -> Result<Value, JsonRpcError> {
        let result = self
            .exchange(
                Some(provider_id),
                method.as_str(),
                params,
                self.config.enable_local_storage,
            )
            .await?;
        self.registry.select(provider_id).map_err(storage_error)?;
        Ok(result)
    }

    /// Send a request and decode its result.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: RequestMethod,
        params: Option<Value>,
    ) -> Result<T, JsonRpcError> {
        let value = self.request(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            JsonRpcError::with_code(
                JsonRpcErrorCode::InternalError,
                format!("unexpected {method} result: {e}"),
            )
            .with_cause(e)
        })
    }

    /// Send a request carrying application options.
    ///
    /// Only the sanitized fields travel with the params (keys already present
    /// in the params win). `on_finish` runs with the result; `on_cancel` runs
    /// when the user rejects or cancels.
    pub async fn request_with_options(
        &self,
        method: RequestMethod,
        params: Option<Value>,
        options: &RequestOptions,
    ) -> Result<Value, JsonRpcError> {
        let transmitted = sanitize(options);
        let params = merge_options(params, &transmitted)?;

        match self.request(method, params).await {
            Ok(result) => {
                options.finish(&result);
                Ok(result)
            }
            Err(e) => {
                if matches!(
                    e.error_code(),
                    Some(JsonRpcErrorCode::UserRejection | JsonRpcErrorCode::UserCanceled)
                ) {
                    options.cancel();
                }
                Err(e)
            }
        }
    }

    /// Request addresses and persist them regardless of configuration.
    pub async fn connect(&self) -> Result<AddressesResult, JsonRpcError> {
        let value = self
            .exchange(None, RequestMethod::GetAddresses.as_str(), None, true)
            .await?;
        serde_json::from_value(value).map_err(|e| {
            JsonRpcError::with_code(
                JsonRpcErrorCode::InternalError,
                format!("unexpected getAddresses result: {e}"),
            )
            .with_cause(e)
        })
    }

    /// Forget the session and the selected provider.
    ///
    /// The wallet is told with `stx_disconnect`; its answer is ignored.
    pub async fn disconnect(&self) -> Result<(), JsonRpcError> {
        if let Ok((id, provider)) = self.resolve_provider(None) {
            if let Err(e) = provider
                .request(RequestMethod::StxDisconnect.as_str(), None)
                .await
            {
                debug!(provider = %id, code = e.code, "provider ignored disconnect");
            }
        }
        self.session.clear().map_err(storage_error)?;
        self.registry.clear_selection().map_err(storage_error)?;
        info!("disconnected");
        Ok(())
    }

    pub fn is_connected(&self) -> Result<bool, JsonRpcError> {
        self.session.is_connected().map_err(storage_error)
    }

    /// The persisted session, if any.
    pub fn local_storage(&self) -> Result<Option<ConnectSession>, JsonRpcError> {
        self.session.load().map_err(storage_error)
    }

    async fn exchange(
        &self,
        provider_id: Option<&str>,
        method: &str,
        params: Option<Value>,
        persist_addresses: bool,
    ) -> Result<Value, JsonRpcError> {
        let known = RequestMethod::parse_method(method);
        if known.is_none() {
            debug!(method, "forwarding method outside the known catalogue");
        }
        let params = prepare_params(known, params).map_err(params_error)?;
        let (id, provider) = self.resolve_provider(provider_id)?;

        info!(provider = %id, method, "sending wallet request");
        let result = provider.request(method, params).await.map_err(|wire| {
            warn!(provider = %id, method, code = wire.code, message = %wire.message, "wallet returned error");
            JsonRpcError::from_response(&wire)
        })?;

        if persist_addresses && known.is_some_and(|m| m.returns_addresses()) {
            self.persist_addresses(&result)?;
        }
        Ok(result)
    }

    /// Normalize and store the addresses of an address result.
    fn persist_addresses(&self, result: &Value) -> Result<(), JsonRpcError> {
        let parsed: AddressesResult = serde_json::from_value(result.clone()).map_err(|e| {
            warn!(error = %e, "address result has unexpected shape");
            JsonRpcError::with_code(
                JsonRpcErrorCode::InternalError,
                format!("address result has unexpected shape: {e}"),
            )
            .with_cause(e)
        })?;
        self.session.save_addresses(parsed.addresses).map_err(|e| {
            warn!(error = %e, "failed to persist addresses");
            storage_error(e)
        })?;
        Ok(())
    }
}

/// Convert Clarity values inside params to the current representation.
///
/// Hex strings in `functionArgs` are already serialized and pass through.
pub fn prepare_params(
    method: Option<RequestMethod>,
    params: Option<Value>,
) -> Result<Option<Value>, ConvertError> {
    let Some(mut params) = params else {
        return Ok(None);
    };
    match method {
        Some(RequestMethod::StxCallContract) => {
            match params.get_mut("functionArgs") {
                None => {}
                Some(Value::Array(args)) => {
                    for arg in args.iter_mut() {
                        if arg.is_object() {
                            *arg = convert_json(arg)?;
                        } else if !arg.is_string() {
                            return Err(ConvertError::Malformed(format!(
                                "function argument must be a clarity value or hex string, got {arg}"
                            )));
                        }
                    }
                }
                Some(other) => {
                    return Err(ConvertError::Malformed(format!(
                        "functionArgs must be an array, got {other}"
                    )))
                }
            }
        }
        Some(RequestMethod::StxSignStructuredMessage) => {
            for key in ["message", "domain"] {
                if let Some(value) = params.get_mut(key) {
                    if value.is_object() {
                        *value = convert_json(value)?;
                    }
                }
            }
        }
        _ => {}
    }
    Ok(Some(params))
}

fn merge_options(
    params: Option<Value>,
    options: &RequestOptions,
) -> Result<Option<Value>, JsonRpcError> {
    if options.fields().is_empty() {
        return Ok(params);
    }
    let mut merged = match params {
        None => Map::new(),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(JsonRpcError::with_code(
                JsonRpcErrorCode::InvalidParams,
                format!("params must be an object to carry options, got {other}"),
            ))
        }
    };
    for (key, value) in options.fields() {
        merged.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Ok(Some(Value::Object(merged)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prepare_call_contract_args() {
        let params = json!({
            "contract": "SP000000000000000000002Q6VF78.pox-4",
            "functionName": "f",
            "functionArgs": [
                {"type": 1, "value": "5"},
                {"type": "true"},
                "0100000000000000000000000000000005"
            ]
        });
        let out = prepare_params(Some(RequestMethod::StxCallContract), Some(params))
            .unwrap()
            .unwrap();
        assert_eq!(
            out["functionArgs"],
            json!([
                {"type": "uint", "value": "5"},
                {"type": "true"},
                "0100000000000000000000000000000005"
            ])
        );
    }

    #[test]
    fn prepare_rejects_bad_args() {
        let params = json!({"functionArgs": [42]});
        assert!(prepare_params(Some(RequestMethod::StxCallContract), Some(params)).is_err());

        let params = json!({"functionArgs": {"type": 1, "value": "5"}});
        assert!(matches!(
            prepare_params(Some(RequestMethod::StxCallContract), Some(params)),
            Err(ConvertError::Malformed(_))
        ));

        let params = json!({"functionArgs": [{"type": 77}]});
        assert!(matches!(
            prepare_params(Some(RequestMethod::StxCallContract), Some(params)),
            Err(ConvertError::UnknownLegacyType(77))
        ));
    }

    #[test]
    fn prepare_structured_message() {
        let params = json!({
            "message": {"type": 13, "data": "hello"},
            "domain": {"type": 12, "data": {"name": {"type": 13, "data": "app"}}}
        });
        let out = prepare_params(Some(RequestMethod::StxSignStructuredMessage), Some(params))
            .unwrap()
            .unwrap();
        assert_eq!(out["message"], json!({"type": "ascii", "value": "hello"}));
        assert_eq!(
            out["domain"],
            json!({"type": "tuple", "value": {"name": {"type": "ascii", "value": "app"}}})
        );
    }

    #[test]
    fn prepare_leaves_other_methods_alone() {
        let params = json!({"message": {"type": 13, "data": "hello"}});
        let out = prepare_params(Some(RequestMethod::StxSignMessage), Some(params.clone()))
            .unwrap();
        assert_eq!(out, Some(params));
        assert_eq!(prepare_params(None, None).unwrap(), None);
    }

    #[test]
    fn merge_options_keeps_params_precedence() {
        let options = RequestOptions::new()
            .with_field("network", "testnet")
            .with_field("appDetails", json!({"name": "demo"}));
        let merged = merge_options(Some(json!({"network": "mainnet"})), &options)
            .unwrap()
            .unwrap();
        assert_eq!(merged["network"], json!("mainnet"));
        assert_eq!(merged["appDetails"], json!({"name": "demo"}));
    }

    #[test]
    fn merge_options_into_non_object_fails() {
        let options = RequestOptions::new().with_field("network", "testnet");
        let err = merge_options(Some(json!([1])), &options).unwrap_err();
        assert_eq!(err.error_code(), Some(JsonRpcErrorCode::InvalidParams));
        assert_eq!(merge_options(None, &RequestOptions::new()).unwrap(), None);
    }
}
