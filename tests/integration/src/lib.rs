//! Integration tests for stacks-connect.
//!
//! The connector talks to an in-process wallet through serialized JSON-RPC
//! text, so every request and response crosses the same encoding a real
//! transport would use.
//!
//! ```bash
//! cargo test -p connect-integration-tests
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

use connect_core::{JsonRpcErrorCode, ResponseError};
use connect_rpc::{JsonRpcRequest, JsonRpcResponse, StacksProvider};

/// A wallet reachable only through JSON text.
pub struct TextWallet {
    next_id: AtomicU64,
    /// Raw request lines, as the wallet received them.
    pub inbox: Mutex<Vec<String>>,
}

impl Default for TextWallet {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inbox: Mutex::new(Vec::new()),
        }
    }
}

impl TextWallet {
    /// The wallet side: one request line in, one response line out.
    pub fn handle(&self, line: &str) -> String {
        if let Ok(mut inbox) = self.inbox.lock() {
            inbox.push(line.to_string());
        }
        let response = match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(req) => {
                let id = req.id.clone();
                match answer(&req) {
                    Ok(result) => JsonRpcResponse::success(id, result),
                    Err(error) => JsonRpcResponse::error(id, error),
                }
            }
            Err(e) => JsonRpcResponse::error(
                Value::Null,
                ResponseError::new(JsonRpcErrorCode::ParseError, e.to_string()),
            ),
        };
        serde_json::to_string(&response).unwrap_or_default()
    }
}

fn answer(req: &JsonRpcRequest) -> Result<Value, ResponseError> {
    match req.method.as_str() {
        "getAddresses" => Ok(json!({
            "addresses": [
                {"address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh", "publicKey": "03bb", "purpose": "payment"},
                {"address": "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", "publicKey": "02aa", "symbol": "STX"},
                {"address": "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7", "publicKey": "02aa"}
            ]
        })),
        "stx_callContract" => {
            let args = req
                .params
                .as_ref()
                .and_then(|p| p.get("functionArgs"))
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            // Wallets only understand the current representation.
            if args
                .iter()
                .any(|a| !(a.is_string() || a.get("type").is_some_and(Value::is_string)))
            {
                return Err(ResponseError::new(
                    JsonRpcErrorCode::InvalidParams,
                    "legacy clarity value",
                ));
            }
            Ok(json!({"txid": "0x6a1e"}))
        }
        "stx_signMessage" => Err(ResponseError::new(
            JsonRpcErrorCode::UserRejection,
            "User rejected request",
        )
        .with_data(json!({"method": req.method}))),
        "stx_disconnect" => Ok(Value::Null),
        other => Err(ResponseError::new(
            JsonRpcErrorCode::MethodNotFound,
            format!("method '{other}' not supported"),
        )),
    }
}

impl StacksProvider for TextWallet {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Option<Value>,
    ) -> BoxFuture<'a, Result<Value, ResponseError>> {
        async move {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let line = serde_json::to_string(&JsonRpcRequest::new(id, method, params))
                .map_err(|e| ResponseError::new(JsonRpcErrorCode::InternalError, e.to_string()))?;
            let reply = self.handle(&line);
            let response: JsonRpcResponse = serde_json::from_str(&reply)
                .map_err(|e| ResponseError::new(JsonRpcErrorCode::ParseError, e.to_string()))?;
            response.into_result()
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use connect_core::config::ConnectConfig;
    use connect_core::storage::{FileStorage, Storage};
    use connect_core::{is_json_rpc_error, RequestOptions};
    use connect_rpc::{Connector, ProviderInfo, RequestMethod};

    fn connector(dir: &std::path::Path, wallet: Arc<TextWallet>) -> Connector {
        let config = ConnectConfig::from_yaml(
            "approved_providers: [LeatherProvider]\napp_details:\n  name: Demo\n  icon: https://example.com/icon.png\n",
        )
        .unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::open(dir).unwrap());
        let mut connector = Connector::new(config, storage);
        connector.register_provider(ProviderInfo::new("LeatherProvider", "Leather"), wallet);
        connector
    }

    #[tokio::test]
    async fn test_connect_call_disconnect() {
        let tmp = tempfile::tempdir().unwrap();
        let wallet = Arc::new(TextWallet::default());
        let connector = connector(tmp.path(), wallet.clone());

        let addresses = connector.connect().await.unwrap();
        assert_eq!(addresses.addresses.len(), 3);

        let session = connector.local_storage().unwrap().unwrap();
        assert_eq!(session.addresses.stx.len(), 1);
        assert_eq!(session.addresses.btc.len(), 1);
        let on_disk = std::fs::read_to_string(tmp.path().join("storage.json")).unwrap();
        assert!(!on_disk.contains("publicKey"));

        let txid = connector
            .request(
                RequestMethod::StxCallContract,
                Some(json!({
                    "contract": "SP000000000000000000002Q6VF78.pox-4",
                    "functionName": "delegate-stx",
                    "functionArgs": [
                        {"type": 1, "value": 1000000},
                        {"type": 5, "address": {"version": 22, "hash160": "a46ff88886c2ef9762d970b4d2c63678835bd39d"}},
                        {"type": 6, "address": "SP000000000000000000002Q6VF78", "contractName": {"content": "pox-4"}},
                        {"type": 9}
                    ]
                })),
            )
            .await
            .unwrap();
        assert_eq!(txid["txid"], "0x6a1e");

        let inbox = wallet.inbox.lock().unwrap().clone();
        let sent: JsonRpcRequest = serde_json::from_str(&inbox[1]).unwrap();
        assert_eq!(sent.jsonrpc, "2.0");
        assert_eq!(
            sent.params.unwrap()["functionArgs"],
            json!([
                {"type": "uint", "value": "1000000"},
                {"type": "address", "value": "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7"},
                {"type": "contract", "value": "SP000000000000000000002Q6VF78.pox-4"},
                {"type": "none"}
            ])
        );

        connector.disconnect().await.unwrap();
        assert!(!connector.is_connected().unwrap());
        assert_eq!(wallet.inbox.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rejection_crosses_the_wire() {
        let tmp = tempfile::tempdir().unwrap();
        let connector = connector(tmp.path(), Arc::new(TextWallet::default()));

        let canceled = Arc::new(Mutex::new(false));
        let flag = canceled.clone();
        let options = RequestOptions::new().on_cancel(move || {
            if let Ok(mut c) = flag.lock() {
                *c = true;
            }
        });

        let err = connector
            .request_with_options(
                RequestMethod::StxSignMessage,
                Some(json!({"message": "hi"})),
                &options,
            )
            .await
            .unwrap_err();
        assert!(is_json_rpc_error(&err));
        assert_eq!(err.error_code(), Some(JsonRpcErrorCode::UserRejection));
        assert_eq!(
            err.to_string(),
            r#"JsonRpcError (-32000): User rejected request: {"method":"stx_signMessage"}"#
        );
        assert!(*canceled.lock().unwrap());
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let tmp = tempfile::tempdir().unwrap();
        let connector = connector(tmp.path(), Arc::new(TextWallet::default()));

        let err = connector
            .request_raw("stx_mintSomething", None)
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), Some(JsonRpcErrorCode::MethodNotFound));
        assert_eq!(err.message(), "method 'stx_mintSomething' not supported");
    }

    #[test]
    fn test_garbage_line_yields_parse_error() {
        let wallet = TextWallet::default();
        let reply: JsonRpcResponse = serde_json::from_str(&wallet.handle("{nope")).unwrap();
        let wire = reply.into_result().unwrap_err();
        assert_eq!(wire.code, JsonRpcErrorCode::ParseError.code());
    }
}
