//! Wallet request methods and JSON-RPC message types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use connect_core::{AddressEntry, ResponseError};

/// Methods a wallet provider may be asked to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    /// Bitcoin and Stacks addresses.
    GetAddresses,
    /// Stacks addresses only.
    StxGetAddresses,
    StxGetAccounts,
    /// Wallet name and supported methods.
    GetInfo,
    SendTransfer,
    SignPsbt,
    SignMessage,
    StxTransferStx,
    StxTransferSip10Ft,
    StxTransferSip9Nft,
    StxCallContract,
    StxDeployContract,
    StxSignTransaction,
    StxSignMessage,
    StxSignStructuredMessage,
    /// Tell the wallet the application disconnected.
    StxDisconnect,
}

impl RequestMethod {
    pub const ALL: [RequestMethod; 16] = [
        Self::GetAddresses,
        Self::StxGetAddresses,
        Self::StxGetAccounts,
        Self::GetInfo,
        Self::SendTransfer,
        Self::SignPsbt,
        Self::SignMessage,
        Self::StxTransferStx,
        Self::StxTransferSip10Ft,
        Self::StxTransferSip9Nft,
        Self::StxCallContract,
        Self::StxDeployContract,
        Self::StxSignTransaction,
        Self::StxSignMessage,
        Self::StxSignStructuredMessage,
        Self::StxDisconnect,
    ];

    /// Parse a method name string into a RequestMethod.
    pub fn parse_method(s: &str) -> Option<Self> {
        match s {
            "getAddresses" => Some(Self::GetAddresses),
            "stx_getAddresses" => Some(Self::StxGetAddresses),
            "stx_getAccounts" => Some(Self::StxGetAccounts),
            "getInfo" => Some(Self::GetInfo),
            "sendTransfer" => Some(Self::SendTransfer),
            "signPsbt" => Some(Self::SignPsbt),
            "signMessage" => Some(Self::SignMessage),
            "stx_transferStx" => Some(Self::StxTransferStx),
            "stx_transferSip10Ft" => Some(Self::StxTransferSip10Ft),
            "stx_transferSip9Nft" => Some(Self::StxTransferSip9Nft),
            "stx_callContract" => Some(Self::StxCallContract),
            "stx_deployContract" => Some(Self::StxDeployContract),
            "stx_signTransaction" => Some(Self::StxSignTransaction),
            "stx_signMessage" => Some(Self::StxSignMessage),
            "stx_signStructuredMessage" => Some(Self::StxSignStructuredMessage),
            "stx_disconnect" => Some(Self::StxDisconnect),
            _ => None,
        }
    }

    /// Get the method name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetAddresses => "getAddresses",
            Self::StxGetAddresses => "stx_getAddresses",
            Self::StxGetAccounts => "stx_getAccounts",
            Self::GetInfo => "getInfo",
            Self::SendTransfer => "sendTransfer",
            Self::SignPsbt => "signPsbt",
            Self::SignMessage => "signMessage",
            Self::StxTransferStx => "stx_transferStx",
            Self::StxTransferSip10Ft => "stx_transferSip10Ft",
            Self::StxTransferSip9Nft => "stx_transferSip9Nft",
            Self::StxCallContract => "stx_callContract",
            Self::StxDeployContract => "stx_deployContract",
            Self::StxSignTransaction => "stx_signTransaction",
            Self::StxSignMessage => "stx_signMessage",
            Self::StxSignStructuredMessage => "stx_signStructuredMessage",
            Self::StxDisconnect => "stx_disconnect",
        }
    }

    /// Methods whose result carries an `addresses` list worth persisting.
    pub fn returns_addresses(&self) -> bool {
        matches!(self, Self::GetAddresses | Self::StxGetAddresses)
    }
}

impl std::fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-RPC 2.0 request object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcRequest {
    /// Protocol version (should be "2.0").
    pub jsonrpc: String,
    /// Method name to invoke.
    pub method: String,
    /// Method parameters (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Request ID (can be string, number, or null).
    pub id: Value,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id: id.into(),
        }
    }
}

/// JSON-RPC 2.0 response object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
    pub id: Value,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: ResponseError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// Split into the success payload or the wire error.
    ///
    /// A response with neither field is a success with a `null` result.
    pub fn into_result(self) -> Result<Value, ResponseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ---- Method params and results ----

/// Result of `getAddresses` / `stx_getAddresses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressesResult {
    pub addresses: Vec<AddressEntry>,
}

/// Params for `stx_transferStx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferStxParams {
    pub recipient: String,
    /// Amount in micro-STX, as a decimal string.
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// Params for `stx_callContract`.
///
/// `function_args` may hold Clarity values in either representation or
/// hex-serialized strings; they are converted before sending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallContractParams {
    /// `<address>.<contract-name>`.
    pub contract: String,
    pub function_name: String,
    #[serde(default)]
    pub function_args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
}

/// Params for `stx_signMessage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignMessageParams {
    pub message: String,
}

/// Result of `stx_signMessage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMessageResult {
    pub signature: String,
    pub public_key: String,
}

/// Result of transaction-producing methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxidResult {
    pub txid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction: Option<String>,
}
