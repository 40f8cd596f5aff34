//! JSON-RPC error model shared by every wallet-facing operation.
//!
//! Wallet providers answer with JSON-RPC 2.0 error objects. [`ResponseError`]
//! is that wire shape; [`JsonRpcError`] is the typed error handed back to the
//! application after lifting it with [`JsonRpcError::from_response`].

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error codes understood by stacks-connect.
///
/// `-32700..=-32603` are the standard JSON-RPC codes, `-32000..=-32007` are
/// implementation-defined wallet errors, and `-31000`/`-31001` sit outside the
/// reserved range for errors raised by the client itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum JsonRpcErrorCode {
    /// Invalid JSON was received.
    ParseError = -32700,
    /// The JSON sent is not a valid Request object.
    InvalidRequest = -32600,
    /// The method does not exist / is not available.
    MethodNotFound = -32601,
    /// Invalid method parameter(s).
    InvalidParams = -32602,
    /// Internal JSON-RPC error.
    InternalError = -32603,
    // Implementation-defined wallet errors (-32000 to -32099)
    /// The user rejected the request in the wallet.
    UserRejection = -32000,
    /// The request targets an address the wallet does not control.
    MethodAddressMismatch = -32001,
    /// The wallet refused access to the method.
    MethodAccessDenied = -32002,
    /// The wallet could not reach the network.
    NetworkError = -32003,
    /// The request timed out.
    TimeoutError = -32004,
    /// No wallet provider could be found.
    ProviderNotFound = -32005,
    /// The wallet does not implement the method.
    UnsupportedMethod = -32006,
    /// The requested network is not supported or does not match.
    InvalidNetwork = -32007,
    // Client-side errors
    /// An error the client could not classify.
    UnknownError = -31000,
    /// The user closed the wallet prompt without answering.
    UserCanceled = -31001,
}

impl JsonRpcErrorCode {
    /// Every known code, in table order.
    pub const ALL: [JsonRpcErrorCode; 15] = [
        Self::ParseError,
        Self::InvalidRequest,
        Self::MethodNotFound,
        Self::InvalidParams,
        Self::InternalError,
        Self::UserRejection,
        Self::MethodAddressMismatch,
        Self::MethodAccessDenied,
        Self::NetworkError,
        Self::TimeoutError,
        Self::ProviderNotFound,
        Self::UnsupportedMethod,
        Self::InvalidNetwork,
        Self::UnknownError,
        Self::UserCanceled,
    ];

    /// Numeric value sent on the wire.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a known code. Arbitrary provider codes return `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Get the code name as a string.
    pub fn name(self) -> &'static str {
        match self {
            Self::ParseError => "ParseError",
            Self::InvalidRequest => "InvalidRequest",
            Self::MethodNotFound => "MethodNotFound",
            Self::InvalidParams => "InvalidParams",
            Self::InternalError => "InternalError",
            Self::UserRejection => "UserRejection",
            Self::MethodAddressMismatch => "MethodAddressMismatch",
            Self::MethodAccessDenied => "MethodAccessDenied",
            Self::NetworkError => "NetworkError",
            Self::TimeoutError => "TimeoutError",
            Self::ProviderNotFound => "ProviderNotFound",
            Self::UnsupportedMethod => "UnsupportedMethod",
            Self::InvalidNetwork => "InvalidNetwork",
            Self::UnknownError => "UnknownError",
            Self::UserCanceled => "UserCanceled",
        }
    }
}

impl From<JsonRpcErrorCode> for i32 {
    fn from(code: JsonRpcErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// JSON-RPC 2.0 error object as returned by a wallet provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Error code.
    pub code: i32,
    /// Error message.
    pub message: String,
    /// Additional error data (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseError {
    pub fn new(code: impl Into<i32>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

type Cause = Box<dyn StdError + Send + Sync + 'static>;

/// Typed error for a failed wallet request.
///
/// Fields are set once at construction. The `Display` form is
/// `JsonRpcError (<code>): <message>`, followed by `: <json data>` when data
/// is present.
#[derive(Debug)]
pub struct JsonRpcError {
    message: String,
    code: i32,
    data: Option<Value>,
    cause: Option<Cause>,
}

impl JsonRpcError {
    /// Build an error from any code, known or not. The code is not validated.
    pub fn new(message: impl Into<String>, code: impl Into<i32>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            data: None,
            cause: None,
        }
    }

    /// Shorthand for errors raised by the client with a known code.
    pub fn with_code(code: JsonRpcErrorCode, message: impl Into<String>) -> Self {
        Self::new(message, code)
    }

    /// Attach an opaque data payload.
    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Attach the underlying error that caused this one.
    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Lift a provider's wire error into a typed error.
    pub fn from_response(response: &ResponseError) -> Self {
        Self {
            message: response.message.clone(),
            code: response.code,
            data: response.data.clone(),
            cause: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// The known code this error carries, if any.
    pub fn error_code(&self) -> Option<JsonRpcErrorCode> {
        JsonRpcErrorCode::from_code(self.code)
    }

    /// Convert back to the wire shape. The cause is not transmitted.
    pub fn to_response(&self) -> ResponseError {
        ResponseError {
            code: self.code,
            message: self.message.clone(),
            data: self.data.clone(),
        }
    }
}

impl From<ResponseError> for JsonRpcError {
    fn from(response: ResponseError) -> Self {
        Self {
            message: response.message,
            code: response.code,
            data: response.data,
            cause: None,
        }
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonRpcError ({}): {}", self.code, self.message)?;
        if let Some(data) = &self.data {
            let encoded = serde_json::to_string(data).map_err(|_| fmt::Error)?;
            write!(f, ": {encoded}")?;
        }
        Ok(())
    }
}

impl StdError for JsonRpcError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Returns true when `err` is a [`JsonRpcError`].
///
/// Anything else, including a [`ResponseError`] with identical fields, is not.
pub fn is_json_rpc_error(err: &(dyn StdError + 'static)) -> bool {
    err.is::<JsonRpcError>()
}
