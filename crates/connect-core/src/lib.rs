//! # connect-core
//!
//! Error model, Clarity value conversion, address normalization, options
//! sanitization and session persistence for stacks-connect.

pub mod address;
pub mod c32;
pub mod clarity;
pub mod config;
pub mod error;
pub mod legacy;
pub mod options;
pub mod session;
pub mod storage;

pub use address::{normalize, AddressEntry, StoredAddress};
pub use clarity::ClarityValue;
pub use error::{is_json_rpc_error, JsonRpcError, JsonRpcErrorCode, ResponseError};
pub use legacy::{convert, convert_json, AnyClarityValue, ConvertError, LegacyClarityValue};
pub use options::{sanitize, RequestOptions};
