//! # stacks_connect
//!
//! Client SDK for asking Stacks wallets to act on behalf of an application.
//!
//! The pieces live in two crates re-exported here: [`connect_core`] holds the
//! error model, Clarity value conversion, address normalization and
//! persistence; [`connect_rpc`] holds the method catalogue, provider registry
//! and the [`Connector`] request pipeline.

pub use connect_core;
pub use connect_rpc;

pub use connect_core::{
    convert, is_json_rpc_error, normalize, sanitize, ClarityValue, JsonRpcError, JsonRpcErrorCode,
};
pub use connect_rpc::{Connector, RequestMethod, StacksProvider};

/// Returns the library version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
