//! # connect-rpc
//!
//! Wallet request methods, provider discovery and the request pipeline
//! that sits between an application and a Stacks wallet.

pub mod connector;
pub mod provider;
pub mod types;

pub use connector::{prepare_params, Connector};
pub use provider::{ProviderInfo, ProviderRegistry, StacksProvider};
pub use types::{JsonRpcRequest, JsonRpcResponse, RequestMethod};
