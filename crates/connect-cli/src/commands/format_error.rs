//! `stacks-connect format-error`: show a wire error as the client reports it.

use std::path::PathBuf;

use connect_core::{JsonRpcError, ResponseError};
use serde_json::Value;

use super::read_json;

pub fn run(input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_json(input)?;
    println!("{}", format_error(document)?);
    Ok(())
}

/// Accepts the error object itself or a full response carrying `error`.
pub(crate) fn format_error(document: Value) -> Result<String, serde_json::Error> {
    let error = match document {
        Value::Object(mut obj) if obj.contains_key("error") => {
            obj.remove("error").unwrap_or_default()
        }
        other => other,
    };
    let wire: ResponseError = serde_json::from_value(error)?;
    let err = JsonRpcError::from(wire);
    Ok(match err.error_code() {
        Some(kind) => format!("{err} [{}]", kind.name()),
        None => err.to_string(),
    })
}
