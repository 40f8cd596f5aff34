//! `stacks-connect normalize`: the address list as it would be stored.

use std::path::PathBuf;

use connect_core::{normalize, AddressEntry};
use serde_json::Value;

use super::{print_json, read_json};

pub fn run(input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_json(input)?;
    print_json(&normalize_document(document)?)
}

/// Accepts a bare array or a wallet result with an `addresses` field.
pub(crate) fn normalize_document(document: Value) -> Result<Value, serde_json::Error> {
    let list = match document {
        Value::Object(mut obj) if obj.contains_key("addresses") => {
            obj.remove("addresses").unwrap_or_default()
        }
        other => other,
    };
    let entries: Vec<AddressEntry> = serde_json::from_value(list)?;
    serde_json::to_value(normalize(entries))
}
