//! `stacks-connect convert`: rewrite legacy Clarity values.

use std::path::PathBuf;

use connect_core::{convert_json, ConvertError};
use serde_json::Value;

use super::{print_json, read_json};

pub fn run(input: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let document = read_json(input)?;
    print_json(&convert_document(&document)?)
}

/// Convert one value, or each element of an array of values.
pub(crate) fn convert_document(document: &Value) -> Result<Value, ConvertError> {
    match document {
        Value::Array(values) => values
            .iter()
            .map(convert_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        value => convert_json(value),
    }
}
