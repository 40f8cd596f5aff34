//! Conversion of legacy Clarity values into the current representation.
//!
//! Legacy values are discriminated by a numeric `type` tag (`{"type": 1,
//! "value": "100"}`), current values by a string tag (`{"type": "uint", ...}`).
//! Decoding into [`AnyClarityValue`] tells the two apart; anything that is
//! neither is rejected with a [`ConvertError`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::c32::{self, C32Error};
use crate::clarity::ClarityValue;

/// Errors from decoding or converting Clarity values.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown legacy clarity type tag {0}")]
    UnknownLegacyType(u64),
    #[error("unknown clarity type '{0}'")]
    UnknownType(String),
    #[error("missing field '{field}' for legacy type {type_id}")]
    MissingField { type_id: u8, field: &'static str },
    #[error("invalid integer for legacy type {type_id}: {reason}")]
    InvalidInteger { type_id: u8, reason: String },
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),
    #[error(transparent)]
    C32(#[from] C32Error),
    #[error("not a clarity value: {0}")]
    Malformed(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Numeric tags of the legacy representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LegacyType {
    Int = 0,
    UInt = 1,
    Buffer = 2,
    BoolTrue = 3,
    BoolFalse = 4,
    PrincipalStandard = 5,
    PrincipalContract = 6,
    ResponseOk = 7,
    ResponseErr = 8,
    OptionalNone = 9,
    OptionalSome = 10,
    List = 11,
    Tuple = 12,
    StringAscii = 13,
    StringUtf8 = 14,
}

impl LegacyType {
    pub fn from_u64(tag: u64) -> Option<Self> {
        Some(match tag {
            0 => Self::Int,
            1 => Self::UInt,
            2 => Self::Buffer,
            3 => Self::BoolTrue,
            4 => Self::BoolFalse,
            5 => Self::PrincipalStandard,
            6 => Self::PrincipalContract,
            7 => Self::ResponseOk,
            8 => Self::ResponseErr,
            9 => Self::OptionalNone,
            10 => Self::OptionalSome,
            11 => Self::List,
            12 => Self::Tuple,
            13 => Self::StringAscii,
            14 => Self::StringUtf8,
            _ => return None,
        })
    }
}

/// A standard principal as carried by legacy values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyPrincipal {
    /// Already c32-encoded.
    Encoded(String),
    /// Raw version byte and hash160.
    Raw { version: u8, hash160: Vec<u8> },
}

impl LegacyPrincipal {
    fn to_address(&self) -> Result<String, ConvertError> {
        match self {
            Self::Encoded(address) => Ok(address.clone()),
            Self::Raw { version, hash160 } => Ok(c32::c32_address(*version, hash160)?),
        }
    }
}

/// A Clarity value in the legacy numeric-tag representation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum LegacyClarityValue {
    Int(i128),
    UInt(u128),
    Buffer(Vec<u8>),
    BoolTrue,
    BoolFalse,
    PrincipalStandard(LegacyPrincipal),
    PrincipalContract {
        address: LegacyPrincipal,
        contract_name: String,
    },
    ResponseOk(Box<LegacyClarityValue>),
    ResponseErr(Box<LegacyClarityValue>),
    OptionalNone,
    OptionalSome(Box<LegacyClarityValue>),
    List(Vec<LegacyClarityValue>),
    Tuple(BTreeMap<String, LegacyClarityValue>),
    StringAscii(String),
    StringUtf8(String),
}

impl LegacyClarityValue {
    /// Decode a legacy value from its JSON object form.
    pub fn from_json(value: &Value) -> Result<Self, ConvertError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ConvertError::Malformed(format!("expected object, got {value}")))?;
        let tag = obj
            .get("type")
            .and_then(Value::as_u64)
            .ok_or_else(|| ConvertError::Malformed("missing numeric 'type' tag".to_string()))?;
        let ty = LegacyType::from_u64(tag).ok_or(ConvertError::UnknownLegacyType(tag))?;
        decode_tagged(ty, obj)
    }

    /// Convert into the current representation.
    pub fn to_current(&self) -> Result<ClarityValue, ConvertError> {
        Ok(match self {
            Self::BoolTrue => ClarityValue::bool(true),
            Self::BoolFalse => ClarityValue::bool(false),
            Self::Int(v) => ClarityValue::int(*v),
            Self::UInt(v) => ClarityValue::uint(*v),
            Self::Buffer(bytes) => ClarityValue::buffer(bytes.clone()),
            Self::StringAscii(s) => ClarityValue::ascii(s.clone()),
            Self::StringUtf8(s) => ClarityValue::utf8(s.clone()),
            Self::OptionalNone => ClarityValue::none(),
            Self::OptionalSome(inner) => ClarityValue::some(inner.to_current()?),
            Self::ResponseOk(inner) => ClarityValue::ok(inner.to_current()?),
            Self::ResponseErr(inner) => ClarityValue::err(inner.to_current()?),
            Self::List(items) => ClarityValue::list(
                items
                    .iter()
                    .map(LegacyClarityValue::to_current)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            Self::Tuple(entries) => ClarityValue::Tuple(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), v.to_current()?)))
                    .collect::<Result<BTreeMap<_, _>, ConvertError>>()?,
            ),
            Self::PrincipalStandard(principal) => {
                ClarityValue::standard_principal(principal.to_address()?)
            }
            Self::PrincipalContract {
                address,
                contract_name,
            } => ClarityValue::contract_principal(&address.to_address()?, contract_name),
        })
    }
}

impl TryFrom<Value> for LegacyClarityValue {
    type Error = ConvertError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

fn decode_tagged(ty: LegacyType, obj: &Map<String, Value>) -> Result<LegacyClarityValue, ConvertError> {
    let type_id = ty as u8;
    let field = |name: &'static str| {
        obj.get(name).ok_or(ConvertError::MissingField {
            type_id,
            field: name,
        })
    };
    let text = |name: &'static str| -> Result<String, ConvertError> {
        field(name)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConvertError::Malformed(format!("'{name}' must be a string")))
    };
    let child = |name: &'static str| -> Result<Box<LegacyClarityValue>, ConvertError> {
        Ok(Box::new(LegacyClarityValue::from_json(field(name)?)?))
    };

    Ok(match ty {
        LegacyType::Int => LegacyClarityValue::Int(parse_integer(type_id, field("value")?)?),
        LegacyType::UInt => LegacyClarityValue::UInt(parse_integer(type_id, field("value")?)?),
        LegacyType::Buffer => LegacyClarityValue::Buffer(decode_bytes(field("buffer")?)?),
        LegacyType::BoolTrue => LegacyClarityValue::BoolTrue,
        LegacyType::BoolFalse => LegacyClarityValue::BoolFalse,
        LegacyType::OptionalNone => LegacyClarityValue::OptionalNone,
        LegacyType::OptionalSome => LegacyClarityValue::OptionalSome(child("value")?),
        LegacyType::ResponseOk => LegacyClarityValue::ResponseOk(child("value")?),
        LegacyType::ResponseErr => LegacyClarityValue::ResponseErr(child("value")?),
        LegacyType::StringAscii => LegacyClarityValue::StringAscii(text("data")?),
        LegacyType::StringUtf8 => LegacyClarityValue::StringUtf8(text("data")?),
        LegacyType::List => {
            let items = field("list")?
                .as_array()
                .ok_or_else(|| ConvertError::Malformed("'list' must be an array".to_string()))?;
            LegacyClarityValue::List(
                items
                    .iter()
                    .map(LegacyClarityValue::from_json)
                    .collect::<Result<_, _>>()?,
            )
        }
        LegacyType::Tuple => {
            let entries = field("data")?
                .as_object()
                .ok_or_else(|| ConvertError::Malformed("'data' must be an object".to_string()))?;
            LegacyClarityValue::Tuple(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), LegacyClarityValue::from_json(v)?)))
                    .collect::<Result<_, ConvertError>>()?,
            )
        }
        LegacyType::PrincipalStandard => {
            LegacyClarityValue::PrincipalStandard(decode_principal(field("address")?)?)
        }
        LegacyType::PrincipalContract => LegacyClarityValue::PrincipalContract {
            address: decode_principal(field("address")?)?,
            contract_name: decode_contract_name(field("contractName")?)?,
        },
    })
}

/// Integers arrive as JSON numbers or decimal strings. Floats are refused.
fn parse_integer<T>(type_id: u8, value: &Value) -> Result<T, ConvertError>
where
    T: std::str::FromStr + TryFrom<i64> + TryFrom<u64>,
{
    let invalid = |reason: String| ConvertError::InvalidInteger { type_id, reason };
    match value {
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid(format!("'{s}' is not a valid integer"))),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                T::try_from(u).map_err(|_| invalid(format!("{u} out of range")))
            } else if let Some(i) = n.as_i64() {
                T::try_from(i).map_err(|_| invalid(format!("{i} out of range")))
            } else {
                Err(invalid(format!("{n} is not an integer")))
            }
        }
        other => Err(invalid(format!("unexpected {other}"))),
    }
}

/// Bytes arrive as a hex string, an array of numbers, or an index-keyed
/// object (what a serialized typed array looks like).
fn decode_bytes(value: &Value) -> Result<Vec<u8>, ConvertError> {
    let byte = |v: &Value| -> Result<u8, ConvertError> {
        v.as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or_else(|| ConvertError::InvalidBuffer(format!("{v} is not a byte")))
    };
    match value {
        Value::String(s) => {
            let stripped = s.strip_prefix("0x").unwrap_or(s);
            hex::decode(stripped).map_err(|e| ConvertError::InvalidBuffer(e.to_string()))
        }
        Value::Array(items) => items.iter().map(byte).collect(),
        Value::Object(map) => {
            let mut indexed = map
                .iter()
                .map(|(k, v)| {
                    let idx: usize = k
                        .parse()
                        .map_err(|_| ConvertError::InvalidBuffer(format!("bad index '{k}'")))?;
                    Ok((idx, byte(v)?))
                })
                .collect::<Result<Vec<_>, ConvertError>>()?;
            indexed.sort_by_key(|(idx, _)| *idx);
            if indexed.iter().enumerate().any(|(pos, (idx, _))| pos != *idx) {
                return Err(ConvertError::InvalidBuffer(
                    "indices are not contiguous".to_string(),
                ));
            }
            Ok(indexed.into_iter().map(|(_, b)| b).collect())
        }
        other => Err(ConvertError::InvalidBuffer(format!("unexpected {other}"))),
    }
}

fn decode_principal(value: &Value) -> Result<LegacyPrincipal, ConvertError> {
    match value {
        Value::String(s) => Ok(LegacyPrincipal::Encoded(s.clone())),
        Value::Object(obj) => {
            let version = obj
                .get("version")
                .and_then(Value::as_u64)
                .and_then(|v| u8::try_from(v).ok())
                .ok_or_else(|| ConvertError::InvalidPrincipal("missing version".to_string()))?;
            let hash_hex = obj
                .get("hash160")
                .and_then(Value::as_str)
                .ok_or_else(|| ConvertError::InvalidPrincipal("missing hash160".to_string()))?;
            let hash160 =
                hex::decode(hash_hex).map_err(|e| ConvertError::InvalidPrincipal(e.to_string()))?;
            Ok(LegacyPrincipal::Raw { version, hash160 })
        }
        other => Err(ConvertError::InvalidPrincipal(format!("unexpected {other}"))),
    }
}

/// Contract names are either a plain string or `{"content": "..."}`.
fn decode_contract_name(value: &Value) -> Result<String, ConvertError> {
    value
        .as_str()
        .or_else(|| value.get("content").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| ConvertError::InvalidPrincipal("invalid contractName".to_string()))
}

/// A Clarity value in either representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyClarityValue {
    Legacy(LegacyClarityValue),
    Current(ClarityValue),
}

impl AnyClarityValue {
    /// Decode from JSON, dispatching on the kind of the `type` tag.
    pub fn from_json(value: &Value) -> Result<Self, ConvertError> {
        match value.get("type") {
            Some(Value::Number(_)) => Ok(Self::Legacy(LegacyClarityValue::from_json(value)?)),
            Some(Value::String(name)) => {
                if !ClarityValue::is_type_name(name) {
                    return Err(ConvertError::UnknownType(name.clone()));
                }
                Ok(Self::Current(serde_json::from_value(value.clone())?))
            }
            _ => Err(ConvertError::Malformed(format!(
                "expected an object with a 'type' tag, got {value}"
            ))),
        }
    }

    /// Convert to the current representation. Current values pass through.
    pub fn into_current(self) -> Result<ClarityValue, ConvertError> {
        match self {
            Self::Legacy(legacy) => legacy.to_current(),
            Self::Current(current) => Ok(current),
        }
    }
}

impl From<LegacyClarityValue> for AnyClarityValue {
    fn from(value: LegacyClarityValue) -> Self {
        Self::Legacy(value)
    }
}

impl From<ClarityValue> for AnyClarityValue {
    fn from(value: ClarityValue) -> Self {
        Self::Current(value)
    }
}

/// Convert a value of either representation to the current one.
pub fn convert(value: impl Into<AnyClarityValue>) -> Result<ClarityValue, ConvertError> {
    value.into().into_current()
}

/// Convert a JSON-encoded Clarity value to the current JSON form.
///
/// Values already in the current form are validated and returned as given.
pub fn convert_json(value: &Value) -> Result<Value, ConvertError> {
    match AnyClarityValue::from_json(value)? {
        AnyClarityValue::Current(_) => Ok(value.clone()),
        AnyClarityValue::Legacy(legacy) => {
            debug!(?legacy, "converting legacy clarity value");
            Ok(serde_json::to_value(legacy.to_current()?)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_and_uint() {
        let int = LegacyClarityValue::from_json(&json!({"type": 0, "value": "42"})).unwrap();
        assert_eq!(convert(int).unwrap(), ClarityValue::int(42));

        let uint = LegacyClarityValue::from_json(&json!({"type": 1, "value": 100})).unwrap();
        assert_eq!(convert(uint).unwrap(), ClarityValue::uint(100));
    }

    #[test]
    fn negative_int_from_number() {
        let v = LegacyClarityValue::from_json(&json!({"type": 0, "value": -7})).unwrap();
        assert_eq!(v, LegacyClarityValue::Int(-7));
    }

    #[test]
    fn uint_beyond_2_pow_53() {
        let v = LegacyClarityValue::from_json(
            &json!({"type": 1, "value": "340282366920938463463374607431768211455"}),
        )
        .unwrap();
        assert_eq!(convert(v).unwrap(), ClarityValue::uint(u128::MAX));
    }

    #[test]
    fn float_integer_rejected() {
        let r = LegacyClarityValue::from_json(&json!({"type": 1, "value": 1.5}));
        assert!(matches!(r, Err(ConvertError::InvalidInteger { type_id: 1, .. })));
    }

    #[test]
    fn negative_uint_rejected() {
        let r = LegacyClarityValue::from_json(&json!({"type": 1, "value": -1}));
        assert!(matches!(r, Err(ConvertError::InvalidInteger { .. })));
    }

    #[test]
    fn buffer_forms() {
        let expected = LegacyClarityValue::Buffer(vec![1, 2, 3, 4]);
        for form in [
            json!({"type": 2, "buffer": "01020304"}),
            json!({"type": 2, "buffer": [1, 2, 3, 4]}),
            json!({"type": 2, "buffer": {"0": 1, "1": 2, "2": 3, "3": 4}}),
        ] {
            assert_eq!(LegacyClarityValue::from_json(&form).unwrap(), expected);
        }
    }

    #[test]
    fn buffer_with_gap_rejected() {
        let r = LegacyClarityValue::from_json(&json!({"type": 2, "buffer": {"0": 1, "2": 3}}));
        assert!(matches!(r, Err(ConvertError::InvalidBuffer(_))));
    }

    #[test]
    fn missing_payload_rejected() {
        let r = LegacyClarityValue::from_json(&json!({"type": 13}));
        assert!(matches!(
            r,
            Err(ConvertError::MissingField {
                type_id: 13,
                field: "data"
            })
        ));
    }

    #[test]
    fn unknown_legacy_tag_rejected() {
        let r = AnyClarityValue::from_json(&json!({"type": 99}));
        assert!(matches!(r, Err(ConvertError::UnknownLegacyType(99))));
    }

    #[test]
    fn unknown_current_tag_rejected() {
        let r = AnyClarityValue::from_json(&json!({"type": "principal", "value": "SP"}));
        assert!(matches!(r, Err(ConvertError::UnknownType(_))));
    }

    #[test]
    fn untagged_value_rejected() {
        assert!(matches!(
            AnyClarityValue::from_json(&json!("hello")),
            Err(ConvertError::Malformed(_))
        ));
        assert!(matches!(
            AnyClarityValue::from_json(&json!({"value": 1})),
            Err(ConvertError::Malformed(_))
        ));
    }

    #[test]
    fn standard_principal_from_hash() {
        let v = LegacyClarityValue::from_json(&json!({
            "type": 5,
            "address": {"type": 0, "version": 22, "hash160": "a46ff88886c2ef9762d970b4d2c63678835bd39d"}
        }))
        .unwrap();
        assert_eq!(
            convert(v).unwrap(),
            ClarityValue::standard_principal("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7")
        );
    }

    #[test]
    fn contract_principal() {
        let v = LegacyClarityValue::from_json(&json!({
            "type": 6,
            "address": "SP000000000000000000002Q6VF78",
            "contractName": {"type": 2, "content": "pox-4"}
        }))
        .unwrap();
        assert_eq!(
            convert(v).unwrap(),
            ClarityValue::contract_principal("SP000000000000000000002Q6VF78", "pox-4")
        );
    }

    #[test]
    fn responses_and_optionals() {
        let v = LegacyClarityValue::from_json(&json!({
            "type": 7,
            "value": {"type": 10, "value": {"type": 3}}
        }))
        .unwrap();
        assert_eq!(
            convert(v).unwrap(),
            ClarityValue::ok(ClarityValue::some(ClarityValue::bool(true)))
        );

        let e = LegacyClarityValue::from_json(&json!({"type": 8, "value": {"type": 0, "value": 3}}))
            .unwrap();
        assert_eq!(convert(e).unwrap(), ClarityValue::err(ClarityValue::int(3)));
    }

    #[test]
    fn tuple_converts_each_entry() {
        let v = LegacyClarityValue::from_json(&json!({
            "type": 12,
            "data": {
                "b": {"type": 4},
                "a": {"type": 13, "data": "hi"}
            }
        }))
        .unwrap();
        assert_eq!(
            convert(v).unwrap(),
            ClarityValue::tuple([
                ("a", ClarityValue::ascii("hi")),
                ("b", ClarityValue::bool(false)),
            ])
        );
    }

    #[test]
    fn serde_uses_legacy_decoder() {
        let v: LegacyClarityValue = serde_json::from_value(json!({"type": 9})).unwrap();
        assert_eq!(v, LegacyClarityValue::OptionalNone);
    }

    #[test]
    fn convert_json_emits_current_form() {
        let out = convert_json(&json!({
            "type": 11,
            "list": [{"type": 1, "value": "1"}, {"type": 14, "data": "👋"}]
        }))
        .unwrap();
        assert_eq!(
            out,
            json!({"type": "list", "value": [
                {"type": "uint", "value": "1"},
                {"type": "utf8", "value": "👋"}
            ]})
        );
    }

    #[test]
    fn convert_json_passes_current_through() {
        let current = json!({"type": "some", "value": {"type": "ascii", "value": "x"}});
        assert_eq!(convert_json(&current).unwrap(), current);

        // Non-canonical but valid current forms are not rewritten.
        for current in [
            json!({"type": "uint", "value": 7}),
            json!({"type": "buffer", "value": "0xDEAD"}),
            json!({"type": "list", "value": [{"type": "int", "value": -3}]}),
        ] {
            assert_eq!(convert_json(&current).unwrap(), current);
        }
    }

    #[test]
    fn convert_json_still_validates_current() {
        assert!(convert_json(&json!({"type": "uint", "value": "abc"})).is_err());
        assert!(convert_json(&json!({"type": "buffer", "value": "zz"})).is_err());
    }
}
