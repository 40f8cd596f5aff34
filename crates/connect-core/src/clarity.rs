//! Clarity values in the current tagged representation.
//!
//! Serialized as `{"type": "<name>", "value": <payload>}`. Integers travel as
//! decimal strings so values above 2^53 survive JSON consumers, buffers as
//! lowercase hex.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A Clarity value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ClarityValue {
    #[serde(rename = "int")]
    Int(#[serde(with = "int_string")] i128),
    #[serde(rename = "uint")]
    UInt(#[serde(with = "int_string")] u128),
    #[serde(rename = "buffer")]
    Buffer(#[serde(with = "hex_bytes")] Vec<u8>),
    #[serde(rename = "true")]
    True,
    #[serde(rename = "false")]
    False,
    /// Standard principal, c32check-encoded.
    #[serde(rename = "address")]
    Address(String),
    /// Contract principal, `<address>.<contract-name>`.
    #[serde(rename = "contract")]
    Contract(String),
    #[serde(rename = "ok")]
    ResponseOk(Box<ClarityValue>),
    #[serde(rename = "err")]
    ResponseErr(Box<ClarityValue>),
    #[serde(rename = "none")]
    OptionalNone,
    #[serde(rename = "some")]
    OptionalSome(Box<ClarityValue>),
    #[serde(rename = "list")]
    List(Vec<ClarityValue>),
    #[serde(rename = "tuple")]
    Tuple(BTreeMap<String, ClarityValue>),
    #[serde(rename = "ascii")]
    StringAscii(String),
    #[serde(rename = "utf8")]
    StringUtf8(String),
}

// Constructors, one per type family.
impl ClarityValue {
    pub fn int(value: i128) -> Self {
        Self::Int(value)
    }

    pub fn uint(value: u128) -> Self {
        Self::UInt(value)
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(bytes.into())
    }

    pub fn bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    pub fn ascii(text: impl Into<String>) -> Self {
        Self::StringAscii(text.into())
    }

    pub fn utf8(text: impl Into<String>) -> Self {
        Self::StringUtf8(text.into())
    }

    pub fn none() -> Self {
        Self::OptionalNone
    }

    pub fn some(value: ClarityValue) -> Self {
        Self::OptionalSome(Box::new(value))
    }

    pub fn ok(value: ClarityValue) -> Self {
        Self::ResponseOk(Box::new(value))
    }

    pub fn err(value: ClarityValue) -> Self {
        Self::ResponseErr(Box::new(value))
    }

    pub fn list(items: impl IntoIterator<Item = ClarityValue>) -> Self {
        Self::List(items.into_iter().collect())
    }

    pub fn tuple<K: Into<String>>(entries: impl IntoIterator<Item = (K, ClarityValue)>) -> Self {
        Self::Tuple(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn standard_principal(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }

    pub fn contract_principal(address: &str, contract_name: &str) -> Self {
        Self::Contract(format!("{address}.{contract_name}"))
    }

    /// Name of the `type` tag in the JSON form.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Buffer(_) => "buffer",
            Self::True => "true",
            Self::False => "false",
            Self::Address(_) => "address",
            Self::Contract(_) => "contract",
            Self::ResponseOk(_) => "ok",
            Self::ResponseErr(_) => "err",
            Self::OptionalNone => "none",
            Self::OptionalSome(_) => "some",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::StringAscii(_) => "ascii",
            Self::StringUtf8(_) => "utf8",
        }
    }

    /// Returns true if `name` is a `type` tag of the current representation.
    pub fn is_type_name(name: &str) -> bool {
        matches!(
            name,
            "int"
                | "uint"
                | "buffer"
                | "true"
                | "false"
                | "address"
                | "contract"
                | "ok"
                | "err"
                | "none"
                | "some"
                | "list"
                | "tuple"
                | "ascii"
                | "utf8"
        )
    }
}

/// Integers as decimal strings; numbers are accepted on input.
mod int_string {
    use super::*;

    pub fn serialize<T: fmt::Display, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<i64> + TryFrom<u64>,
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IntVisitor(PhantomData))
    }

    struct IntVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for IntVisitor<T>
    where
        T: FromStr + TryFrom<i64> + TryFrom<u64>,
    {
        type Value = T;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer as number or decimal string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            T::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            T::try_from(v).map_err(|_| E::custom(format!("integer {v} out of range")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            let v = v.trim();
            T::from_str(v).map_err(|_| E::custom(format!("invalid integer: '{v}'")))
        }
    }
}

/// Byte buffers as hex strings, with or without a `0x` prefix on input.
mod hex_bytes {
    use super::*;

    pub fn serialize<T: AsRef<[u8]>, S: Serializer>(
        bytes: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(stripped).map_err(|e| de::Error::custom(format!("invalid hex buffer: {e}")))
    }
}
