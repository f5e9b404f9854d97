//! Wire primitives: the 32-byte element, addresses, and typed values.
//!
//! Serialized payloads are flat sequences of [`Element`]s. Every
//! fixed-width leaf value occupies exactly one element holding its numeric
//! value big-endian; variable-length data is packed across elements behind
//! an explicit byte-count length element.

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Byte width of one wire element.
pub const ELEMENT_WIDTH: usize = 32;

/// One fixed-width wire element: a 32-byte big-endian word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Element(pub [u8; ELEMENT_WIDTH]);

impl Element {
    pub const ZERO: Element = Element([0u8; ELEMENT_WIDTH]);

    pub fn from_u64(v: u64) -> Self {
        let mut bytes = [0u8; ELEMENT_WIDTH];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Element(bytes)
    }

    pub fn from_u128(v: u128) -> Self {
        let mut bytes = [0u8; ELEMENT_WIDTH];
        bytes[16..].copy_from_slice(&v.to_be_bytes());
        Element(bytes)
    }

    /// Two's-complement sign extension to the full word.
    pub fn from_i64(v: i64) -> Self {
        let fill = if v < 0 { 0xff } else { 0x00 };
        let mut bytes = [fill; ELEMENT_WIDTH];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Element(bytes)
    }

    pub fn from_i128(v: i128) -> Self {
        let fill = if v < 0 { 0xff } else { 0x00 };
        let mut bytes = [fill; ELEMENT_WIDTH];
        bytes[16..].copy_from_slice(&v.to_be_bytes());
        Element(bytes)
    }

    pub fn from_bool(v: bool) -> Self {
        Element::from_u64(v as u64)
    }

    /// Pack up to 32 raw bytes left-aligned, zero-padding the tail. Used
    /// for the chunks of variable-length String/Bytes data.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` is longer than the element width; callers chunk
    /// their input first.
    pub fn from_chunk(chunk: &[u8]) -> Self {
        assert!(chunk.len() <= ELEMENT_WIDTH);
        let mut bytes = [0u8; ELEMENT_WIDTH];
        bytes[..chunk.len()].copy_from_slice(chunk);
        Element(bytes)
    }

    /// Pack up to 32 raw bytes right-aligned as a big-endian number. Used
    /// for single-word short strings.
    pub fn from_short_bytes(data: &[u8]) -> Option<Self> {
        if data.len() > ELEMENT_WIDTH {
            return None;
        }
        let mut bytes = [0u8; ELEMENT_WIDTH];
        bytes[ELEMENT_WIDTH - data.len()..].copy_from_slice(data);
        Some(Element(bytes))
    }

    /// The numeric value as `u64`, or `None` if it does not fit.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(tail))
    }

    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut tail = [0u8; 16];
        tail.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(tail))
    }

    /// The numeric value as two's-complement `i64`, or `None` if the word
    /// is not a faithful sign extension of a 64-bit value.
    pub fn to_i64(&self) -> Option<i64> {
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&self.0[24..]);
        let v = i64::from_be_bytes(tail);
        if *self == Element::from_i64(v) {
            Some(v)
        } else {
            None
        }
    }

    pub fn to_i128(&self) -> Option<i128> {
        let mut tail = [0u8; 16];
        tail.copy_from_slice(&self.0[16..]);
        let v = i128::from_be_bytes(tail);
        if *self == Element::from_i128(v) {
            Some(v)
        } else {
            None
        }
    }

    /// Strict boolean decode: only 0 and 1 are booleans.
    pub fn to_bool(&self) -> Option<bool> {
        match self.to_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        }
    }

    /// The packed bytes of a right-aligned short string: leading zero
    /// bytes stripped.
    pub fn short_bytes(&self) -> &[u8] {
        let start = self.0.iter().position(|b| *b != 0).unwrap_or(ELEMENT_WIDTH);
        &self.0[start..]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; ELEMENT_WIDTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        crate::hash::hex_encode(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = parse_hex_word(s)?;
        Ok(Element(bytes))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Element(0x{})", self.to_hex())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Element::from_hex(&s).map_err(D::Error::custom)
    }
}

/// An opaque 32-byte principal, rendered as `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub const ZERO: Address = Address([0u8; 32]);

    /// Convenience constructor placing `v` in the low bytes.
    pub fn from_low_u64(v: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Address(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        Ok(Address(parse_hex_word(s)?))
    }

    pub fn to_hex(&self) -> String {
        crate::hash::hex_encode(&self.0)
    }

    pub fn to_element(&self) -> Element {
        Element(self.0)
    }

    pub fn from_element(element: Element) -> Self {
        Address(element.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.to_hex()))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(D::Error::custom)
    }
}

/// Parse an optionally `0x`-prefixed hex string into a right-aligned
/// 32-byte word. Odd-length input gets an implicit leading zero digit.
fn parse_hex_word(s: &str) -> Result<[u8; 32], String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err("empty hex string".to_string());
    }
    if digits.len() > 64 {
        return Err(format!("hex string too long: {} digits", digits.len()));
    }

    let mut bytes = [0u8; 32];
    let padded: String = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };

    let byte_len = padded.len() / 2;
    for i in 0..byte_len {
        let pair = &padded[i * 2..i * 2 + 2];
        let b = u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex: '{}'", pair))?;
        bytes[32 - byte_len + i] = b;
    }
    Ok(bytes)
}

/// A typed payload value, mirroring [`sigil_schema::FieldType`] one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    ShortString(String),
    String(String),
    Uint64(u64),
    Uint128(u128),
    Uint256(Element),
    Int64(i64),
    Int128(i128),
    Int256(Element),
    Address(Address),
    Bool(bool),
    Bytes(Vec<u8>),
    /// A tagged-union value: zero-based variant index plus the chosen
    /// arm's payload values.
    Enum { variant: u32, values: Vec<Value> },
    Struct(Vec<Value>),
}

impl Value {
    /// Short human-readable kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::ShortString(_) => "short_string",
            Value::String(_) => "string",
            Value::Uint64(_) => "uint64",
            Value::Uint128(_) => "uint128",
            Value::Uint256(_) => "uint256",
            Value::Int64(_) => "int64",
            Value::Int128(_) => "int128",
            Value::Int256(_) => "int256",
            Value::Address(_) => "address",
            Value::Bool(_) => "bool",
            Value::Bytes(_) => "bytes",
            Value::Enum { .. } => "enum",
            Value::Struct(_) => "struct",
        }
    }
}
