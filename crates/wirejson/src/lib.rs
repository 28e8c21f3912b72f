//! JSON wire codec for browser-automation traffic.
//!
//! Encodes host values to UTF-8 JSON bytes and decodes JSON bytes into a
//! [`Value`] tree, with a few behaviours tuned for a driver's wire protocol:
//!
//! - Numbers keep the precision class of their literal: integers, doubles,
//!   and exact [`Decimal`]s for literals longer than a double holds.
//! - Strings carrying a base64 PNG (screenshots) decode straight to
//!   [`Value::Binary`] bytes.
//! - Objects preserve key insertion order.
//! - Nesting is capped (8 levels by default) on both paths.
//!
//! # Example
//!
//! ```
//! use wirejson::{decode, encode, Value};
//!
//! let value = decode(br#"{"sessionId":"abc","value":{"ready":true,"n":3}}"#).unwrap();
//! assert_eq!(value.get("sessionId").and_then(Value::as_str), Some("abc"));
//!
//! let bytes = encode(&value).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), value);
//! ```

pub mod decimal;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod number;
pub mod options;
pub mod utf;
pub mod value;

use std::io;

pub use decimal::{Decimal, ParseDecimalError};
pub use decoder::{JsonDecoder, PNG_BASE64_PREFIX};
pub use encoder::{Blob, JsonEncoder, ToJsonObject, Utf16Str, WriteJson};
pub use error::{ErrorKind, JsonError, Result};
pub use options::{CodecOptions, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH};
pub use value::{IntWidth, Map, Value};

/// Encodes `value` with default options.
pub fn encode<T: WriteJson + ?Sized>(value: &T) -> Result<Vec<u8>> {
    JsonEncoder::new().encode(value)
}

pub fn encode_with<T: WriteJson + ?Sized>(value: &T, options: CodecOptions) -> Result<Vec<u8>> {
    JsonEncoder::with_options(options).encode(value)
}

/// Encodes `value` with default options into `target`.
pub fn encode_to<T, W>(value: &T, target: W) -> Result<()>
where
    T: WriteJson + ?Sized,
    W: io::Write,
{
    JsonEncoder::new().encode_to(value, target)
}

/// Decodes one JSON document with default options.
pub fn decode(input: &[u8]) -> Result<Value> {
    JsonDecoder::new().decode(input)
}

pub fn decode_with(input: &[u8], options: CodecOptions) -> Result<Value> {
    JsonDecoder::with_options(options).decode(input)
}

pub fn decode_str(input: &str) -> Result<Value> {
    JsonDecoder::new().decode_str(input)
}

/// Reads `reader` to its end and decodes the bytes as one JSON document.
pub fn decode_reader<R: io::Read>(reader: R) -> Result<Value> {
    JsonDecoder::new().decode_reader(reader)
}

/// Whether `s` is bracketed like a serialized object or array.
fn looks_like_json(s: &str) -> bool {
    let bytes = s.as_bytes();
    match (bytes.first(), bytes.last()) {
        _ if bytes.len() < 2 => false,
        (Some(b'{'), Some(b'}')) | (Some(b'['), Some(b']')) => true,
        _ => false,
    }
}

/// Decodes strings that hold serialized JSON.
///
/// A [`Value::String`] that starts with `{` and ends with `}`, or starts with
/// `[` and ends with `]`, is decoded and the result returned. Every other
/// value is returned unchanged. Decode errors propagate.
///
/// ```
/// use wirejson::{try_parse_if_json, Value};
///
/// let nested = try_parse_if_json(Value::from("[1,2]")).unwrap();
/// assert_eq!(nested, Value::Array(vec![Value::Integer(1), Value::Integer(2)]));
///
/// let plain = try_parse_if_json(Value::from("hello")).unwrap();
/// assert_eq!(plain, Value::from("hello"));
/// ```
pub fn try_parse_if_json(value: Value) -> Result<Value> {
    if let Value::String(s) = &value {
        if looks_like_json(s) {
            return decode_str(s);
        }
    }
    Ok(value)
}

/// [`try_parse_if_json`] for a borrowed string. Non-JSON text comes back as
/// [`Value::String`].
pub fn try_parse_str_if_json(s: &str) -> Result<Value> {
    if looks_like_json(s) {
        decode_str(s)
    } else {
        Ok(Value::from(s))
    }
}
