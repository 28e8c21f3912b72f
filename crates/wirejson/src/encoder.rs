//! JSON encoder.
//!
//! Host values reach the encoder through the [`WriteJson`] trait, which is
//! implemented for [`Value`] and the common Rust shapes (booleans, numbers,
//! strings, sequences, maps, options, date-times). Domain objects opt in by
//! implementing [`ToJsonObject`] and are passed as `&dyn ToJsonObject`.

use std::collections::{BTreeMap, HashMap};
use std::io;

use chrono::{DateTime, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use tracing::{debug, trace};
use wirejson_base64::{encoded_len, to_base64_bin};
use wirejson_buffers::Writer;

use crate::decimal::Decimal;
use crate::error::{JsonError, Result};
use crate::number;
use crate::options::CodecOptions;
use crate::utf;
use crate::value::{Map, Value};

/// Format of encoded date-times: sortable, no fraction, no offset.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Capability for domain objects that serialize as a JSON object.
///
/// ```
/// use wirejson::{encode, Map, ToJsonObject, Value};
///
/// struct Cookie {
///     name: String,
///     secure: bool,
/// }
///
/// impl ToJsonObject for Cookie {
///     fn to_json_object(&self) -> Map {
///         let mut map = Map::new();
///         map.insert("name".into(), Value::from(self.name.as_str()));
///         map.insert("secure".into(), Value::Bool(self.secure));
///         map
///     }
/// }
///
/// let cookie = Cookie { name: "sid".into(), secure: true };
/// let obj: &dyn ToJsonObject = &cookie;
/// assert_eq!(encode(obj).unwrap(), br#"{"name":"sid","secure":true}"#);
/// ```
pub trait ToJsonObject {
    fn to_json_object(&self) -> Map;
}

/// A host value the encoder knows how to write.
pub trait WriteJson {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()>;
}

/// Bytes written as a base64 JSON string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blob<'a>(pub &'a [u8]);

/// A string held as raw UTF-16 code units, possibly with unpaired surrogates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Utf16Str<'a>(pub &'a [u16]);

/// Writes JSON text into a growable buffer.
///
/// ```
/// use wirejson::{JsonEncoder, Value};
///
/// let mut encoder = JsonEncoder::new();
/// let value = Value::Array(vec![Value::Integer(1), Value::from("two")]);
/// assert_eq!(encoder.encode(&value).unwrap(), br#"[1,"two"]"#);
/// ```
pub struct JsonEncoder {
    pub writer: Writer,
    options: CodecOptions,
    depth: usize,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::with_options(CodecOptions::default())
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            writer: Writer::with_alloc_size(options.initial_buffer_size),
            options,
            depth: 0,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encodes `value` and returns the JSON bytes.
    pub fn encode<T: WriteJson + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>> {
        self.write_document(value)?;
        Ok(self.writer.flush())
    }

    /// Encodes `value` and writes the JSON bytes to `target`. Nothing is
    /// written to `target` when encoding fails.
    pub fn encode_to<T, W>(&mut self, value: &T, mut target: W) -> Result<()>
    where
        T: WriteJson + ?Sized,
        W: io::Write,
    {
        self.write_document(value)?;
        let result = target.write_all(self.writer.as_slice());
        self.writer.reset();
        result.map_err(JsonError::from)
    }

    fn write_document<T: WriteJson + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.writer.reset();
        self.depth = 0;
        match value.write_json(self) {
            Ok(()) => {
                trace!(bytes = self.writer.len(), "encoded JSON document");
                Ok(())
            }
            Err(err) => {
                debug!(kind = %err.kind(), offset = ?err.offset(), "JSON encode failed");
                self.writer.reset();
                Err(err)
            }
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(JsonError::DepthLimitExceeded {
                offset: self.writer.len(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------ Any

    pub fn write_any(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Integer(n) => self.write_integer(*n),
            Value::Decimal(d) => self.write_decimal(d),
            Value::Float(f) => return self.write_float(*f),
            Value::String(s) => self.write_str(s),
            Value::Array(items) => return self.write_arr(items),
            Value::Object(map) => return self.write_obj(map),
            Value::Binary(bytes) => self.write_bin(bytes),
        }
        Ok(())
    }

    // --------------------------------------------------------------- Scalars

    pub fn write_null(&mut self) {
        self.writer.ascii("null");
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.ascii(if b { "true" } else { "false" });
    }

    pub fn write_integer(&mut self, n: i64) {
        self.writer.ascii(&n.to_string());
    }

    pub fn write_u_integer(&mut self, n: u64) {
        self.writer.ascii(&n.to_string());
    }

    /// Writes a finite float; `NaN` and infinities have no JSON form.
    pub fn write_float(&mut self, f: f64) -> Result<()> {
        if !f.is_finite() {
            return Err(self.unsupported(format!("non-finite float {f}")));
        }
        self.writer.ascii(&number::float_text(f));
        Ok(())
    }

    pub fn write_f32(&mut self, f: f32) -> Result<()> {
        if !f.is_finite() {
            return Err(self.unsupported(format!("non-finite float {f}")));
        }
        self.writer.ascii(&number::float_text(f));
        Ok(())
    }

    pub fn write_decimal(&mut self, d: &Decimal) {
        self.writer.ascii(&number::decimal_text(d));
    }

    fn unsupported(&self, reason: String) -> JsonError {
        JsonError::UnsupportedValueKind {
            reason,
            offset: self.writer.len(),
        }
    }

    // --------------------------------------------------------------- Strings

    pub fn write_str(&mut self, s: &str) {
        self.writer.u8(b'"');
        utf::write_str(&mut self.writer, s);
        self.writer.u8(b'"');
    }

    pub fn write_utf16(&mut self, units: &[u16]) {
        self.writer.u8(b'"');
        utf::write_utf16(&mut self.writer, units.iter().copied());
        self.writer.u8(b'"');
    }

    pub fn write_char(&mut self, c: char) {
        let mut buf = [0u16; 2];
        self.write_utf16(c.encode_utf16(&mut buf));
    }

    /// Writes bytes as a standard padded base64 string.
    pub fn write_bin(&mut self, bytes: &[u8]) {
        let length = encoded_len(bytes.len());
        self.writer.ensure_capacity(length + 2);
        let x = self.writer.x;
        self.writer.uint8[x] = b'"';
        let end = to_base64_bin(bytes, 0, bytes.len(), &mut self.writer.uint8, x + 1);
        self.writer.uint8[end] = b'"';
        self.writer.x = end + 1;
    }

    pub fn write_date_time(&mut self, dt: &NaiveDateTime) {
        self.writer.u8(b'"');
        self.writer.ascii(&dt.format(DATE_TIME_FORMAT).to_string());
        self.writer.u8(b'"');
    }

    // ------------------------------------------------------------ Containers

    pub fn write_arr(&mut self, items: &[Value]) -> Result<()> {
        self.write_seq(items)
    }

    /// Writes any sequence of encodable items as a JSON array.
    pub fn write_seq<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: WriteJson,
    {
        self.enter()?;
        self.writer.u8(b'[');
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            item.write_json(self)?;
        }
        self.writer.u8(b']');
        self.leave();
        Ok(())
    }

    pub fn write_obj(&mut self, map: &Map) -> Result<()> {
        self.write_map(map)
    }

    /// Writes key/value pairs as a JSON object, in iteration order.
    pub fn write_map<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: WriteJson,
    {
        self.enter()?;
        self.writer.u8(b'{');
        for (i, (key, value)) in entries.into_iter().enumerate() {
            if i > 0 {
                self.writer.u8(b',');
            }
            self.write_str(key.as_ref());
            self.writer.u8(b':');
            value.write_json(self)?;
        }
        self.writer.u8(b'}');
        self.leave();
        Ok(())
    }

    pub fn write_object<T: ToJsonObject + ?Sized>(&mut self, object: &T) -> Result<()> {
        self.write_obj(&object.to_json_object())
    }
}

// ------------------------------------------------------------- Host shapes

impl WriteJson for Value {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_any(self)
    }
}

impl WriteJson for bool {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_boolean(*self);
        Ok(())
    }
}

macro_rules! impl_write_json_int {
    ($method:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl WriteJson for $t {
                fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
                    encoder.$method(*self as $wide);
                    Ok(())
                }
            }
        )*
    };
}

impl_write_json_int!(write_integer as i64: i8, i16, i32, i64, isize);
impl_write_json_int!(write_u_integer as u64: u8, u16, u32, u64, usize);

impl WriteJson for f32 {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_f32(*self)
    }
}

impl WriteJson for f64 {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_float(*self)
    }
}

impl WriteJson for Decimal {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_decimal(self);
        Ok(())
    }
}

impl WriteJson for str {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_str(self);
        Ok(())
    }
}

impl WriteJson for String {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_str(self);
        Ok(())
    }
}

impl WriteJson for char {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_char(*self);
        Ok(())
    }
}

impl WriteJson for Utf16Str<'_> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_utf16(self.0);
        Ok(())
    }
}

impl WriteJson for Blob<'_> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_bin(self.0);
        Ok(())
    }
}

impl WriteJson for NaiveDateTime {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_date_time(self);
        Ok(())
    }
}

impl<Tz: TimeZone> WriteJson for DateTime<Tz> {
    /// Written as the local wall-clock time of `Tz`, without an offset.
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_date_time(&self.naive_local());
        Ok(())
    }
}

impl<T: WriteJson> WriteJson for [T] {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_seq(self)
    }
}

impl<T: WriteJson, const N: usize> WriteJson for [T; N] {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_seq(self)
    }
}

impl<T: WriteJson> WriteJson for Vec<T> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_seq(self)
    }
}

impl<T: WriteJson> WriteJson for Option<T> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        match self {
            Some(value) => value.write_json(encoder),
            None => {
                encoder.write_null();
                Ok(())
            }
        }
    }
}

impl<T: WriteJson + ?Sized> WriteJson for &T {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        (**self).write_json(encoder)
    }
}

impl<T: WriteJson + ?Sized> WriteJson for Box<T> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        (**self).write_json(encoder)
    }
}

impl<K: AsRef<str>, V: WriteJson, S> WriteJson for IndexMap<K, V, S> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_map(self)
    }
}

impl<K: AsRef<str>, V: WriteJson> WriteJson for BTreeMap<K, V> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_map(self)
    }
}

impl<K: AsRef<str>, V: WriteJson, S> WriteJson for HashMap<K, V, S> {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_map(self)
    }
}

impl WriteJson for dyn ToJsonObject + '_ {
    fn write_json(&self, encoder: &mut JsonEncoder) -> Result<()> {
        encoder.write_object(self)
    }
}
