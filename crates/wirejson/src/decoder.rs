//! JSON decoder.

use std::io;

use tracing::{debug, trace};
use wirejson_base64::from_base64_bin;

use crate::error::{JsonError, Result};
use crate::number::{self, NUMBER_CLASS, NUM_POINT};
use crate::options::CodecOptions;
use crate::utf::{self, Utf16Char, Utf8Fault, HEX_VALUES};
use crate::value::{Map, Value};

/// Base64 of the PNG signature. A string starting with it decodes as
/// [`Value::Binary`].
pub const PNG_BASE64_PREFIX: &[u8] = b"iVBORw0KG";

/// Reads one JSON document from a byte buffer.
///
/// Beyond standard JSON the decoder accepts single-quoted strings and keys,
/// a `\'` escape, and the Unicode spaces U+00A0 and U+0085 as whitespace.
///
/// ```
/// use wirejson::{JsonDecoder, Value};
///
/// let mut decoder = JsonDecoder::new();
/// let value = decoder.decode(br#"{"n": 1, "s": 'x'}"#).unwrap();
/// assert_eq!(value.get("n"), Some(&Value::Integer(1)));
/// assert_eq!(value.get("s"), Some(&Value::from("x")));
/// ```
pub struct JsonDecoder {
    data: Vec<u8>,
    x: usize,
    depth: usize,
    units: Vec<u16>,
    options: CodecOptions,
}

impl Default for JsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::with_options(CodecOptions::default())
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            data: Vec::new(),
            x: 0,
            depth: 0,
            units: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn decode(&mut self, input: &[u8]) -> Result<Value> {
        self.data.clear();
        self.data.extend_from_slice(input);
        self.run()
    }

    pub fn decode_str(&mut self, input: &str) -> Result<Value> {
        self.decode(input.as_bytes())
    }

    /// Drains `reader` to its end, then decodes the collected bytes.
    pub fn decode_reader<R: io::Read>(&mut self, mut reader: R) -> Result<Value> {
        self.data.clear();
        reader.read_to_end(&mut self.data)?;
        self.run()
    }

    fn run(&mut self) -> Result<Value> {
        self.x = 0;
        self.depth = 0;
        let result = self.read_document();
        match &result {
            Ok(value) => trace!(bytes = self.data.len(), kind = value.kind_name(), "decoded JSON document"),
            Err(err) => debug!(kind = %err.kind(), offset = ?err.offset(), "JSON decode failed"),
        }
        result
    }

    fn read_document(&mut self) -> Result<Value> {
        let value = self.read_any()?;
        if self.peek()?.is_some() {
            return Err(JsonError::UnexpectedCharacter { offset: self.x });
        }
        Ok(value)
    }

    // ------------------------------------------------------------ Scanning

    /// Skips whitespace and returns the lead byte of the next significant
    /// character, leaving the cursor on it. `None` at end of input.
    fn peek(&mut self) -> Result<Option<u8>> {
        let len = self.data.len();
        while self.x < len {
            let lead = self.data[self.x];
            if lead < 0x80 {
                if !matches!(lead, b' ' | 0x09..=0x0D) {
                    return Ok(Some(lead));
                }
                self.x += 1;
                continue;
            }
            match utf::read_utf8(&self.data, self.x, len) {
                Ok((Utf16Char::Single(0xA0 | 0x85), width)) => self.x += width,
                Ok((Utf16Char::Single(_), _)) => return Ok(Some(lead)),
                Ok((Utf16Char::Pair(..), _)) | Err(Utf8Fault::Malformed) => {
                    return Err(JsonError::UnexpectedCharacter { offset: self.x })
                }
                Err(Utf8Fault::Truncated) => {
                    return Err(JsonError::UnexpectedTermination { offset: len })
                }
            }
        }
        Ok(None)
    }

    /// Like [`peek`](Self::peek), failing at end of input.
    fn next_significant(&mut self) -> Result<u8> {
        self.peek()?.ok_or(JsonError::UnexpectedTermination {
            offset: self.data.len(),
        })
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(JsonError::DepthLimitExceeded { offset: self.x });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // ---------------------------------------------------------------- Any

    fn read_any(&mut self) -> Result<Value> {
        match self.next_significant()? {
            b'{' => self.read_obj(),
            b'[' => self.read_arr(),
            b'"' | b'\'' => {
                if self.data[self.x + 1..].starts_with(PNG_BASE64_PREFIX) {
                    self.read_bin()
                } else {
                    self.read_str().map(Value::String)
                }
            }
            b't' => self.read_literal(b"true", Value::Bool(true)),
            b'f' => self.read_literal(b"false", Value::Bool(false)),
            b'n' => self.read_literal(b"null", Value::Null),
            _ => self.read_num(),
        }
    }

    fn read_literal(&mut self, literal: &[u8], value: Value) -> Result<Value> {
        let end = self.x + literal.len();
        if self.data.get(self.x..end) != Some(literal) {
            return Err(JsonError::InvalidLiteral { offset: self.x });
        }
        self.x = end;
        Ok(value)
    }

    // ------------------------------------------------------------- Number

    fn read_num(&mut self) -> Result<Value> {
        let start = self.x;
        // A number starts with a sign, a digit or a point; `.5` reads like `-.5`.
        if NUMBER_CLASS[self.data[start] as usize] > NUM_POINT {
            return Err(JsonError::InvalidNumber { offset: start });
        }
        let (len, shape) = number::scan(&self.data[start..]);
        self.x = start + len;
        std::str::from_utf8(&self.data[start..self.x])
            .ok()
            .and_then(|text| number::classify(text, shape))
            .ok_or(JsonError::InvalidNumber { offset: start })
    }

    // ------------------------------------------------------------- String

    /// Index of the quote closing the string whose body starts at `start`.
    fn find_closing_quote(&self, start: usize, quote: u8) -> Result<usize> {
        let len = self.data.len();
        let mut i = start;
        while i < len {
            match self.data[i] {
                b'\\' => i += 2,
                b if b == quote => return Ok(i),
                _ => i += 1,
            }
        }
        Err(JsonError::UnexpectedTermination { offset: len })
    }

    fn read_str(&mut self) -> Result<String> {
        let quote = self.data[self.x];
        let start = self.x + 1;
        let end = self.find_closing_quote(start, quote)?;
        self.units.clear();
        self.units.reserve(end - start);
        let mut i = start;
        while i < end {
            let b = self.data[i];
            if b == b'\\' {
                let escaped = self.data[i + 1];
                let unit = match escaped {
                    b'u' => {
                        let unit = self.read_unicode_escape(i, end)?;
                        self.units.push(unit);
                        i += 6;
                        continue;
                    }
                    b'"' | b'\\' | b'/' | b'\'' => u16::from(escaped),
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => 0x0A,
                    b'r' => 0x0D,
                    b't' => 0x09,
                    _ => return Err(JsonError::InvalidEscape { offset: i }),
                };
                self.units.push(unit);
                i += 2;
            } else if b < 0x80 {
                self.units.push(u16::from(b));
                i += 1;
            } else {
                match utf::read_utf8(&self.data, i, end) {
                    Ok((Utf16Char::Single(unit), width)) => {
                        self.units.push(unit);
                        i += width;
                    }
                    Ok((Utf16Char::Pair(high, low), width)) => {
                        self.units.push(high);
                        self.units.push(low);
                        i += width;
                    }
                    Err(_) => return Err(JsonError::InvalidUnicode { offset: i }),
                }
            }
        }
        let s = String::from_utf16(&self.units)
            .map_err(|_| JsonError::InvalidUnicode { offset: start })?;
        self.x = end + 1;
        Ok(s)
    }

    /// Parses the four hex digits of the `\u` escape at `data[at]`.
    fn read_unicode_escape(&self, at: usize, end: usize) -> Result<u16> {
        if at + 6 > end {
            return Err(JsonError::InvalidUnicode { offset: at });
        }
        let mut unit: u16 = 0;
        for &b in &self.data[at + 2..at + 6] {
            let v = HEX_VALUES[b as usize];
            if v == 0xFF {
                return Err(JsonError::InvalidUnicode { offset: at });
            }
            unit = (unit << 4) | u16::from(v);
        }
        Ok(unit)
    }

    /// Reads a base64 PNG string straight into bytes.
    fn read_bin(&mut self) -> Result<Value> {
        let quote = self.data[self.x];
        let start = self.x + 1;
        let end = self.find_closing_quote(start, quote)?;
        let bytes = from_base64_bin(&self.data, start, end - start);
        self.x = end + 1;
        Ok(Value::Binary(bytes))
    }

    // ------------------------------------------------------------- Array

    fn read_arr(&mut self) -> Result<Value> {
        self.enter()?;
        self.x += 1;
        let mut items = Vec::new();
        if self.next_significant()? == b']' {
            self.x += 1;
            self.leave();
            return Ok(Value::Array(items));
        }
        loop {
            if matches!(self.next_significant()?, b']' | b',') {
                return Err(JsonError::InvalidArray { offset: self.x });
            }
            items.push(self.read_any()?);
            match self.next_significant()? {
                b',' => self.x += 1,
                b']' => {
                    self.x += 1;
                    break;
                }
                _ => return Err(JsonError::InvalidArray { offset: self.x }),
            }
        }
        self.leave();
        Ok(Value::Array(items))
    }

    // ------------------------------------------------------------- Object

    fn read_obj(&mut self) -> Result<Value> {
        self.enter()?;
        self.x += 1;
        let mut map = Map::new();
        if self.next_significant()? == b'}' {
            self.x += 1;
            self.leave();
            return Ok(Value::Object(map));
        }
        loop {
            if !matches!(self.next_significant()?, b'"' | b'\'') {
                return Err(JsonError::InvalidObject { offset: self.x });
            }
            let key = self.read_str()?;
            if self.next_significant()? != b':' {
                return Err(JsonError::InvalidObject { offset: self.x });
            }
            self.x += 1;
            if matches!(self.next_significant()?, b'}' | b',') {
                return Err(JsonError::InvalidObject { offset: self.x });
            }
            let value = self.read_any()?;
            // Duplicate keys: the last value wins, the first position is kept.
            map.insert(key, value);
            match self.next_significant()? {
                b',' => self.x += 1,
                b'}' => {
                    self.x += 1;
                    break;
                }
                _ => return Err(JsonError::InvalidObject { offset: self.x }),
            }
        }
        self.leave();
        Ok(Value::Object(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Decimal;
    use crate::error::ErrorKind;

    fn dec(input: &str) -> Value {
        JsonDecoder::new().decode_str(input).unwrap()
    }

    fn fail(input: &str) -> (ErrorKind, Option<usize>) {
        let err = JsonDecoder::new().decode_str(input).unwrap_err();
        (err.kind(), err.offset())
    }

    #[test]
    fn literals() {
        assert_eq!(dec("true"), Value::Bool(true));
        assert_eq!(dec(" false "), Value::Bool(false));
        assert_eq!(dec("null"), Value::Null);
        assert_eq!(fail("tru"), (ErrorKind::InvalidLiteral, Some(0)));
        assert_eq!(fail("nul1"), (ErrorKind::InvalidLiteral, Some(0)));
    }

    #[test]
    fn numbers() {
        assert_eq!(dec("0"), Value::Integer(0));
        assert_eq!(dec("-12"), Value::Integer(-12));
        assert_eq!(dec("2.5"), Value::Float(2.5));
        assert_eq!(dec("25e-1"), Value::Float(2.5));
        assert!(matches!(dec("0.1234567890123456"), Value::Decimal(_)));
        assert_eq!(fail("-"), (ErrorKind::InvalidNumber, Some(0)));
        assert_eq!(fail("[1, e5]"), (ErrorKind::InvalidNumber, Some(4)));
        assert_eq!(fail("x"), (ErrorKind::InvalidNumber, Some(0)));
    }

    #[test]
    fn leading_point_does_not_depend_on_sign() {
        assert_eq!(dec(".5"), Value::Float(0.5));
        assert_eq!(dec("-.5"), Value::Float(-0.5));
        assert_eq!(dec("+.5"), Value::Float(0.5));
        assert_eq!(dec("1."), Value::Float(1.0));
        assert_eq!(dec("[1, .5]"), Value::Array(vec![Value::Integer(1), Value::Float(0.5)]));
        assert_eq!(fail("."), (ErrorKind::InvalidNumber, Some(0)));
        assert_eq!(fail("-."), (ErrorKind::InvalidNumber, Some(0)));
    }

    #[test]
    fn significant_digit_threshold_counts_leading_zeros() {
        assert!(matches!(dec("0.00000000000001"), Value::Float(_)));
        assert_eq!(
            dec("0.0000000000000001"),
            Value::Decimal(Decimal::new(1, 16).unwrap())
        );
    }

    #[test]
    fn rejects_invalid_utf8_in_strings() {
        let cases: [&[u8]; 4] = [
            b"\"a\xE0\x80\x80b\"",
            b"\"\xE0\x80\xA2\"",
            b"\"\xED\xA0\x80\"",
            b"\"\xED\xA0\xBD\xED\xB8\x80\"",
        ];
        let mut decoder = JsonDecoder::new();
        for input in cases {
            let err = decoder.decode(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUnicode, "{input:?}");
        }
        assert_eq!(decoder.decode(b"\"a\xE0\x80\x80b\"").unwrap_err().offset(), Some(2));
        assert_eq!(
            decoder.decode("\"\u{D7FF}\u{E000}\"".as_bytes()).unwrap(),
            Value::from("\u{D7FF}\u{E000}")
        );
    }

    #[test]
    fn rejects_overlong_forms_between_tokens() {
        let err = JsonDecoder::new().decode(b"[1,\xE0\x80\xA01]").unwrap_err();
        assert_eq!((err.kind(), err.offset()), (ErrorKind::UnexpectedCharacter, Some(3)));
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(dec(r#""a\"b\\c\/d""#), Value::from("a\"b\\c/d"));
        assert_eq!(dec(r#""\b\f\n\r\t""#), Value::from("\u{8}\u{c}\n\r\t"));
        assert_eq!(dec(r#"'it\'s'"#), Value::from("it's"));
        assert_eq!(dec(r#"'say "hi"'"#), Value::from("say \"hi\""));
        assert_eq!(dec(r#""é€""#), Value::from("\u{e9}\u{20ac}"));
        assert_eq!(dec("\"\u{e9}\u{20ac}\u{1f600}\""), Value::from("\u{e9}\u{20ac}\u{1f600}"));
        assert_eq!(dec(r#""😀""#), Value::from("\u{1f600}"));
    }

    #[test]
    fn string_errors() {
        assert_eq!(fail(r#""\q""#), (ErrorKind::InvalidEscape, Some(1)));
        assert_eq!(fail(r#""\uZZZZ""#), (ErrorKind::InvalidUnicode, Some(1)));
        assert_eq!(fail(r#""\u12""#), (ErrorKind::InvalidUnicode, Some(1)));
        assert_eq!(fail(r#""\uD83D""#).0, ErrorKind::InvalidUnicode);
        assert_eq!(fail("\"abc"), (ErrorKind::UnexpectedTermination, Some(4)));
        assert_eq!(fail("\"ab\\"), (ErrorKind::UnexpectedTermination, Some(4)));
        let mut decoder = JsonDecoder::new();
        let err = decoder.decode(b"\"\xC3(\"").unwrap_err();
        assert_eq!((err.kind(), err.offset()), (ErrorKind::InvalidUnicode, Some(1)));
        let err = decoder.decode(b"\"\xC3\"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUnicode);
    }

    #[test]
    fn whitespace() {
        assert_eq!(dec("\t\r\n\u{b}\u{c} 1"), Value::Integer(1));
        assert_eq!(dec("\u{a0}[\u{85}1\u{a0}]\u{85}"), Value::Array(vec![Value::Integer(1)]));
    }

    #[test]
    fn structure_errors() {
        assert_eq!(fail(""), (ErrorKind::UnexpectedTermination, Some(0)));
        assert_eq!(fail("   "), (ErrorKind::UnexpectedTermination, Some(3)));
        assert_eq!(fail(r#"{"a":}"#), (ErrorKind::InvalidObject, Some(5)));
        assert_eq!(fail(r#"{"a" 1}"#), (ErrorKind::InvalidObject, Some(5)));
        assert_eq!(fail(r#"{a:1}"#), (ErrorKind::InvalidObject, Some(1)));
        assert_eq!(fail(r#"{"a":1,}"#), (ErrorKind::InvalidObject, Some(7)));
        assert_eq!(fail(r#"{"a":1 "b":2}"#), (ErrorKind::InvalidObject, Some(7)));
        assert_eq!(fail("[1,]"), (ErrorKind::InvalidArray, Some(3)));
        assert_eq!(fail("[,1]"), (ErrorKind::InvalidArray, Some(1)));
        assert_eq!(fail("[1 2]"), (ErrorKind::InvalidArray, Some(3)));
        assert_eq!(fail("[1,2"), (ErrorKind::UnexpectedTermination, Some(4)));
        assert_eq!(fail("1 2"), (ErrorKind::UnexpectedCharacter, Some(2)));
        assert_eq!(fail("{} x"), (ErrorKind::UnexpectedCharacter, Some(3)));
    }

    #[test]
    fn astral_character_outside_string_is_rejected() {
        assert_eq!(fail("\u{1f600}"), (ErrorKind::UnexpectedCharacter, Some(0)));
    }

    #[test]
    fn png_strings_become_binary() {
        let value = dec(r#"{"img":"iVBORw0KGgo="}"#);
        assert_eq!(
            value.get("img"),
            Some(&Value::Binary(vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]))
        );
        assert_eq!(dec(r#""iVBORw0K""#), Value::from("iVBORw0K"));
    }

    #[test]
    fn objects_keep_order_and_last_duplicate_wins() {
        let value = dec(r#"{"c":1,"a":2,"b":3,"a":4}"#);
        let map = value.as_object().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["c", "a", "b"]);
        assert_eq!(map["a"], Value::Integer(4));
    }

    #[test]
    fn depth_counts_containers() {
        let ok = format!("{}{}", "[".repeat(8), "]".repeat(8));
        assert!(JsonDecoder::new().decode_str(&ok).is_ok());
        let deep = format!("{}{}", "[".repeat(9), "]".repeat(9));
        assert_eq!(fail(&deep), (ErrorKind::DepthLimitExceeded, Some(8)));
        let options = CodecOptions::new().with_max_depth(64);
        assert!(JsonDecoder::with_options(options).decode_str(&deep).is_ok());
    }

    #[test]
    fn decoder_is_reusable() {
        let mut decoder = JsonDecoder::new();
        assert!(decoder.decode_str("[[[[[[[[[").is_err());
        assert_eq!(decoder.decode_str("[1]").unwrap(), Value::Array(vec![Value::Integer(1)]));
    }

    #[test]
    fn reader_input() {
        let mut decoder = JsonDecoder::new();
        let value = decoder.decode_reader(&b"{\"k\": [true]}"[..]).unwrap();
        assert_eq!(value.get("k"), Some(&Value::Array(vec![Value::Bool(true)])));
    }
}
