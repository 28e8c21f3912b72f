//! UTF-16 / UTF-8 transcoding for the JSON string paths.
//!
//! Strings are handled as UTF-16 code unit streams on the way in and out, so
//! hosts that hand over raw UTF-16 (including unpaired surrogates) are served
//! by the same path as `&str`.

use wirejson_buffers::Writer;

/// Uppercase hex digits used for `\uXXXX` escapes.
pub const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Maps an ASCII hex digit to its value; every other byte maps to `0xFF`.
pub const HEX_VALUES: [u8; 256] = {
    let mut table = [0xFFu8; 256];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    let mut i = 0;
    while i < 6 {
        table[b'a' as usize + i] = 10 + i as u8;
        table[b'A' as usize + i] = 10 + i as u8;
        i += 1;
    }
    table
};

/// One decoded scalar as UTF-16: a single unit or a surrogate pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf16Char {
    Single(u16),
    Pair(u16, u16),
}

/// Reason a UTF-8 sequence could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Fault {
    /// The sequence runs past the end of the readable region.
    Truncated,
    /// Bad lead byte, bad continuation byte, an overlong form, an encoded
    /// surrogate, or a scalar above U+10FFFF.
    Malformed,
}

/// Joins a surrogate pair into a code point.
#[inline]
pub const fn combine_surrogates(high: u16, low: u16) -> u32 {
    ((high as u32) << 10) + low as u32 - 0x35F_DC00
}

/// Splits a supplementary code point (U+10000 and above) into a surrogate pair.
#[inline]
pub const fn split_code_point(w: u32) -> (u16, u16) {
    (((w >> 10) + 0xD7C0) as u16, ((w & 0x3FF) + 0xDC00) as u16)
}

/// Decodes the UTF-8 sequence starting at `data[at]`, reading no further than
/// `end`. Returns the UTF-16 form and the number of bytes consumed.
pub fn read_utf8(data: &[u8], at: usize, end: usize) -> Result<(Utf16Char, usize), Utf8Fault> {
    let c = u32::from(data[at]);
    if c < 0x80 {
        return Ok((Utf16Char::Single(c as u16), 1));
    }
    let len = match c {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(Utf8Fault::Malformed),
    };
    if at + len > end {
        return Err(Utf8Fault::Truncated);
    }
    let tail = &data[at + 1..at + len];
    if tail.iter().any(|&b| b & 0xC0 != 0x80) {
        return Err(Utf8Fault::Malformed);
    }
    // Overlong forms, UTF-8 encoded surrogates and scalars above U+10FFFF.
    let second_ok = match c {
        0xE0 => tail[0] >= 0xA0,
        0xED => tail[0] <= 0x9F,
        0xF0 => tail[0] >= 0x90,
        0xF4 => tail[0] <= 0x8F,
        _ => true,
    };
    if !second_ok {
        return Err(Utf8Fault::Malformed);
    }
    let b = |i: usize| u32::from(tail[i]);
    let decoded = match len {
        2 => Utf16Char::Single(((c << 6) + b(0) - 0x3080) as u16),
        3 => Utf16Char::Single(((c << 12) + (b(0) << 6) + b(1) - 0xE_2080) as u16),
        _ => {
            let w = (c << 18) + (b(0) << 12) + (b(1) << 6) + b(2) - 0x3C8_2080;
            if !(0x1_0000..=0x10_FFFF).contains(&w) {
                return Err(Utf8Fault::Malformed);
            }
            let (high, low) = split_code_point(w);
            Utf16Char::Pair(high, low)
        }
    };
    Ok((decoded, len))
}

/// Writes `\u` followed by four uppercase hex digits.
#[inline]
pub fn write_unicode_escape(writer: &mut Writer, unit: u16) {
    writer.ensure_capacity(6);
    let x = writer.x;
    let buf = &mut writer.uint8;
    buf[x] = b'\\';
    buf[x + 1] = b'u';
    buf[x + 2] = HEX_DIGITS[(unit >> 12) as usize & 0xF];
    buf[x + 3] = HEX_DIGITS[(unit >> 8) as usize & 0xF];
    buf[x + 4] = HEX_DIGITS[(unit >> 4) as usize & 0xF];
    buf[x + 5] = HEX_DIGITS[unit as usize & 0xF];
    writer.x = x + 6;
}

#[inline]
fn write_ascii(writer: &mut Writer, c: u8) {
    match c {
        0x08 => writer.u8u8(b'\\', b'b'),
        0x09 => writer.u8u8(b'\\', b't'),
        0x0A => writer.u8u8(b'\\', b'n'),
        0x0C => writer.u8u8(b'\\', b'f'),
        0x0D => writer.u8u8(b'\\', b'r'),
        b'"' => writer.u8u8(b'\\', b'"'),
        b'\\' => writer.u8u8(b'\\', b'\\'),
        0x00..=0x1F => write_unicode_escape(writer, u16::from(c)),
        _ => writer.u8(c),
    }
}

/// Writes a UTF-16 unit stream as JSON-escaped UTF-8 string content
/// (without the surrounding quotes).
///
/// Paired surrogates become one 4-byte sequence. Unpaired surrogates are
/// written as `\uXXXX` escapes so the output stays valid UTF-8.
pub fn write_utf16<I>(writer: &mut Writer, units: I)
where
    I: IntoIterator<Item = u16>,
{
    let mut units = units.into_iter().peekable();
    writer.ensure_capacity(units.size_hint().0);
    while let Some(c) = units.next() {
        match c {
            0x0000..=0x007F => write_ascii(writer, c as u8),
            0x0080..=0x07FF => writer.u8u8(0xC0 | (c >> 6) as u8, 0x80 | (c & 0x3F) as u8),
            0xD800..=0xDBFF => match units.peek() {
                Some(&low @ 0xDC00..=0xDFFF) => {
                    units.next();
                    let w = combine_surrogates(c, low);
                    writer.ensure_capacity(4);
                    let x = writer.x;
                    writer.uint8[x] = 0xF0 | (w >> 18) as u8;
                    writer.uint8[x + 1] = 0x80 | ((w >> 12) & 0x3F) as u8;
                    writer.uint8[x + 2] = 0x80 | ((w >> 6) & 0x3F) as u8;
                    writer.uint8[x + 3] = 0x80 | (w & 0x3F) as u8;
                    writer.x = x + 4;
                }
                _ => write_unicode_escape(writer, c),
            },
            0xDC00..=0xDFFF => write_unicode_escape(writer, c),
            _ => {
                writer.ensure_capacity(3);
                let x = writer.x;
                writer.uint8[x] = 0xE0 | (c >> 12) as u8;
                writer.uint8[x + 1] = 0x80 | ((c >> 6) & 0x3F) as u8;
                writer.uint8[x + 2] = 0x80 | (c & 0x3F) as u8;
                writer.x = x + 3;
            }
        }
    }
}

/// Writes `s` as JSON string content. Printable ASCII without quotes or
/// backslashes is copied straight through.
pub fn write_str(writer: &mut Writer, s: &str) {
    let plain = s
        .bytes()
        .all(|b| (0x20..0x80).contains(&b) && b != b'"' && b != b'\\');
    if plain {
        writer.utf8(s);
    } else {
        write_utf16(writer, s.encode_utf16());
    }
}
