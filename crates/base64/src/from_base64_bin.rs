//! Lenient base64 decoding of a run of bytes inside a JSON string.

use crate::constants::{DECODE_TABLE, INVALID, PAD};

/// Decodes base64 characters found in `view[offset..offset + length]`.
///
/// The run is expected to be the body of a quoted JSON string, so it may
/// contain escape sequences. Decoding never fails:
///
/// - `\/` and `\uXXXX` escapes of alphabet characters contribute the escaped
///   character; any other escape is skipped.
/// - The first `=` ends the data.
/// - Bytes outside the alphabet are skipped.
/// - A dangling single character at the end carries no full byte and is
///   dropped.
///
/// # Example
///
/// ```
/// use wirejson_base64::from_base64_bin;
///
/// assert_eq!(from_base64_bin(b"xxxxaGVsbG8=", 4, 8), b"hello");
/// assert_eq!(from_base64_bin(b"\\/\\/8=", 0, 6), [0xff, 0xff]);
/// ```
pub fn from_base64_bin(view: &[u8], offset: usize, length: usize) -> Vec<u8> {
    let end = (offset + length).min(view.len());
    let mut out = Vec::with_capacity(length / 4 * 3 + 3);
    let mut acc: u32 = 0;
    let mut count = 0;
    let mut i = offset;

    while i < end {
        let mut octet = view[i];
        i += 1;
        if octet == b'\\' {
            match view[i..end].first() {
                Some(b'u') => {
                    let code = view.get(i + 1..i + 5).and_then(hex4);
                    i = (i + 5).min(end);
                    match code {
                        Some(code) if code < 0x80 => octet = code as u8,
                        _ => continue,
                    }
                }
                Some(b'/') => {
                    i += 1;
                    octet = b'/';
                }
                Some(_) => {
                    i += 1;
                    continue;
                }
                None => break,
            }
        }
        if octet == PAD {
            break;
        }
        let sextet = DECODE_TABLE[octet as usize];
        if sextet == INVALID {
            continue;
        }
        acc = (acc << 6) | sextet as u32;
        count += 1;
        if count == 4 {
            out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]);
            acc = 0;
            count = 0;
        }
    }

    match count {
        2 => out.push((acc >> 4) as u8),
        3 => out.extend_from_slice(&[(acc >> 10) as u8, (acc >> 2) as u8]),
        _ => {}
    }
    out
}

fn hex4(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = (d as char).to_digit(16)?;
        Some((acc << 4) | v)
    })
}
