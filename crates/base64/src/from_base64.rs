//! Strict base64 decoding.

use crate::constants::{DECODE_TABLE, INVALID, PAD};
use crate::Base64Error;

/// Decodes a standard base64 string.
///
/// Trailing padding is optional. Any byte outside the alphabet is rejected.
///
/// # Errors
///
/// - [`Base64Error::InvalidLength`] when the unpadded length leaves a single
///   dangling character.
/// - [`Base64Error::InvalidBase64Sequence`] on a non-alphabet character.
///
/// # Example
///
/// ```
/// use wirejson_base64::from_base64;
///
/// assert_eq!(from_base64("aGVsbG8=").unwrap(), b"hello");
/// assert_eq!(from_base64("aGVsbG8").unwrap(), b"hello");
/// ```
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    let mut bytes = encoded.as_bytes();
    while let [rest @ .., PAD] = bytes {
        bytes = rest;
    }
    if bytes.len() % 4 == 1 {
        return Err(Base64Error::InvalidLength);
    }

    let mut out = Vec::with_capacity(bytes.len() / 4 * 3 + 2);
    for chunk in bytes.chunks(4) {
        let mut acc: u32 = 0;
        for &octet in chunk {
            let sextet = DECODE_TABLE[octet as usize];
            if sextet == INVALID {
                return Err(Base64Error::InvalidBase64Sequence);
            }
            acc = (acc << 6) | sextet as u32;
        }
        match chunk.len() {
            4 => out.extend_from_slice(&[(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]),
            3 => out.extend_from_slice(&[(acc >> 10) as u8, (acc >> 2) as u8]),
            2 => out.push((acc >> 4) as u8),
            _ => {}
        }
    }
    Ok(out)
}
