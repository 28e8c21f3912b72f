//! Standard base64 encoding.

use crate::constants::{ALPHABET_BYTES, PAD};

/// Number of base64 characters produced for `length` input bytes (padded).
pub const fn encoded_len(length: usize) -> usize {
    length.div_ceil(3) * 4
}

/// Encodes `length` bytes of `uint8` starting at `start` into `dest` at
/// `offset`, with `=` padding.
///
/// `dest` must have room for [`encoded_len`]`(length)` bytes after `offset`.
///
/// # Returns
///
/// The offset in `dest` just past the last written character.
///
/// # Example
///
/// ```
/// use wirejson_base64::to_base64_bin;
///
/// let data = b"hello";
/// let mut dest = vec![0u8; 8];
/// let end = to_base64_bin(data, 0, data.len(), &mut dest, 0);
/// assert_eq!(&dest[..end], b"aGVsbG8=");
/// ```
pub fn to_base64_bin(
    uint8: &[u8],
    start: usize,
    length: usize,
    dest: &mut [u8],
    mut offset: usize,
) -> usize {
    let src = &uint8[start..start + length];
    let mut blocks = src.chunks_exact(3);

    for block in &mut blocks {
        let (o1, o2, o3) = (block[0], block[1], block[2]);
        dest[offset] = ALPHABET_BYTES[(o1 >> 2) as usize];
        dest[offset + 1] = ALPHABET_BYTES[(((o1 & 0x03) << 4) | (o2 >> 4)) as usize];
        dest[offset + 2] = ALPHABET_BYTES[(((o2 & 0x0f) << 2) | (o3 >> 6)) as usize];
        dest[offset + 3] = ALPHABET_BYTES[(o3 & 0x3f) as usize];
        offset += 4;
    }

    match *blocks.remainder() {
        [o1] => {
            dest[offset] = ALPHABET_BYTES[(o1 >> 2) as usize];
            dest[offset + 1] = ALPHABET_BYTES[((o1 & 0x03) << 4) as usize];
            dest[offset + 2] = PAD;
            dest[offset + 3] = PAD;
            offset += 4;
        }
        [o1, o2] => {
            dest[offset] = ALPHABET_BYTES[(o1 >> 2) as usize];
            dest[offset + 1] = ALPHABET_BYTES[(((o1 & 0x03) << 4) | (o2 >> 4)) as usize];
            dest[offset + 2] = ALPHABET_BYTES[((o2 & 0x0f) << 2) as usize];
            dest[offset + 3] = PAD;
            offset += 4;
        }
        _ => {}
    }

    offset
}

/// Encodes a byte slice to a standard base64 string.
///
/// # Example
///
/// ```
/// use wirejson_base64::to_base64;
///
/// let encoded = to_base64(b"hello world");
/// assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
/// ```
pub fn to_base64(uint8: &[u8]) -> String {
    let mut dest = vec![0u8; encoded_len(uint8.len())];
    let end = to_base64_bin(uint8, 0, uint8.len(), &mut dest, 0);
    dest.truncate(end);
    // The alphabet and padding are ASCII.
    dest.into_iter().map(char::from).collect()
}
