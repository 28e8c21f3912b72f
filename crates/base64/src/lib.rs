//! Base64 encoding and decoding with constant lookup tables.
//!
//! This crate provides:
//! - Standard base64 encoding with padding, into a `String` or directly into
//!   a caller-owned byte buffer
//! - Strict decoding of standalone base64 text
//! - Lenient decoding of base64 runs embedded in JSON strings, tolerant of
//!   escape sequences
//!
//! # Example
//!
//! ```
//! use wirejson_base64::{to_base64, from_base64};
//!
//! let data = b"hello world";
//! let encoded = to_base64(data);
//! let decoded = from_base64(&encoded).unwrap();
//! assert_eq!(decoded.as_slice(), data);
//! ```

mod constants;
mod from_base64;
mod from_base64_bin;
mod to_base64;

pub use constants::{ALPHABET, ALPHABET_BYTES, DECODE_TABLE, INVALID, PAD};
pub use from_base64::from_base64;
pub use from_base64_bin::from_base64_bin;
pub use to_base64::{encoded_len, to_base64, to_base64_bin};

/// Error type for base64 operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base64Error {
    /// The input contains a byte outside the base64 alphabet.
    #[error("INVALID_BASE64_SEQ")]
    InvalidBase64Sequence,
    /// The input leaves a single dangling character after the last full block.
    #[error("Base64 string length must not leave a single dangling character")]
    InvalidLength,
}
