//! Error types for JSON encoding and decoding.

use std::fmt;
use std::io;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, JsonError>;

/// Discriminant of a [`JsonError`], convenient for matching and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DepthLimitExceeded,
    UnexpectedTermination,
    UnexpectedCharacter,
    InvalidLiteral,
    InvalidNumber,
    InvalidArray,
    InvalidObject,
    InvalidEscape,
    InvalidUnicode,
    UnsupportedValueKind,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::DepthLimitExceeded => "DepthLimitExceeded",
            ErrorKind::UnexpectedTermination => "UnexpectedTermination",
            ErrorKind::UnexpectedCharacter => "UnexpectedCharacter",
            ErrorKind::InvalidLiteral => "InvalidLiteral",
            ErrorKind::InvalidNumber => "InvalidNumber",
            ErrorKind::InvalidArray => "InvalidArray",
            ErrorKind::InvalidObject => "InvalidObject",
            ErrorKind::InvalidEscape => "InvalidEscape",
            ErrorKind::InvalidUnicode => "InvalidUnicode",
            ErrorKind::UnsupportedValueKind => "UnsupportedValueKind",
            ErrorKind::Io => "Io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while encoding or decoding.
///
/// Every codec error carries the byte offset at which it was detected: the
/// position in the input for decoding, the number of bytes already written for
/// encoding. A failed call never yields a partial value.
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    /// Arrays/objects nested deeper than the configured ceiling.
    #[error("DepthLimitExceeded: nesting is deeper than the configured limit (position: {offset})")]
    DepthLimitExceeded { offset: usize },
    /// The input ended in the middle of a token or structure.
    #[error("UnexpectedTermination: input ended before the value was complete (position: {offset})")]
    UnexpectedTermination { offset: usize },
    /// A character that cannot start or follow a value here.
    #[error("UnexpectedCharacter: unexpected character (position: {offset})")]
    UnexpectedCharacter { offset: usize },
    /// `true`, `false` or `null` misspelled or truncated.
    #[error("InvalidLiteral: expected true, false or null (position: {offset})")]
    InvalidLiteral { offset: usize },
    /// A number run that does not parse in its precision class.
    #[error("InvalidNumber: malformed or out of range number (position: {offset})")]
    InvalidNumber { offset: usize },
    /// Expected `,` or `]` inside an array.
    #[error("InvalidArray: expected ',' or ']' (position: {offset})")]
    InvalidArray { offset: usize },
    /// Expected a key, `:`, `,` or `}` inside an object.
    #[error("InvalidObject: expected a quoted key, ':', ',' or '}}' (position: {offset})")]
    InvalidObject { offset: usize },
    /// Backslash followed by a character outside the escape table.
    #[error("InvalidEscape: unknown escape sequence (position: {offset})")]
    InvalidEscape { offset: usize },
    /// Malformed `\u` escape, malformed UTF-8, or an unpaired surrogate.
    #[error("InvalidUnicode: malformed unicode sequence (position: {offset})")]
    InvalidUnicode { offset: usize },
    /// A value the encoder has no JSON representation for.
    #[error("UnsupportedValueKind: {reason} (position: {offset})")]
    UnsupportedValueKind { reason: String, offset: usize },
    /// Reading the input stream or writing the output stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl JsonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::DepthLimitExceeded { .. } => ErrorKind::DepthLimitExceeded,
            JsonError::UnexpectedTermination { .. } => ErrorKind::UnexpectedTermination,
            JsonError::UnexpectedCharacter { .. } => ErrorKind::UnexpectedCharacter,
            JsonError::InvalidLiteral { .. } => ErrorKind::InvalidLiteral,
            JsonError::InvalidNumber { .. } => ErrorKind::InvalidNumber,
            JsonError::InvalidArray { .. } => ErrorKind::InvalidArray,
            JsonError::InvalidObject { .. } => ErrorKind::InvalidObject,
            JsonError::InvalidEscape { .. } => ErrorKind::InvalidEscape,
            JsonError::InvalidUnicode { .. } => ErrorKind::InvalidUnicode,
            JsonError::UnsupportedValueKind { .. } => ErrorKind::UnsupportedValueKind,
            JsonError::Io(_) => ErrorKind::Io,
        }
    }

    /// Byte offset at which the error was detected. `None` for I/O errors.
    pub fn offset(&self) -> Option<usize> {
        match self {
            JsonError::DepthLimitExceeded { offset }
            | JsonError::UnexpectedTermination { offset }
            | JsonError::UnexpectedCharacter { offset }
            | JsonError::InvalidLiteral { offset }
            | JsonError::InvalidNumber { offset }
            | JsonError::InvalidArray { offset }
            | JsonError::InvalidObject { offset }
            | JsonError::InvalidEscape { offset }
            | JsonError::InvalidUnicode { offset }
            | JsonError::UnsupportedValueKind { offset, .. } => Some(*offset),
            JsonError::Io(_) => None,
        }
    }
}
