//! Codec configuration.

/// Default maximum nesting depth of arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Default initial size of the encoder's output buffer.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Limits and sizing shared by [`JsonEncoder`](crate::JsonEncoder) and
/// [`JsonDecoder`](crate::JsonDecoder).
///
/// `max_depth` counts containers: with the default of 8, eight nested arrays
/// are accepted and a ninth fails with `DepthLimitExceeded`.
///
/// ```
/// use wirejson::CodecOptions;
///
/// let options = CodecOptions::new().with_max_depth(32);
/// assert_eq!(options.max_depth, 32);
/// assert_eq!(options.initial_buffer_size, 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    pub max_depth: usize,
    pub initial_buffer_size: usize,
}

impl CodecOptions {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            initial_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_initial_buffer_size(mut self, size: usize) -> Self {
        self.initial_buffer_size = size;
        self
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::new()
    }
}
