//! Growable byte buffer writer.

/// Default initial size of a [`Writer`] buffer.
pub const DEFAULT_ALLOC_SIZE: usize = 1024;

/// A byte buffer writer that grows automatically as needed.
///
/// The buffer starts at a fixed size. When a write would overflow it, the
/// buffer is reallocated to a whole multiple of its current size that fits the
/// pending write, so the size at least doubles on every growth step.
///
/// # Example
///
/// ```
/// use wirejson_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(b'[');
/// writer.ascii("1,2");
/// writer.u8(b']');
/// assert_eq!(writer.flush(), b"[1,2]");
/// ```
pub struct Writer {
    /// Backing storage; bytes past `x` are scratch.
    pub uint8: Vec<u8>,
    /// Start of the pending output.
    pub x0: usize,
    /// Write cursor.
    pub x: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (1 KiB).
    pub fn new() -> Self {
        Self::with_alloc_size(DEFAULT_ALLOC_SIZE)
    }

    /// Creates a new writer with a custom initial allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size.max(1)],
            x0: 0,
            x: 0,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Current size of the underlying allocation.
    pub fn capacity(&self) -> usize {
        self.uint8.len()
    }

    /// Ensures the buffer has at least `capacity` bytes available after the cursor.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let required = self.x + capacity;
        if required > self.uint8.len() {
            self.grow(required);
        }
    }

    fn grow(&mut self, required: usize) {
        let size = self.uint8.len();
        let new_size = size * (1 + required / size);
        self.uint8.resize(new_size, 0);
    }

    /// Drops everything written so far and rewinds the cursor.
    pub fn reset(&mut self) {
        self.x = 0;
        self.x0 = 0;
    }

    /// Copies out the pending output and marks it as taken.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    /// Returns a view of the data written since the last flush.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8[self.x0..self.x]
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.ensure_capacity(1);
        self.uint8[self.x] = val;
        self.x += 1;
    }

    /// Two-byte escape or sequence in one capacity check.
    #[inline]
    pub fn u8u8(&mut self, a: u8, b: u8) {
        self.ensure_capacity(2);
        self.uint8[self.x] = a;
        self.uint8[self.x + 1] = b;
        self.x += 2;
    }

    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Copies the UTF-8 bytes of `s`; returns their count.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }

    pub fn ascii(&mut self, s: &str) {
        self.utf8(s);
    }
}
