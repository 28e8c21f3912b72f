//! Byte buffer primitives for the wirejson encoder.

mod writer;

pub use writer::{Writer, DEFAULT_ALLOC_SIZE};
