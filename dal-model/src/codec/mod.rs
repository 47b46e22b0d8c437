//! Byte-level codec shared by the parser and exporter.
//!
//! - [`bytes`] - scalar encode/decode with host endianness correction
//! - [`BinaryBuffer`] - append-only builder used by the exporter
//! - [`BufferCursor`] - forward-only reader used by the parser

pub mod bytes;
mod buffer;
mod cursor;

pub use buffer::BinaryBuffer;
pub use cursor::BufferCursor;
