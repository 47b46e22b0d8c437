//! Error types for the DAL model codec and modifiers.
//!
//! Every variant is terminal for the operation that raised it: a failed parse
//! never yields a partial [`Model`](crate::Model) and a failed export never
//! yields a partial byte buffer. Corruption is never transient, so nothing in
//! this crate retries.

use std::fmt;

/// Underlying cause of a failed decompression.
///
/// Mirrors the three failure classes a zlib `uncompress` call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressFailure {
    /// The stream did not fit in the declared uncompressed size.
    Buffer,
    /// The output buffer for the declared size could not be allocated.
    Memory,
    /// The compressed stream is malformed or ends early.
    Data,
}

impl fmt::Display for DecompressFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Buffer => "buffer is not large enough",
            Self::Memory => "insufficient memory",
            Self::Data => "corrupted data",
        };
        f.write_str(text)
    }
}

/// Errors raised while framing, parsing or exporting a model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    /// The container does not start with the `dalmdl` tag.
    #[error("magic number mismatch")]
    MagicMismatch,

    /// The DEFLATE payload could not be inflated.
    #[error("decompression failed: {cause}")]
    DecompressionFailed { cause: DecompressFailure },

    /// The decompressed payload is shorter or longer than its structure.
    #[error("corrupted content at byte {position} of {total}: {reason}")]
    CorruptedContent {
        position: usize,
        total: usize,
        reason: &'static str,
    },

    /// The compressor reported a non-OK status.
    #[error("compression failed: {0}")]
    CompressionError(String),
}

impl ModelError {
    pub(crate) fn decompress(cause: DecompressFailure) -> Self {
        Self::DecompressionFailed { cause }
    }
}

/// Errors raised by the model modifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModifierError {
    /// A joint refers to a parent that does not appear before it.
    #[error("joint {joint} refers to parent {parent}, which does not precede it")]
    JointOrder { joint: usize, parent: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompression_message_keeps_cause() {
        let err = ModelError::decompress(DecompressFailure::Data);
        assert_eq!(err.to_string(), "decompression failed: corrupted data");
    }

    #[test]
    fn test_corrupted_content_message() {
        let err = ModelError::CorruptedContent {
            position: 10,
            total: 12,
            reason: "trailing bytes",
        };
        assert_eq!(
            err.to_string(),
            "corrupted content at byte 10 of 12: trailing bytes"
        );
    }
}
