//! Container framing around the DEFLATE payload.
//!
//! # Layout
//! ```text
//! 0x00: magic "dalmdl" (6 bytes)
//! 0x06: uncompressed_size i32 (wire-endian)
//! 0x0A: zlib stream (DEFLATE with zlib header and checksum)
//! ```

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::codec::bytes::{make_int32, to_int32};
use crate::error::{DecompressFailure, ModelError};

/// Tag identifying a DAL model container
pub const MAGIC: &[u8; 6] = b"dalmdl";

/// Size of the magic tag plus the uncompressed size field
pub const HEADER_SIZE: usize = MAGIC.len() + 4;

/// DEFLATE effort used when writing a container (0 = store, 9 = smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionLevel(u32);

impl CompressionLevel {
    pub const FASTEST: Self = Self(1);
    pub const BEST: Self = Self(9);

    /// Create a level, clamping to the 0..=9 range zlib accepts.
    pub fn new(level: u32) -> Self {
        Self(level.min(9))
    }

    pub fn level(self) -> u32 {
        self.0
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(6)
    }
}

/// Worst-case zlib output size for `len` input bytes (zlib's `compressBound`).
fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// Frame `raw` into a container using the default compression level.
pub fn zip(raw: &[u8]) -> Result<Vec<u8>, ModelError> {
    zip_with_level(raw, CompressionLevel::default())
}

/// Frame `raw` into a container: magic, uncompressed size, zlib stream.
pub fn zip_with_level(raw: &[u8], level: CompressionLevel) -> Result<Vec<u8>, ModelError> {
    let declared = i32::try_from(raw.len())
        .map_err(|_| ModelError::CompressionError("payload exceeds 2 GiB".into()))?;

    let mut output = Vec::with_capacity(HEADER_SIZE + compress_bound(raw.len()));
    output.extend_from_slice(MAGIC);
    output.extend_from_slice(&to_int32(declared));

    let mut compressor = Compress::new(Compression::new(level.level()), true);
    match compressor.compress_vec(raw, &mut output, FlushCompress::Finish) {
        Ok(Status::StreamEnd) => {}
        Ok(status) => {
            return Err(ModelError::CompressionError(format!(
                "compressor stopped early ({status:?})"
            )));
        }
        Err(e) => return Err(ModelError::CompressionError(e.to_string())),
    }

    tracing::debug!(
        "Compressed {} bytes to {} (level {})",
        raw.len(),
        output.len() - HEADER_SIZE,
        level.level()
    );
    Ok(output)
}

/// Verify the container header and inflate exactly the declared size.
pub fn unzip(framed: &[u8]) -> Result<Vec<u8>, ModelError> {
    if framed.len() < MAGIC.len() || &framed[..MAGIC.len()] != MAGIC {
        return Err(ModelError::MagicMismatch);
    }
    if framed.len() < HEADER_SIZE {
        return Err(ModelError::decompress(DecompressFailure::Data));
    }

    let declared = make_int32(&framed[MAGIC.len()..HEADER_SIZE]);
    let declared =
        usize::try_from(declared).map_err(|_| ModelError::decompress(DecompressFailure::Data))?;

    let mut output = Vec::new();
    output
        .try_reserve_exact(declared)
        .map_err(|_| ModelError::decompress(DecompressFailure::Memory))?;

    let mut decompressor = Decompress::new(true);
    let status = decompressor
        .decompress_vec(&framed[HEADER_SIZE..], &mut output, FlushDecompress::Finish)
        .map_err(|e| {
            tracing::debug!("Inflate failed: {}", e);
            ModelError::decompress(DecompressFailure::Data)
        })?;

    match status {
        Status::StreamEnd if output.len() == declared => Ok(output),
        Status::StreamEnd => {
            tracing::debug!(
                "Inflated {} bytes but header declares {}",
                output.len(),
                declared
            );
            Err(ModelError::decompress(DecompressFailure::Data))
        }
        // Output is full yet the stream continues.
        _ if output.len() == declared => Err(ModelError::decompress(DecompressFailure::Buffer)),
        _ => Err(ModelError::decompress(DecompressFailure::Data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> Vec<u8> {
        (0..2048u32).map(|i| (i % 17) as u8).collect()
    }

    #[test]
    fn test_zip_header_layout() {
        let raw = sample_payload();
        let framed = zip(&raw).unwrap();
        assert_eq!(&framed[..6], b"dalmdl");
        assert_eq!(make_int32(&framed[6..10]), raw.len() as i32);
        assert!(framed.len() < raw.len());
    }

    #[test]
    fn test_zip_unzip_roundtrip_all_levels() {
        let raw = sample_payload();
        for level in 0..=9 {
            let framed = zip_with_level(&raw, CompressionLevel::new(level)).unwrap();
            assert_eq!(unzip(&framed).unwrap(), raw);
        }
    }

    #[test]
    fn test_incompressible_payload_fits() {
        // A pseudo-random payload exercises the compress bound.
        let mut state = 0x1234_5678u32;
        let raw: Vec<u8> = (0..4096)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect();
        let framed = zip_with_level(&raw, CompressionLevel::BEST).unwrap();
        assert_eq!(unzip(&framed).unwrap(), raw);
    }

    #[test]
    fn test_bad_magic() {
        let mut framed = zip(&sample_payload()).unwrap();
        framed[0] ^= 0x01;
        assert_eq!(unzip(&framed), Err(ModelError::MagicMismatch));
        assert_eq!(unzip(b"dal"), Err(ModelError::MagicMismatch));
        assert_eq!(unzip(&[]), Err(ModelError::MagicMismatch));
    }

    #[test]
    fn test_declared_size_too_small_is_buffer_error() {
        let raw = sample_payload();
        let mut framed = zip(&raw).unwrap();
        framed[6..10].copy_from_slice(&to_int32(raw.len() as i32 - 1));
        assert_eq!(
            unzip(&framed),
            Err(ModelError::decompress(DecompressFailure::Buffer))
        );
    }

    #[test]
    fn test_declared_size_too_large_is_data_error() {
        let raw = sample_payload();
        let mut framed = zip(&raw).unwrap();
        framed[6..10].copy_from_slice(&to_int32(raw.len() as i32 + 1));
        assert_eq!(
            unzip(&framed),
            Err(ModelError::decompress(DecompressFailure::Data))
        );
    }

    #[test]
    fn test_negative_declared_size() {
        let mut framed = zip(&sample_payload()).unwrap();
        framed[6..10].copy_from_slice(&to_int32(-5));
        assert!(matches!(
            unzip(&framed),
            Err(ModelError::DecompressionFailed { .. })
        ));
    }

    #[test]
    fn test_garbage_stream_is_data_error() {
        let mut framed = MAGIC.to_vec();
        framed.extend_from_slice(&to_int32(16));
        framed.extend_from_slice(&[0xFF; 16]);
        assert_eq!(
            unzip(&framed),
            Err(ModelError::decompress(DecompressFailure::Data))
        );
    }

    #[test]
    fn test_truncated_stream() {
        let framed = zip(&sample_payload()).unwrap();
        let cut = &framed[..framed.len() - 8];
        assert!(matches!(
            unzip(cut),
            Err(ModelError::DecompressionFailed { .. })
        ));
    }

    #[test]
    fn test_level_clamps() {
        assert_eq!(CompressionLevel::new(42).level(), 9);
        assert_eq!(CompressionLevel::default().level(), 6);
    }
}
