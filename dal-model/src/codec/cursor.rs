//! Sequential reader mirroring [`BinaryBuffer`](super::BinaryBuffer).
//!
//! The cursor only moves forward. Each read checks that enough bytes remain
//! and reports a shortfall as [`ModelError::CorruptedContent`], so truncated
//! payloads fail cleanly instead of reading out of bounds.

use glam::{Mat4, Vec2, Vec3};

use super::bytes::{assemble_4_bytes_array, make_bool8, make_float32, make_int16, make_int32};
use crate::error::ModelError;

pub struct BufferCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BufferCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.data.len()
    }

    pub(crate) fn corrupted(&self, reason: &'static str) -> ModelError {
        ModelError::CorruptedContent {
            position: self.pos,
            total: self.data.len(),
            reason,
        }
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], ModelError> {
        if size > self.remaining() {
            return Err(self.corrupted("unexpected end of data"));
        }
        let data = self.data;
        let bytes = &data[self.pos..self.pos + size];
        self.pos += size;
        Ok(bytes)
    }

    fn take_array(&mut self, count: usize) -> Result<&'a [u8], ModelError> {
        match count.checked_mul(4) {
            Some(size) => self.take(size),
            None => Err(self.corrupted("array too large")),
        }
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    pub fn read_bool8(&mut self) -> Result<bool, ModelError> {
        Ok(make_bool8(self.take(1)?[0]))
    }

    pub fn read_int16(&mut self) -> Result<i32, ModelError> {
        Ok(make_int16(self.take(2)?))
    }

    pub fn read_int32(&mut self) -> Result<i32, ModelError> {
        Ok(make_int32(self.take(4)?))
    }

    pub fn read_float32(&mut self) -> Result<f32, ModelError> {
        Ok(make_float32(self.take(4)?))
    }

    /// Read an int32 element count for records of `record_size` bytes each.
    ///
    /// Rejects negative counts and counts whose records cannot fit in the
    /// remaining bytes, before anything is allocated for them.
    pub fn read_count(&mut self, record_size: usize) -> Result<usize, ModelError> {
        let raw = self.read_int32()?;
        let count = usize::try_from(raw).map_err(|_| self.corrupted("negative element count"))?;
        match count.checked_mul(record_size) {
            Some(size) if size <= self.remaining() => Ok(count),
            _ => Err(self.corrupted("element count exceeds remaining data")),
        }
    }

    // ========================================================================
    // Arrays and composites
    // ========================================================================

    pub fn read_int32_array(&mut self, count: usize) -> Result<Vec<i32>, ModelError> {
        let bytes = self.take_array(count)?;
        let mut out = vec![0i32; count];
        assemble_4_bytes_array(bytes, &mut out);
        Ok(out)
    }

    pub fn read_float32_array(&mut self, count: usize) -> Result<Vec<f32>, ModelError> {
        let bytes = self.take_array(count)?;
        let mut out = vec![0f32; count];
        assemble_4_bytes_array(bytes, &mut out);
        Ok(out)
    }

    pub fn read_vec2(&mut self) -> Result<Vec2, ModelError> {
        let mut v = [0f32; 2];
        assemble_4_bytes_array(self.take(8)?, &mut v);
        Ok(Vec2::from_array(v))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3, ModelError> {
        let mut v = [0f32; 3];
        assemble_4_bytes_array(self.take(12)?, &mut v);
        Ok(Vec3::from_array(v))
    }

    /// Read a NUL-terminated string starting at the cursor.
    ///
    /// Invalid UTF-8 is replaced lossily.
    pub fn read_str(&mut self) -> Result<String, ModelError> {
        let data = self.data;
        let rest = &data[self.pos..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| self.corrupted("unterminated string"))?;

        let text = match std::str::from_utf8(&rest[..len]) {
            Ok(s) => s.to_owned(),
            Err(_) => {
                tracing::warn!("Non UTF-8 string at byte {}, decoding lossily", self.pos);
                String::from_utf8_lossy(&rest[..len]).into_owned()
            }
        };
        self.pos += len + 1;
        Ok(text)
    }

    /// Read a matrix stored as 16 row-major floats.
    pub fn read_mat4(&mut self) -> Result<Mat4, ModelError> {
        let mut floats = [0f32; 16];
        assemble_4_bytes_array(self.take(64)?, &mut floats);
        Ok(Mat4::from_cols_array(&floats).transpose())
    }
}
