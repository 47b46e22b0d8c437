//! Append-only binary buffer used by the exporter.
//!
//! The order of `append_*` calls is the wire format. Every call here has a
//! matching read on [`BufferCursor`](super::BufferCursor); keep the two in
//! step.

use std::ops::AddAssign;

use glam::{Mat4, Vec2, Vec3};

use super::bytes::{to_bool8, to_float32, to_int16, to_int32};

/// Growable byte buffer with typed append operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryBuffer {
    data: Vec<u8>,
}

impl BinaryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    // ========================================================================
    // Scalars
    // ========================================================================

    pub fn append_bool8(&mut self, value: bool) {
        self.data.push(to_bool8(value));
    }

    /// Append the low 16 bits of `value`.
    pub fn append_int16(&mut self, value: i32) {
        self.data.extend_from_slice(&to_int16(value));
    }

    pub fn append_int32(&mut self, value: i32) {
        self.data.extend_from_slice(&to_int32(value));
    }

    pub fn append_float32(&mut self, value: f32) {
        self.data.extend_from_slice(&to_float32(value));
    }

    /// Append a collection length as an int32 count.
    ///
    /// Panics if `len` does not fit the wire's signed 32-bit count.
    pub fn append_count(&mut self, len: usize) {
        let count = i32::try_from(len).expect("collection too large for an int32 count");
        self.append_int32(count);
    }

    // ========================================================================
    // Arrays and composites
    // ========================================================================

    pub fn append_int32_array(&mut self, values: &[i32]) {
        self.data.reserve(values.len() * 4);
        for &v in values {
            self.append_int32(v);
        }
    }

    pub fn append_float32_array(&mut self, values: &[f32]) {
        self.data.reserve(values.len() * 4);
        for &v in values {
            self.append_float32(v);
        }
    }

    pub fn append_vec2(&mut self, v: Vec2) {
        self.append_float32_array(&v.to_array());
    }

    pub fn append_vec3(&mut self, v: Vec3) {
        self.append_float32_array(&v.to_array());
    }

    /// Append the raw bytes of `s` followed by a single NUL terminator.
    pub fn append_str(&mut self, s: &str) {
        debug_assert!(!s.contains('\0'), "wire strings cannot hold NUL: {s:?}");
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(0);
    }

    /// Append a matrix as 16 floats in row-major order.
    ///
    /// `Mat4` is column-major in memory, so this writes its transpose.
    pub fn append_mat4(&mut self, m: &Mat4) {
        self.append_float32_array(&m.transpose().to_cols_array());
    }

    /// Append already-encoded bytes verbatim.
    pub fn append_raw_array(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }
}

impl AddAssign<&BinaryBuffer> for BinaryBuffer {
    fn add_assign(&mut self, rhs: &BinaryBuffer) {
        self.append_raw_array(&rhs.data);
    }
}

impl AddAssign<BinaryBuffer> for BinaryBuffer {
    fn add_assign(&mut self, rhs: BinaryBuffer) {
        if self.data.is_empty() {
            self.data = rhs.data;
        } else {
            self.append_raw_array(&rhs.data);
        }
    }
}

impl From<Vec<u8>> for BinaryBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<BinaryBuffer> for Vec<u8> {
    fn from(buffer: BinaryBuffer) -> Self {
        buffer.data
    }
}
