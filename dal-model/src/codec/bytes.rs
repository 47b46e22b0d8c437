//! Primitive encode/decode for the wire scalars.
//!
//! The wire is little-endian. On a big-endian host every value is byte-reversed
//! on both encode and decode, so the in-memory value is always native.
//!
//! These functions never fail. Callers guarantee the input is long enough;
//! [`BufferCursor`](super::BufferCursor) performs that bounds check before
//! delegating here.

use bytemuck::Pod;

/// Whether the host stores multi-byte values most significant byte first.
#[inline]
pub const fn is_big_endian() -> bool {
    cfg!(target_endian = "big")
}

// ============================================================================
// Decoding
// ============================================================================

/// Reinterpret four wire bytes as a 4-byte POD value (`i32`, `u32` or `f32`).
///
/// Panics if `src` holds fewer than four bytes.
#[inline]
pub fn assemble_4_bytes<T: Pod>(src: &[u8]) -> T {
    let mut buf = [src[0], src[1], src[2], src[3]];
    if is_big_endian() {
        buf.reverse();
    }
    bytemuck::cast(buf)
}

/// Decode `dst.len()` consecutive 4-byte values and return the unread tail.
///
/// Every structured array in the format is read through this function.
pub fn assemble_4_bytes_array<'a, T: Pod>(mut src: &'a [u8], dst: &mut [T]) -> &'a [u8] {
    for value in dst.iter_mut() {
        *value = assemble_4_bytes(src);
        src = &src[4..];
    }
    src
}

#[inline]
pub fn make_bool8(byte: u8) -> bool {
    byte != 0
}

/// Decode a 2-byte integer into a 32-bit value.
///
/// The upper 16 bits are always zero: the sign is not extended.
#[inline]
pub fn make_int16(src: &[u8]) -> i32 {
    i32::from(u16::from_le_bytes([src[0], src[1]]))
}

#[inline]
pub fn make_int32(src: &[u8]) -> i32 {
    assemble_4_bytes(src)
}

#[inline]
pub fn make_float32(src: &[u8]) -> f32 {
    assemble_4_bytes(src)
}

// ============================================================================
// Encoding
// ============================================================================

/// Inverse of [`assemble_4_bytes`].
#[inline]
pub fn disassemble_4_bytes<T: Pod>(value: T) -> [u8; 4] {
    let mut buf: [u8; 4] = bytemuck::cast(value);
    if is_big_endian() {
        buf.reverse();
    }
    buf
}

#[inline]
pub fn to_bool8(value: bool) -> u8 {
    u8::from(value)
}

/// Encode the low 16 bits of `value`.
#[inline]
pub fn to_int16(value: i32) -> [u8; 2] {
    let [b0, b1, _, _] = to_int32(value);
    [b0, b1]
}

#[inline]
pub fn to_int32(value: i32) -> [u8; 4] {
    disassemble_4_bytes(value)
}

#[inline]
pub fn to_float32(value: f32) -> [u8; 4] {
    disassemble_4_bytes(value)
}
