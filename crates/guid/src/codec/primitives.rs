//! Primitive encoding/decoding for GUID fields.
//!
//! Every numeric GUID field is a fixed byte range holding a signed varint
//! (zigzag, then LEB128) followed by zero padding up to the field width.

// =============================================================================
// DECODING
// =============================================================================

/// Reads an unsigned varint (LEB128) from the start of a field.
///
/// Stops at the first byte without the continuation bit and ignores whatever
/// follows it. Returns `None` if the field ends before a terminating byte or
/// the value would exceed 64 bits.
#[inline]
pub fn read_varint(field: &[u8]) -> Option<u64> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for &byte in field {
        let value = (byte & 0x7F) as u64;

        if shift >= 64 || (shift == 63 && value > 1) {
            return None;
        }

        result |= value << shift;

        if byte & 0x80 == 0 {
            return Some(result);
        }
        shift += 7;
    }

    None
}

/// Reads a signed varint (zigzag encoded) from a field.
///
/// An empty (all-zero) field reads as 0, and so does a field with no
/// terminating byte.
#[inline]
pub fn read_signed_varint(field: &[u8]) -> i64 {
    read_varint(field).map(zigzag_decode).unwrap_or(0)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Writes an unsigned varint (LEB128) into a field, zero-filling the rest.
///
/// Returns the number of bytes used. Groups that do not fit the field are
/// dropped, which leaves the field without a terminator; callers keep values
/// within [`signed_varint_max`] for the field width.
#[inline]
pub fn put_varint(field: &mut [u8], mut value: u64) -> usize {
    field.fill(0);

    let mut len = 0;
    for slot in field.iter_mut() {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        *slot = byte;
        len += 1;
        if value == 0 {
            break;
        }
    }
    len
}

/// Writes a signed varint (zigzag encoded) into a field.
pub fn put_signed_varint(field: &mut [u8], value: i64) -> usize {
    put_varint(field, zigzag_encode(value))
}

/// Largest value whose signed varint fits in `width` bytes.
///
/// The smallest is `-signed_varint_max(width) - 1`.
pub const fn signed_varint_max(width: usize) -> i64 {
    (1i64 << (7 * width - 1)) - 1
}

// =============================================================================
// ZIGZAG ENCODING
// =============================================================================

/// Encodes a signed integer using zigzag encoding.
///
/// Maps negative numbers to odd positive numbers:
/// 0 -> 0, -1 -> 1, 1 -> 2, -2 -> 3, 2 -> 4, ...
#[inline]
pub fn zigzag_encode(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

/// Decodes a zigzag-encoded unsigned integer back to signed.
#[inline]
pub fn zigzag_decode(n: u64) -> i64 {
    ((n >> 1) as i64) ^ (-((n & 1) as i64))
}
