//! Fixed byte layout of a GUID.
//!
//! ```text
//!  prefix  timestamp                 fingerprint   incr          decr          random
//! [b, b], [b, b, b, b, b, b, b, b], [b, b, b, b], [b, b, b, b], [b, b, b, b], [b, b, b, b]
//! ```
//!
//! Each field's text width equals its byte width, so the ranges below index
//! both the binary form and the 26-character text form.

use std::ops::Range;

/// Size of a GUID in bytes, and of its text form in characters.
pub const BYTE_SIZE: usize = 26;

/// Width of each 32-bit field.
pub const FIELD_SIZE: usize = 4;

pub const PREFIX: Range<usize> = 0..2;
pub const TIMESTAMP: Range<usize> = PREFIX.end..PREFIX.end + 2 * FIELD_SIZE;
pub const FINGERPRINT: Range<usize> = TIMESTAMP.end..TIMESTAMP.end + FIELD_SIZE;
pub const INCREMENT: Range<usize> = FINGERPRINT.end..FINGERPRINT.end + FIELD_SIZE;
pub const DECREMENT: Range<usize> = INCREMENT.end..INCREMENT.end + FIELD_SIZE;
pub const RANDOM: Range<usize> = DECREMENT.end..DECREMENT.end + FIELD_SIZE;

/// Exclusive upper bound of the 32-bit fields: `36^4`, the first value that
/// needs five base36 characters.
pub const MAX_FIELD_VALUE: i64 = 1_679_616;

/// Length of a slug.
pub const SLUG_SIZE: usize = 12;

/// Text positions kept by a slug: the low half of the timestamp, the low two
/// characters of each counter, and the whole random field.
pub const SLUG_POSITIONS: [usize; SLUG_SIZE] = slug_positions();

const fn slug_positions() -> [usize; SLUG_SIZE] {
    let mut out = [0; SLUG_SIZE];
    let mut n = 0;

    let mut i = TIMESTAMP.end - FIELD_SIZE;
    while i < TIMESTAMP.end {
        out[n] = i;
        n += 1;
        i += 1;
    }
    i = INCREMENT.end - 2;
    while i < INCREMENT.end {
        out[n] = i;
        n += 1;
        i += 1;
    }
    i = DECREMENT.end - 2;
    while i < DECREMENT.end {
        out[n] = i;
        n += 1;
        i += 1;
    }
    i = RANDOM.start;
    while i < RANDOM.end {
        out[n] = i;
        n += 1;
        i += 1;
    }
    out
}

const fn same_positions(a: &[usize; SLUG_SIZE], b: &[usize; SLUG_SIZE]) -> bool {
    let mut i = 0;
    while i < SLUG_SIZE {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

// Slugs already in circulation use these offsets. A layout change must not
// move them silently.
const _: () = assert!(same_positions(
    &SLUG_POSITIONS,
    &[6, 7, 8, 9, 16, 17, 20, 21, 22, 23, 24, 25]
));
const _: () = assert!(RANDOM.end == BYTE_SIZE);

/// Reduces a field value into `[0, MAX_FIELD_VALUE)`.
#[inline]
pub fn filter(value: i64) -> i64 {
    value.rem_euclid(MAX_FIELD_VALUE)
}
