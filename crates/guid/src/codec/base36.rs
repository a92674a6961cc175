//! Base36 text encoding for GUID fields.
//!
//! Formatting follows native signed radix formatting (`-` then the digits of
//! the magnitude, lowercase), and padding is applied to the whole string.
//! Parsing accepts an optional sign and is case-insensitive.

use crate::error::Base36Error;

/// Radix used for all text encoding.
pub const BASE: u32 = 36;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Digits needed for `u64::MAX` in base 36.
const MAX_DIGITS: usize = 13;

/// Appends `value` in base36, left-padded with `'0'` to at least `width`.
pub fn write_padded(out: &mut String, value: i64, width: usize) {
    let mut buf = [0u8; MAX_DIGITS];
    let mut pos = MAX_DIGITS;
    let mut magnitude = value.unsigned_abs();

    loop {
        pos -= 1;
        buf[pos] = DIGITS[(magnitude % BASE as u64) as usize];
        magnitude /= BASE as u64;
        if magnitude == 0 {
            break;
        }
    }

    let negative = value < 0;
    let len = MAX_DIGITS - pos + usize::from(negative);
    for _ in len..width {
        out.push('0');
    }
    if negative {
        out.push('-');
    }
    for &digit in &buf[pos..] {
        out.push(digit as char);
    }
}

/// Formats `value` in base36 without padding.
pub fn format_i64(value: i64) -> String {
    let mut out = String::with_capacity(MAX_DIGITS + 1);
    write_padded(&mut out, value, 0);
    out
}

/// Parses a base36 integer from raw bytes.
///
/// Accepts an optional leading `+` or `-` and digits `0-9`, `a-z`, `A-Z`.
pub fn parse_i64(input: &[u8]) -> Result<i64, Base36Error> {
    let (negative, digits, offset) = match input.first() {
        Some(b'-') => (true, &input[1..], 1),
        Some(b'+') => (false, &input[1..], 1),
        _ => (false, input, 0),
    };
    if digits.is_empty() {
        return Err(Base36Error::Empty);
    }

    let mut magnitude: u64 = 0;
    for (i, &byte) in digits.iter().enumerate() {
        let digit = digit_value(byte).ok_or(Base36Error::InvalidDigit {
            byte,
            position: i + offset,
        })?;
        magnitude = magnitude
            .checked_mul(BASE as u64)
            .and_then(|m| m.checked_add(digit as u64))
            .ok_or(Base36Error::Overflow)?;
    }

    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(Base36Error::Overflow);
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| Base36Error::Overflow)
    }
}

#[inline]
fn digit_value(byte: u8) -> Option<u32> {
    match byte {
        b'0'..=b'9' => Some((byte - b'0') as u32),
        b'a'..=b'z' => Some((byte - b'a') as u32 + 10),
        b'A'..=b'Z' => Some((byte - b'A') as u32 + 10),
        _ => None,
    }
}
