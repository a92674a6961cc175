//! Error types for GUID parsing.

use thiserror::Error;

use crate::model::layout::BYTE_SIZE;

/// Error while reading a base36 integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base36Error {
    #[error("empty base36 value")]
    Empty,

    #[error("invalid base36 digit {byte:#04x} at position {position}")]
    InvalidDigit { byte: u8, position: usize },

    #[error("base36 value out of range for i64")]
    Overflow,
}

/// Error while parsing a GUID from its text form.
///
/// Field errors carry the offending substring (lossily decoded, since a
/// multi-byte character may straddle a field boundary) and the underlying
/// base36 failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("the byte slice must be exactly {} bytes in length, got {len}", BYTE_SIZE)]
    InvalidLength { len: usize },

    #[error("invalid time value '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: Base36Error,
    },

    #[error("invalid fingerprint value '{value}': {source}")]
    InvalidFingerprint {
        value: String,
        #[source]
        source: Base36Error,
    },

    #[error("invalid increment counter value '{value}': {source}")]
    InvalidIncrementCounter {
        value: String,
        #[source]
        source: Base36Error,
    },

    #[error("invalid decrement counter value '{value}': {source}")]
    InvalidDecrementCounter {
        value: String,
        #[source]
        source: Base36Error,
    },

    #[error("invalid random value '{value}': {source}")]
    InvalidRandom {
        value: String,
        #[source]
        source: Base36Error,
    },
}

impl ParseError {
    /// Returns the name of the field that failed, or `None` for length errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ParseError::InvalidLength { .. } => None,
            ParseError::InvalidTimestamp { .. } => Some("timestamp"),
            ParseError::InvalidFingerprint { .. } => Some("fingerprint"),
            ParseError::InvalidIncrementCounter { .. } => Some("increment counter"),
            ParseError::InvalidDecrementCounter { .. } => Some("decrement counter"),
            ParseError::InvalidRandom { .. } => Some("random"),
        }
    }
}
