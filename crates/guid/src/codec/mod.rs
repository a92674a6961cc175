//! Binary and text encoding for GUID fields.
//!
//! - [`primitives`]: fixed-width zigzag varints for the numeric fields
//! - [`base36`]: the padded base36 text form

pub mod base36;
pub mod primitives;

pub use base36::{format_i64, parse_i64, write_padded};
pub use primitives::{
    put_signed_varint, read_signed_varint, signed_varint_max, zigzag_decode, zigzag_encode,
};
