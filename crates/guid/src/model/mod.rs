//! Data model for GUIDs.
//!
//! - [`layout`]: byte ranges of each field and the slug positions
//! - [`guid`]: the [`Guid`] value type, its accessors and text form

pub mod guid;
pub mod layout;

pub use guid::Guid;
pub use layout::{BYTE_SIZE, MAX_FIELD_VALUE, SLUG_SIZE};
