//! Adapters to common serialization and storage formats.
//!
//! All of them delegate to the text form ([`Guid::parse`] and `Display`):
//! - `serde` (default feature): a GUID is a 26-character string
//! - `rusqlite`: stored as TEXT, read back from TEXT or BLOB
//!
//! [`Guid::parse`]: crate::Guid::parse

#[cfg(feature = "serde")]
mod serde_impl;

#[cfg(feature = "rusqlite")]
mod sql;
