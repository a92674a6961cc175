//! Sortable 26-byte GUIDs with a 26-character base36 text form.
//!
//! A GUID packs six fields into a fixed binary layout:
//!
//! | Field | Bytes | Text |
//! |---|---|---|
//! | prefix | 0–1 | 2 raw characters |
//! | timestamp (ms since epoch) | 2–9 | 8 base36 |
//! | fingerprint | 10–13 | 4 base36 |
//! | increment counter | 14–17 | 4 base36 |
//! | decrement counter | 18–21 | 4 base36 |
//! | random | 22–25 | 4 base36 |
//!
//! Numeric fields are zigzag varints padded to the field width. Fingerprint,
//! counters and random are reduced into `[0, 36^4)` so each always renders as
//! four characters.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::{Duration, UNIX_EPOCH};
//! use guid::Guid;
//!
//! let g = Guid::NIL
//!     .with_prefix(b'x', b'o')
//!     .with_time(UNIX_EPOCH + Duration::from_millis(1_622_222_222_222))
//!     .with_fingerprint(2222)
//!     .with_counters(500, 1000)
//!     .with_random(315_530);
//!
//! assert_eq!(g.to_string(), "xokp8l85n201pq00dw00rs6rgq");
//! assert_eq!(g.slug(), "85n2dwrs6rgq");
//!
//! let parsed: Guid = "xoKP8L85N201PQ00DW00RS6RGQ".parse().unwrap();
//! assert_eq!(parsed, g);
//!
//! let digest = g.sign(b"music television").unwrap();
//! assert!(g.did_sign(&digest));
//! ```
//!
//! # Modules
//!
//! - [`model`]: the [`Guid`] type and its byte layout
//! - [`codec`]: varint and base36 primitives
//! - [`sign`]: OR-fold tagging of data digests
//! - [`generator`]: filling GUIDs from clock, counters and randomness
//! - [`error`]: error types
//!
//! # Signing
//!
//! [`Guid::sign`] ORs GUID bytes into a SHA-256 digest of some data, and
//! [`Guid::did_sign`] checks that those bits are present. It is a tagging
//! trick with expected false positives and provides no security.

pub mod codec;
pub mod error;
pub mod generator;
mod interop;
pub mod model;
pub mod sign;

// Re-export commonly used types at crate root
pub use error::{Base36Error, ParseError};
pub use generator::{
    Generator, set_global_fingerprint, set_global_generator, set_global_prefix_bytes,
};
pub use model::{BYTE_SIZE, Guid, MAX_FIELD_VALUE, SLUG_SIZE};
pub use sign::{did_sign, sign};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
