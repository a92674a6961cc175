//! OR-fold tagging of data with a GUID.
//!
//! [`sign`] hashes data with SHA-256 and ORs GUID bytes into the digest;
//! [`did_sign`] checks that every bit the GUID contributes is still set.
//! This is a watermark, not authentication: OR only ever adds bits, so a
//! digest with enough bits set (an all-ones digest in the limit) passes the
//! check for any GUID.

use sha2::{Digest, Sha256};

use crate::model::layout::BYTE_SIZE;
use crate::model::Guid;

/// Size of a SHA-256 digest.
pub const DIGEST_SIZE: usize = 32;

/// Number of GUID bytes folded into a digest (all of them).
const FOLD_LEN: usize = BYTE_SIZE;

/// `(digest index, guid index)` pairs combined by bitwise OR.
///
/// - forward: guid bytes 2..14 into digest bytes 0..12
/// - reverse: guid bytes 25 down to 14 into digest bytes 31 down to 20
/// - prefix: guid bytes 0 and 1 into digest bytes 12 and 13
pub const FOLD_TABLE: [(usize, usize); FOLD_LEN] = build_fold_table();

const fn build_fold_table() -> [(usize, usize); FOLD_LEN] {
    let mut table = [(0, 0); FOLD_LEN];
    let mut n = 0;
    let mut i = 2;
    while i < 14 {
        table[n] = (i - 2, i);
        let j = DIGEST_SIZE - 1 - (i - 2);
        table[n + 1] = (j, j - (DIGEST_SIZE - BYTE_SIZE));
        n += 2;
        i += 1;
    }
    table[n] = (12, 0);
    table[n + 1] = (13, 1);
    table
}

/// Signs `data` with `guid`, returning 64 lowercase hex characters.
///
/// Returns `None` when `data` is empty.
pub fn sign(guid: &Guid, data: &[u8]) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    let mut digest = [0u8; DIGEST_SIZE];
    digest.copy_from_slice(&Sha256::digest(data));

    let bytes = guid.as_bytes();
    for &(d, g) in &FOLD_TABLE {
        digest[d] |= bytes[g];
    }

    Some(hex::encode(digest))
}

/// Returns true if `digest_hex` carries every bit `guid` would have folded in.
///
/// Malformed hex or a decoded length other than 32 bytes yields `false`.
pub fn did_sign(guid: &Guid, digest_hex: &str) -> bool {
    let Ok(digest) = hex::decode(digest_hex) else {
        return false;
    };
    if digest.len() != DIGEST_SIZE {
        return false;
    }

    let bytes = guid.as_bytes();
    FOLD_TABLE
        .iter()
        .all(|&(d, g)| digest[d] & bytes[g] == bytes[g])
}

impl Guid {
    /// See [`sign`].
    pub fn sign(&self, data: &[u8]) -> Option<String> {
        sign(self, data)
    }

    /// See [`did_sign`].
    pub fn did_sign(&self, digest_hex: &str) -> bool {
        did_sign(self, digest_hex)
    }
}
