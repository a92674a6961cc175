//! GUID generation from a clock, a fingerprint, counters and a random source.
//!
//! The codec never reads clocks or randomness itself; a [`Generator`] gathers
//! those inputs and hands them to the [`Guid`] setters. A process-wide
//! generator backs [`Guid::new`].

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use lazy_static::lazy_static;
use sha2::{Digest, Sha256};

use crate::model::layout::{MAX_FIELD_VALUE, filter};
use crate::model::Guid;

/// Source of wall-clock time.
pub type Clock = fn() -> SystemTime;

/// Source of random values. Output is reduced into `[0, 36^4)`.
pub type RandomSource = fn() -> u32;

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: [u8; 2] = *b"nw";

/// Fills GUIDs from its configured inputs.
///
/// Counters are atomics, so one generator can be shared across threads; the
/// increment counter counts up from its start value and the decrement counter
/// counts down, both wrapping within `[0, 36^4)`.
#[derive(Debug)]
pub struct Generator {
    prefix: [u8; 2],
    fingerprint: i32,
    increment: AtomicI32,
    decrement: AtomicI32,
    clock: Clock,
    random: RandomSource,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Creates a generator using the system clock, thread-local randomness and
    /// a fingerprint derived from the host name and process id.
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            fingerprint: host_fingerprint(),
            increment: AtomicI32::new(0),
            decrement: AtomicI32::new((MAX_FIELD_VALUE - 1) as i32),
            clock: SystemTime::now,
            random: rand::random::<u32>,
        }
    }

    pub fn with_prefix(mut self, b1: u8, b2: u8) -> Self {
        self.prefix = [b1, b2];
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: i32) -> Self {
        self.fingerprint = filter(fingerprint.into()) as i32;
        self
    }

    /// Sets the next values the counters will hand out.
    pub fn with_counters(self, incr: i32, decr: i32) -> Self {
        self.increment.store(filter(incr.into()) as i32, Ordering::Relaxed);
        self.decrement.store(filter(decr.into()) as i32, Ordering::Relaxed);
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: RandomSource) -> Self {
        self.random = random;
        self
    }

    pub fn prefix(&self) -> [u8; 2] {
        self.prefix
    }

    pub fn fingerprint(&self) -> i32 {
        self.fingerprint
    }

    /// Generates a GUID, advancing both counters.
    pub fn generate(&self) -> Guid {
        let incr = advance(&self.increment, 1);
        let decr = advance(&self.decrement, -1);
        let random = ((self.random)() % MAX_FIELD_VALUE as u32) as i32;

        Guid::NIL
            .with_prefix(self.prefix[0], self.prefix[1])
            .with_time((self.clock)())
            .with_fingerprint(self.fingerprint)
            .with_counters(incr, decr)
            .with_random(random)
    }
}

/// Returns the current counter value and moves it by `step`, wrapping.
fn advance(counter: &AtomicI32, step: i32) -> i32 {
    let bound = MAX_FIELD_VALUE as i32;
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
            Some(v.wrapping_add(step).rem_euclid(bound))
        })
        .unwrap_or_else(|v| v)
}

fn host_fingerprint() -> i32 {
    let host = std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(host.as_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let hash = hasher.finalize();

    let value = u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]]);
    (value % MAX_FIELD_VALUE as u32) as i32
}

// =============================================================================
// GLOBAL GENERATOR
// =============================================================================

lazy_static! {
    static ref GLOBAL_GENERATOR: RwLock<Generator> = RwLock::new(Generator::new());
}

pub(crate) fn generate_global() -> Guid {
    GLOBAL_GENERATOR
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .generate()
}

/// Sets the prefix bytes used by [`Guid::new`].
pub fn set_global_prefix_bytes(b1: u8, b2: u8) {
    let mut generator = GLOBAL_GENERATOR
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    generator.prefix = [b1, b2];
    tracing::debug!(prefix = ?[b1, b2], "set global guid prefix");
}

/// Sets the fingerprint used by [`Guid::new`].
pub fn set_global_fingerprint(fingerprint: i32) {
    let mut generator = GLOBAL_GENERATOR
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    generator.fingerprint = filter(fingerprint.into()) as i32;
    tracing::debug!(fingerprint = generator.fingerprint, "set global guid fingerprint");
}

/// Replaces the generator behind [`Guid::new`].
pub fn set_global_generator(generator: Generator) {
    tracing::debug!(
        prefix = ?generator.prefix,
        fingerprint = generator.fingerprint,
        "replaced global guid generator"
    );
    *GLOBAL_GENERATOR
        .write()
        .unwrap_or_else(PoisonError::into_inner) = generator;
}
