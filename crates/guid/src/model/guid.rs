//! The 26-byte GUID value type.

use std::fmt::{self, Write as _};
use std::ops::Range;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::codec::{base36, put_signed_varint, read_signed_varint, signed_varint_max};
use crate::error::{Base36Error, ParseError};
use crate::model::layout::{
    BYTE_SIZE, DECREMENT, FIELD_SIZE, FINGERPRINT, INCREMENT, PREFIX, RANDOM, SLUG_POSITIONS,
    SLUG_SIZE, TIMESTAMP, filter,
};

/// Largest magnitude the 8-byte timestamp field can hold, in milliseconds.
const MAX_TIMESTAMP_MILLIS: i64 = signed_varint_max(2 * FIELD_SIZE);

/// A globally unique identifier.
///
/// A plain 26-byte value: every `with_*` setter returns a new GUID and leaves
/// the receiver untouched. See [`layout`](crate::model::layout) for the field
/// ranges.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Guid([u8; BYTE_SIZE]);

impl Guid {
    /// The all-zero GUID.
    pub const NIL: Guid = Guid([0u8; BYTE_SIZE]);

    /// Creates a GUID with the global generator.
    ///
    /// See [`set_global_prefix_bytes`](crate::set_global_prefix_bytes) and
    /// [`set_global_fingerprint`](crate::set_global_fingerprint) to configure it.
    pub fn new() -> Self {
        crate::generator::generate_global()
    }

    /// Wraps raw bytes without any validation.
    pub const fn from_bytes(bytes: [u8; BYTE_SIZE]) -> Self {
        Guid(bytes)
    }

    /// Returns the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; BYTE_SIZE] {
        &self.0
    }

    /// Consumes the GUID, returning its raw bytes.
    pub const fn into_bytes(self) -> [u8; BYTE_SIZE] {
        self.0
    }

    // =========================================================================
    // FIELDS
    // =========================================================================

    /// Sets both prefix bytes.
    pub fn with_prefix(mut self, b1: u8, b2: u8) -> Self {
        self.0[PREFIX.start] = b1;
        self.0[PREFIX.start + 1] = b2;
        self
    }

    /// Returns the two prefix bytes.
    pub fn prefix_bytes(&self) -> (u8, u8) {
        (self.0[PREFIX.start], self.0[PREFIX.start + 1])
    }

    /// Sets the timestamp. Precision below one millisecond is discarded.
    pub fn with_time(self, time: SystemTime) -> Self {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map(|m| -m)
                .unwrap_or(i64::MIN),
        };
        self.with_timestamp_millis(millis)
    }

    /// Sets the timestamp from milliseconds since the Unix epoch.
    ///
    /// Values beyond what the 8-byte field can hold saturate.
    pub fn with_timestamp_millis(self, millis: i64) -> Self {
        let millis = millis.clamp(-MAX_TIMESTAMP_MILLIS - 1, MAX_TIMESTAMP_MILLIS);
        self.with_field(TIMESTAMP, millis)
    }

    /// Returns the timestamp in milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.field(TIMESTAMP)
    }

    /// Returns the embedded timestamp.
    pub fn time(&self) -> SystemTime {
        let millis = self.timestamp_millis();
        let offset = Duration::from_millis(millis.unsigned_abs());
        let time = if millis >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        time.unwrap_or(UNIX_EPOCH)
    }

    /// Sets the device fingerprint, reduced into `[0, 36^4)`.
    pub fn with_fingerprint(self, value: i32) -> Self {
        self.with_filtered(FINGERPRINT, value.into())
    }

    pub fn fingerprint(&self) -> i32 {
        self.field(FINGERPRINT) as i32
    }

    /// Sets both counters, each reduced into `[0, 36^4)`.
    pub fn with_counters(self, incr: i32, decr: i32) -> Self {
        self.with_increment_counter(incr).with_decrement_counter(decr)
    }

    /// Returns the increment and decrement counters.
    pub fn counters(&self) -> (i32, i32) {
        (self.increment_counter(), self.decrement_counter())
    }

    pub fn with_increment_counter(self, value: i32) -> Self {
        self.with_filtered(INCREMENT, value.into())
    }

    pub fn increment_counter(&self) -> i32 {
        self.field(INCREMENT) as i32
    }

    pub fn with_decrement_counter(self, value: i32) -> Self {
        self.with_filtered(DECREMENT, value.into())
    }

    pub fn decrement_counter(&self) -> i32 {
        self.field(DECREMENT) as i32
    }

    /// Sets the random value, reduced into `[0, 36^4)`.
    pub fn with_random(self, value: i32) -> Self {
        self.with_filtered(RANDOM, value.into())
    }

    pub fn random(&self) -> i32 {
        self.field(RANDOM) as i32
    }

    #[inline]
    fn with_field(mut self, range: Range<usize>, value: i64) -> Self {
        put_signed_varint(&mut self.0[range], value);
        self
    }

    #[inline]
    fn with_filtered(self, range: Range<usize>, value: i64) -> Self {
        self.with_field(range, filter(value))
    }

    #[inline]
    fn field(&self, range: Range<usize>) -> i64 {
        read_signed_varint(&self.0[range])
    }

    // =========================================================================
    // TEXT
    // =========================================================================

    /// Parses the 26-character text form.
    ///
    /// The prefix bytes are copied verbatim; the remaining fields are base36
    /// and case-insensitive.
    pub fn parse(input: &[u8]) -> Result<Self, ParseError> {
        Self::parse_fields(input).inspect_err(|err| {
            tracing::trace!(error = %err, "rejected guid text");
        })
    }

    fn parse_fields(input: &[u8]) -> Result<Self, ParseError> {
        if input.len() != BYTE_SIZE {
            return Err(ParseError::InvalidLength { len: input.len() });
        }

        let timestamp = parse_field(input, TIMESTAMP, |value, source| {
            ParseError::InvalidTimestamp { value, source }
        })?;
        let fingerprint = parse_field(input, FINGERPRINT, |value, source| {
            ParseError::InvalidFingerprint { value, source }
        })?;
        let incr = parse_field(input, INCREMENT, |value, source| {
            ParseError::InvalidIncrementCounter { value, source }
        })?;
        let decr = parse_field(input, DECREMENT, |value, source| {
            ParseError::InvalidDecrementCounter { value, source }
        })?;
        let random = parse_field(input, RANDOM, |value, source| {
            ParseError::InvalidRandom { value, source }
        })?;

        Ok(Guid::NIL
            .with_prefix(input[PREFIX.start], input[PREFIX.start + 1])
            .with_timestamp_millis(timestamp)
            .with_filtered(FINGERPRINT, fingerprint)
            .with_filtered(INCREMENT, incr)
            .with_filtered(DECREMENT, decr)
            .with_filtered(RANDOM, random))
    }

    /// Returns a 12-character slug for small-scope disambiguation.
    ///
    /// This is one way: the prefix, the high half of the timestamp, the
    /// fingerprint and the high half of each counter are dropped, so distinct
    /// GUIDs can share a slug.
    pub fn slug(&self) -> String {
        let fields = self.encode_fields();
        let bytes = fields.as_bytes();
        let mut out = String::with_capacity(SLUG_SIZE);
        for &position in &SLUG_POSITIONS {
            out.push(bytes[position - PREFIX.end] as char);
        }
        out
    }

    /// Base36 text of every field after the prefix.
    fn encode_fields(&self) -> String {
        let mut out = String::with_capacity(BYTE_SIZE - PREFIX.end);
        base36::write_padded(&mut out, self.field(TIMESTAMP), 2 * FIELD_SIZE);
        for range in [FINGERPRINT, INCREMENT, DECREMENT, RANDOM] {
            base36::write_padded(&mut out, self.field(range), FIELD_SIZE);
        }
        out
    }
}

fn parse_field(
    input: &[u8],
    range: Range<usize>,
    make_error: fn(String, Base36Error) -> ParseError,
) -> Result<i64, ParseError> {
    let raw = &input[range];
    base36::parse_i64(raw)
        .map_err(|source| make_error(String::from_utf8_lossy(raw).into_owned(), source))
}

/// Writes the two prefix bytes as characters followed by the 24 field
/// characters. Each prefix byte becomes `char::from(byte)`, so a byte of
/// `0x80` or above takes two bytes of UTF-8 and the text no longer parses
/// back. Only ASCII prefixes round-trip through text.
impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (b1, b2) = self.prefix_bytes();
        f.write_char(char::from(b1))?;
        f.write_char(char::from(b2))?;
        f.write_str(&self.encode_fields())
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Guid").field(&self.to_string()).finish()
    }
}

impl FromStr for Guid {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Guid::parse(s.as_bytes())
    }
}

impl TryFrom<&str> for Guid {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Guid::parse(s.as_bytes())
    }
}

/// Raw binary form: copies exactly 26 bytes without decoding.
impl TryFrom<&[u8]> for Guid {
    type Error = ParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; BYTE_SIZE]>::try_from(bytes)
            .map(Guid)
            .map_err(|_| ParseError::InvalidLength { len: bytes.len() })
    }
}

impl From<[u8; BYTE_SIZE]> for Guid {
    fn from(bytes: [u8; BYTE_SIZE]) -> Self {
        Guid(bytes)
    }
}

impl From<Guid> for [u8; BYTE_SIZE] {
    fn from(guid: Guid) -> Self {
        guid.0
    }
}

impl AsRef<[u8]> for Guid {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::MAX_FIELD_VALUE;
    use proptest::prelude::*;

    const TS_NANOS: u64 = 1_622_222_222_222_000_000;
    const RANDOM_6RGQ: i32 = 315_530;

    const HAPPY_BYTES: [u8; BYTE_SIZE] = [
        0x78, 0x6f, 0x9c, 0xce, 0xd5, 0xbf, 0xb6, 0x5e, 0x0, 0x0, 0xdc, 0x22, 0x0, 0x0, 0xe8,
        0x7, 0x0, 0x0, 0xd0, 0xf, 0x0, 0x0, 0x94, 0xc2, 0x26, 0x0,
    ];

    #[test]
    fn test_build_up() {
        let g = Guid::NIL.with_prefix(b'x', b'o');
        assert_eq!(g.to_string(), "xo000000000000000000000000");

        let g = g.with_random(RANDOM_6RGQ);
        assert_eq!(g.to_string(), "xo000000000000000000006rgq");

        let g = g.with_counters(500, 1000);
        assert_eq!(g.to_string(), "xo00000000000000dw00rs6rgq");

        let g = g.with_time(UNIX_EPOCH + Duration::from_nanos(TS_NANOS));
        assert_eq!(g.to_string(), "xokp8l85n2000000dw00rs6rgq");

        let g = g.with_fingerprint(2222);
        assert_eq!(g.to_string(), "xokp8l85n201pq00dw00rs6rgq");
        assert_eq!(g.as_bytes(), &HAPPY_BYTES);
    }

    #[test]
    fn test_tear_down() {
        let g: Guid = "xokp8l85n201pq00dw00rs6rgq".parse().unwrap();

        assert_eq!(g.prefix_bytes(), (b'x', b'o'));
        assert_eq!(g.fingerprint(), 2222);
        assert_eq!(g.counters(), (500, 1000));
        assert_eq!(g.random(), RANDOM_6RGQ);

        let nanos = g.time().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        assert_eq!(nanos, TS_NANOS as u128);
    }

    #[test]
    fn test_setters_do_not_mutate() {
        let original = Guid::NIL.with_prefix(b'a', b'b');
        let updated = original.with_fingerprint(42);
        assert_eq!(original.fingerprint(), 0);
        assert_eq!(updated.fingerprint(), 42);
        assert_eq!(updated.prefix_bytes(), (b'a', b'b'));
    }

    #[test]
    fn test_sub_millisecond_precision_lost() {
        let t = UNIX_EPOCH + Duration::from_nanos(1_000_000_999_999);
        let g = Guid::NIL.with_time(t);
        assert_eq!(g.timestamp_millis(), 1_000_000);
        assert_eq!(g.time(), UNIX_EPOCH + Duration::from_millis(1_000_000));
    }

    #[test]
    fn test_time_before_epoch() {
        let t = UNIX_EPOCH - Duration::from_millis(1500);
        let g = Guid::NIL.with_time(t);
        assert_eq!(g.timestamp_millis(), -1500);
        assert_eq!(g.time(), t);
    }

    #[test]
    fn test_timestamp_saturates() {
        let g = Guid::NIL.with_timestamp_millis(i64::MAX);
        assert_eq!(g.timestamp_millis(), MAX_TIMESTAMP_MILLIS);

        let g = Guid::NIL.with_timestamp_millis(i64::MIN);
        assert_eq!(g.timestamp_millis(), -MAX_TIMESTAMP_MILLIS - 1);
    }

    #[test]
    fn test_numeric_filtering() {
        let max = MAX_FIELD_VALUE as i32;
        let g = Guid::NIL
            .with_fingerprint(max + 1)
            .with_counters(max, -1)
            .with_random(i32::MAX);

        assert_eq!(g.fingerprint(), 1);
        assert_eq!(g.counters(), (0, max - 1));
        assert_eq!(g.random(), (i32::MAX as i64 % MAX_FIELD_VALUE) as i32);

        let text = g.to_string();
        assert_eq!(&text[FINGERPRINT], "0001");
        assert_eq!(&text[INCREMENT], "0000");
        assert_eq!(&text[DECREMENT], "zzzz");
    }

    #[test]
    fn test_non_ascii_prefix_text() {
        let g = Guid::from_bytes(HAPPY_BYTES).with_prefix(0xe9, b'o');
        let text = g.to_string();
        assert_eq!(text.len(), BYTE_SIZE + 1);
        assert!(text.starts_with('\u{e9}'));
        assert!(matches!(
            Guid::parse(text.as_bytes()),
            Err(ParseError::InvalidLength { len: 27 })
        ));
        assert_eq!(Guid::try_from(&g.as_bytes()[..]).unwrap(), g);
    }

    #[test]
    fn test_parse_happy_path() {
        let g = Guid::parse(b"xokp8l85n201pq00dw00rs6rgq").unwrap();
        assert_eq!(g, Guid::from_bytes(HAPPY_BYTES));
    }

    #[test]
    fn test_parse_case_insensitive_after_prefix() {
        let lower = Guid::parse(b"xokp8l85n201pq00dw00rs6rgq").unwrap();
        let upper = Guid::parse(b"xoKP8L85N201PQ00DW00RS6RGQ").unwrap();
        let mixed = Guid::parse(b"xoKP8l85N201PQ00DW00RS6RGQ").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_parse_preserves_prefix_case() {
        let g = Guid::parse(b"XOkp8l85n201pq00dw00rs6rgq").unwrap();
        assert_eq!(g.prefix_bytes(), (b'X', b'O'));
        assert_ne!(g, Guid::parse(b"xokp8l85n201pq00dw00rs6rgq").unwrap());
    }

    #[test]
    fn test_parse_errors() {
        let cases: &[(&str, &str)] = &[
            ("nope", "bytes in length"),
            ("xokp8l85n201pq00dw00rs6rgqf", "bytes in length"),
            ("xokp8l85n201pq\u{1F435}0dw00rs6rgq", "bytes in length"),
            ("xokp\u{1F435}l85n201pq00dw00rs6", "invalid time value"),
            ("xokp8l85n2\u{1F435}00dw00rs6rgq", "invalid fingerprint value"),
            ("xokp8l85n201pq\u{1F435}0dw00rs6", "invalid increment counter value"),
            ("xokp8l85n201pq00dw00r\u{1F435}6", "invalid decrement counter value"),
            ("xokp8l85n201pq00dw00rs\u{1F435}", "invalid random value"),
        ];

        for (input, expected) in cases {
            let err = Guid::parse(input.as_bytes()).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected [{}] to contain [{}]",
                err,
                expected
            );
        }
    }

    #[test]
    fn test_parse_error_variants() {
        assert!(matches!(
            Guid::parse(b"short"),
            Err(ParseError::InvalidLength { len: 5 })
        ));

        let err = Guid::parse(b"xokp8l85n2!!!!00dw00rs6rgq").unwrap_err();
        assert_eq!(err.field(), Some("fingerprint"));
        match err {
            ParseError::InvalidFingerprint { value, source } => {
                assert_eq!(value, "!!!!");
                assert_eq!(source, Base36Error::InvalidDigit { byte: b'!', position: 0 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_signed_field_is_filtered() {
        let g = Guid::parse(b"xokp8l85n2-00100dw00rs6rgq").unwrap();
        assert_eq!(g.fingerprint(), (MAX_FIELD_VALUE - 1) as i32);
    }

    #[test]
    fn test_negative_timestamp_formats_natively() {
        let g = Guid::NIL.with_prefix(b'a', b'a').with_timestamp_millis(-35);
        assert_eq!(g.to_string(), "aa000000-z0000000000000000");
    }

    #[test]
    fn test_slugs() {
        let cases = [
            ("nwlen32f2p2s1g0001r1dsx5ls", "2f2p01dsx5ls"),
            ("nwlen32f2p2s1g0003r1drxy2f", "2f2p03drxy2f"),
            ("nwlen32f2p2s1g0000r1djhu8g", "2f2p00djhu8g"),
            ("shlen330b42s8g0001r1ejl30p", "30b401ejl30p"),
            ("shlen330b42s8g0009r1eacku7", "30b409eacku7"),
            ("fulen33m4v2stg0000r1fcwcpv", "3m4v00fcwcpv"),
            ("fulen33m4v2stg0007r1f5vx7v", "3m4v07f5vx7v"),
            ("xxlen34mdp2ss80000r1gn8hi0", "4mdp00gn8hi0"),
            ("xxlen34mdp2ss80005r1gi18cy", "4mdp05gi18cy"),
            ("xxlen34mdp2ss80009r1gen1nn", "4mdp09gen1nn"),
        ];

        for (text, slug) in cases {
            let g = Guid::parse(text.as_bytes()).unwrap();
            assert_eq!(g.to_string(), text);
            assert_eq!(g.slug(), slug, "slug of {}", text);
        }
    }

    #[test]
    fn test_slug_ignores_discarded_positions() {
        let a = Guid::parse(b"nwlen32f2p2s1g0001r1dsx5ls").unwrap();
        let b = Guid::parse(b"qqzzzz2f2pzzzzzz01zzdsx5ls").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.slug(), b.slug());
    }

    #[test]
    fn test_raw_bytes() {
        let g = Guid::from_bytes(HAPPY_BYTES);
        let raw: [u8; BYTE_SIZE] = g.into();
        assert_eq!(raw, HAPPY_BYTES);
        assert_eq!(Guid::try_from(&raw[..]).unwrap(), g);
        assert!(matches!(
            Guid::try_from(&raw[..25]),
            Err(ParseError::InvalidLength { len: 25 })
        ));
        assert_eq!(g.as_ref(), &HAPPY_BYTES[..]);
    }

    #[test]
    fn test_debug_shows_text() {
        let g = Guid::from_bytes(HAPPY_BYTES);
        assert_eq!(format!("{:?}", g), "Guid(\"xokp8l85n201pq00dw00rs6rgq\")");
    }

    fn arb_guid() -> impl Strategy<Value = Guid> {
        (
            b'a'..=b'z',
            b'0'..=b'9',
            0i64..36i64.pow(8),
            any::<i32>(),
            any::<i32>(),
            any::<i32>(),
            any::<i32>(),
        )
            .prop_map(|(b1, b2, ts, fp, incr, decr, rd)| {
                Guid::NIL
                    .with_prefix(b1, b2)
                    .with_timestamp_millis(ts)
                    .with_fingerprint(fp)
                    .with_counters(incr, decr)
                    .with_random(rd)
            })
    }

    proptest! {
        #[test]
        fn prop_text_roundtrip(g in arb_guid()) {
            let text = g.to_string();
            prop_assert_eq!(text.len(), BYTE_SIZE);
            prop_assert_eq!(Guid::parse(text.as_bytes()).unwrap(), g);
        }

        #[test]
        fn prop_slug_is_twelve_chars(g in arb_guid()) {
            prop_assert_eq!(g.slug().len(), SLUG_SIZE);
        }

        #[test]
        fn prop_filtered_fields_in_range(v in any::<i32>()) {
            let g = Guid::NIL.with_fingerprint(v).with_counters(v, v).with_random(v);
            let expected = (v as i64).rem_euclid(MAX_FIELD_VALUE) as i32;
            prop_assert_eq!(g.fingerprint(), expected);
            prop_assert_eq!(g.counters(), (expected, expected));
            prop_assert_eq!(g.random(), expected);
            prop_assert_eq!(g.to_string().len(), BYTE_SIZE);
        }

        #[test]
        fn prop_wrong_length_rejected(input in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assume!(input.len() != BYTE_SIZE);
            let is_length_error = matches!(
                Guid::parse(&input),
                Err(ParseError::InvalidLength { .. })
            );
            prop_assert!(is_length_error);
        }
    }
}
