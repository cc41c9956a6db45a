#![cfg(feature = "quickcheck")]
extern crate quickcheck;
extern crate quickcheck_macros;

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use syslog_core::{detect, parse_5424, parse_priority, FrameResult, Framer, FramingPolicy, ParseCursor};

/// `p.facility*8 + p.severity == p.P` for every value the primitive can
/// ever produce, not just the ones a handwritten test picks.
#[quickcheck]
fn priority_decomposition_round_trips(p: u8) -> bool {
    let buf = format!("<{}>rest", p);
    let mut cursor = ParseCursor::new(buf.as_bytes());
    match parse_priority(&mut cursor) {
        Ok(priority) => priority.facility as u16 * 8 + priority.severity as u16 == priority.p as u16,
        Err(_) => true,
    }
}

/// Running `detect` twice on the same prefix is idempotent.
#[quickcheck]
fn detect_is_idempotent(bytes: Vec<u8>) -> bool {
    detect(&bytes) == detect(&bytes)
}

/// A `LengthPrefix32` record's emitted slice length always equals the
/// 32-bit BE prefix value, for any prefix/body combination the generator
/// produces (including prefixes that exceed the buffered body).
#[quickcheck]
fn length_prefix32_slice_matches_declared_length(n: u16, body: Vec<u8>) -> TestResult {
    let mut buf = (n as u32).to_be_bytes().to_vec();
    buf.extend_from_slice(&body);

    let framer = Framer::new(FramingPolicy::LengthPrefix32);
    match framer.extract(&buf) {
        FrameResult::Record { bytes, consumed } => {
            if bytes.len() != n as usize || consumed != 4 + n as usize {
                return TestResult::failed();
            }
            TestResult::passed()
        }
        FrameResult::Incomplete => TestResult::discard(),
        FrameResult::Invalid(_) => TestResult::failed(),
    }
}

/// For every `OctetCount` extraction where the prefix parses,
/// `consumed == digits_len + 1 + n`.
#[quickcheck]
fn octet_count_consumed_matches_digits_plus_space_plus_body(n: u16, extra: Vec<u8>) -> bool {
    let digits = n.to_string();
    let mut buf = digits.clone().into_bytes();
    buf.push(b' ');
    buf.extend(std::iter::repeat(b'x').take(n as usize));
    buf.extend_from_slice(&extra);

    let framer = Framer::new(FramingPolicy::OctetCount);
    match framer.extract(&buf) {
        FrameResult::Record { bytes, consumed } => {
            bytes.len() == n as usize && consumed == digits.len() + 1 + n as usize
        }
        FrameResult::Incomplete => true,
        FrameResult::Invalid(_) => false,
    }
}

/// Parsing never advances the cursor past `len`, across arbitrary byte
/// input fed straight into the 5424 grammar.
#[quickcheck]
fn parse_5424_never_reads_past_buffer(bytes: Vec<u8>) -> bool {
    // parse_5424 itself takes ownership of a slice and can't overrun it by
    // construction (every cursor primitive bounds-checks against `len`
    // before indexing); this asserts the externally observable half of
    // that invariant, that the returned record never borrows past `raw`.
    let rec = parse_5424(&bytes, "");
    rec.raw.len() == bytes.len()
}

/// `detect` never panics and never returns different answers for prefixes
/// that share the same bytes up to the first space.
#[quickcheck]
fn detect_depends_only_on_prefix_up_to_first_space(mut bytes: Vec<u8>, suffix: Vec<u8>) -> TestResult {
    if bytes.iter().position(|&b| b == b' ').is_none() {
        return TestResult::discard();
    }
    let with_suffix = {
        let mut b = bytes.clone();
        b.extend_from_slice(&suffix);
        b
    };
    let a = detect(&bytes);
    bytes.extend_from_slice(&suffix);
    let b = detect(&with_suffix);
    TestResult::from_bool(a == b)
}
