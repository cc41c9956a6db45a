//! Auto-detection of framing policy and grammar from a record prefix.

use crate::framer::FramingPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    P3164,
    P5424,
}

/// Inspects the first `≤ first_space_offset + 2` bytes of `buf` and returns
/// the framing policy and grammar to use. Never consumes bytes; safe to
/// call on a buffer that doesn't yet hold a full record.
pub fn detect(buf: &[u8]) -> (FramingPolicy, Grammar) {
    if buf.is_empty() {
        return (FramingPolicy::Newline, Grammar::P3164);
    }

    let space = buf.iter().position(|&b| b == b' ').filter(|&i| i > 0);
    let i = match space {
        Some(i) => i,
        None => return (FramingPolicy::Newline, Grammar::P3164),
    };

    if buf[..i].iter().all(u8::is_ascii_digit) {
        return (FramingPolicy::OctetCount, Grammar::P5424);
    }

    if buf[0] != b'<' {
        return (FramingPolicy::Newline, Grammar::P3164);
    }

    let angle = match buf.iter().position(|&b| b == b'>') {
        Some(a) if a < i => a,
        _ => return (FramingPolicy::Newline, Grammar::P3164),
    };

    if i == angle + 2 && buf.get(angle + 1).is_some_and(u8::is_ascii_digit) {
        return (FramingPolicy::Newline, Grammar::P5424);
    }

    (FramingPolicy::Newline, Grammar::P3164)
}
