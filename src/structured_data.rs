//! RFC 5424 `STRUCTURED-DATA` extraction.
//!
//! The record grammar only needs the raw `[...]` span; decomposing it into
//! `(id, params)` pairs is kept as a separate, optional helper for callers
//! that want it.

use crate::cursor::ParseCursor;
use crate::error::FieldError;

#[derive(Debug, PartialEq, Eq)]
pub struct StructuredElement<'a> {
    pub id: &'a str,
    pub params: Vec<(&'a str, &'a str)>,
}

/// Extracts the `STRUCTURED-DATA` span at the cursor as a raw byte slice,
/// including its brackets. A bare `-` (nil) yields an empty slice. Never
/// decomposes the block — a caller that wants `id`/`params` calls
/// [`decompose`] on the returned slice.
pub fn parse_structured_data_span<'a>(cursor: &mut ParseCursor<'a>) -> Result<&'a [u8], FieldError> {
    if cursor.at_end() {
        return Ok(&cursor.buf[cursor.pos..cursor.pos]);
    }
    if cursor.buf[cursor.pos] == b'-' {
        let start = cursor.pos;
        cursor.pos += 1;
        return Ok(&cursor.buf[start..start]);
    }
    if cursor.buf[cursor.pos] != b'[' {
        return Err(FieldError::NoStructuredData);
    }
    let start = cursor.pos;
    let mut i = start;
    while i < cursor.len {
        if cursor.buf[i] == b']' && (i + 1 == cursor.len || cursor.buf[i + 1] == b' ') {
            cursor.pos = i + 1;
            return Ok(&cursor.buf[start..cursor.pos]);
        }
        i += 1;
    }
    Err(FieldError::NoStructuredData)
}

/// Decomposes one or more `[id k="v" ...]` blocks out of a structured-data
/// span (the slice [`parse_structured_data_span`] returned). Unrelated to
/// the core record grammar — an enrichment for callers who want typed
/// access to structured-data parameters.
pub fn decompose(sd: &str) -> Vec<StructuredElement<'_>> {
    let mut out = Vec::new();
    let bytes = sd.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        if bytes[pos] != b'[' {
            break;
        }
        let close = match find_datum_close(bytes, pos) {
            Some(c) => c,
            None => break,
        };
        let body = &sd[pos + 1..close];
        if let Some((id, rest)) = body.split_once(char::is_whitespace) {
            out.push(StructuredElement {
                id,
                params: parse_params(rest),
            });
        } else {
            out.push(StructuredElement { id: body, params: vec![] });
        }
        pos = close + 1;
    }
    out
}

fn find_datum_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    let mut in_quotes = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_quotes => i += 1,
            b'"' => in_quotes = !in_quotes,
            b']' if !in_quotes => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_params(s: &str) -> Vec<(&str, &str)> {
    let mut params = Vec::new();
    let bytes = s.as_bytes();
    let mut pos = 0;
    while pos < bytes.len() {
        while pos < bytes.len() && bytes[pos] == b' ' {
            pos += 1;
        }
        let name_start = pos;
        while pos < bytes.len() && bytes[pos] != b'=' {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }
        let name = &s[name_start..pos];
        pos += 1; // '='
        if pos >= bytes.len() || bytes[pos] != b'"' {
            break;
        }
        pos += 1;
        let value_start = pos;
        while pos < bytes.len() {
            if bytes[pos] == b'\\' {
                pos += 2;
                continue;
            }
            if bytes[pos] == b'"' {
                break;
            }
            pos += 1;
        }
        if pos > bytes.len() {
            break;
        }
        let value = &s[value_start..pos.min(bytes.len())];
        params.push((name, value));
        pos += 1; // closing quote
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_value_yields_empty_span() {
        let mut c = ParseCursor::new(b"- rest");
        let span = parse_structured_data_span(&mut c).unwrap();
        assert!(span.is_empty());
        assert_eq!(c.pos, 1);
    }

    #[test]
    fn at_end_yields_empty_span() {
        let mut c = ParseCursor::new(b"");
        let span = parse_structured_data_span(&mut c).unwrap();
        assert!(span.is_empty());
    }

    #[test]
    fn extracts_single_block() {
        let mut c = ParseCursor::new(b"[exampleSDID@32473 iut=\"3\" eventSource=\"App\"] msg");
        let span = parse_structured_data_span(&mut c).unwrap();
        assert_eq!(span, b"[exampleSDID@32473 iut=\"3\" eventSource=\"App\"]");
    }

    #[test]
    fn missing_terminator_is_an_error() {
        let mut c = ParseCursor::new(b"[unterminated");
        assert_eq!(parse_structured_data_span(&mut c), Err(FieldError::NoStructuredData));
    }

    #[test]
    fn decomposes_params() {
        let elements = decompose("[exampleSDID@32473 iut=\"3\" eventSource=\"Application\" eventID=\"1011\"]");
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].id, "exampleSDID@32473");
        assert_eq!(
            elements[0].params,
            vec![("iut", "3"), ("eventSource", "Application"), ("eventID", "1011")]
        );
    }
}
