//! RFC 3164 (BSD) record parser: a cursor-driven state machine over a
//! single record, with the RFC's documented fall-backs for missing or
//! malformed fields.

use crate::cursor::ParseCursor;
use crate::hostname::cached_system_hostname;
use crate::pri::{self, Priority};
use crate::timestamp::{now_truncated_to_seconds, parse_3164_timestamp};
use crate::value::{Record, Value};

/// Scans a tag (`appname[pid]`) starting at the cursor, stopping at the
/// first `':'` or `' '` — `'['` only marks where the tag text ends, it
/// does not itself terminate the scan, since a PID block may follow
/// before the real separator. The PID itself is never decoded.
///
/// If no `':'` or `' '` is ever found before the end of the record, the
/// whole scan is discarded and the tag is empty (matches the reference
/// parser: a tag with no real terminator is not a tag at all).
fn parse_tag<'a>(cursor: &mut ParseCursor<'a>) -> &'a [u8] {
    let from = cursor.pos;
    let mut tag: Option<&'a [u8]> = None;
    loop {
        if cursor.pos == cursor.len {
            let _ = tag;
            return &cursor.buf[from..from];
        }
        let b = cursor.buf[cursor.pos];
        if b == b'[' && tag.is_none() {
            tag = Some(&cursor.buf[from..cursor.pos]);
        }
        if b == b':' || b == b' ' {
            let t = tag.unwrap_or(&cursor.buf[from..cursor.pos]);
            cursor.pos += 1;
            if cursor.pos < cursor.len && cursor.buf[cursor.pos] == b' ' {
                cursor.pos += 1;
            }
            return t;
        }
        cursor.pos += 1;
    }
}

fn derive_hostname_from_client(client: &str) -> String {
    if let Some(idx) = client.find(':') {
        if idx > 1 {
            return client[..idx].to_string();
        }
    }
    client.to_string()
}

fn resolve_hostname(cursor: &mut ParseCursor<'_>, client: &str) -> String {
    let token = cursor.parse_hostname().unwrap_or(&[]);
    if token.ends_with(b":") {
        // GNU syslog omitted the hostname; the token we just read is
        // actually the start of `tag:`. Rewind one byte so the tag scan
        // sees the ':' again.
        cursor.pos -= 1;
        let local = cached_system_hostname();
        if local.is_empty() {
            derive_hostname_from_client(client)
        } else {
            local
        }
    } else {
        let s = String::from_utf8_lossy(token).to_string();
        if s.is_empty() {
            derive_hostname_from_client(client)
        } else {
            s
        }
    }
}

fn trim_spaces(b: &[u8]) -> &[u8] {
    let start = b.iter().position(|&c| c != b' ').unwrap_or(b.len());
    let end = b.iter().rposition(|&c| c != b' ').map(|i| i + 1).unwrap_or(start);
    &b[start..end]
}

/// Parses a single RFC 3164 record. Never fails outright: on any grammar
/// error the best-effort partial record is returned with `error` set.
pub fn parse(buf: &[u8], client: &str, get_year: impl Fn() -> i32) -> Record {
    let mut cursor = ParseCursor::new(buf);
    let mut record = Record::new(buf, client);

    let priority = match pri::parse_priority(&mut cursor) {
        Ok(p) => p,
        Err(err) => {
            let fallback = Priority::fallback();
            set_priority(&mut record, fallback);
            record.set("timestamp", Value::Timestamp(now_truncated_to_seconds()));
            record.set("hostname", Value::Str(String::new()));
            record.set("tag", Value::Str(String::new()));
            let content = String::from_utf8_lossy(trim_spaces(cursor.remaining())).to_string();
            record.set("content", Value::Str(content));
            record.set("client", Value::Str(client.to_string()));
            record.error = Some(err.into());
            return record;
        }
    };
    set_priority(&mut record, priority);

    let header_start = cursor.pos;
    let (timestamp, hostname) = match parse_3164_timestamp(&mut cursor, &get_year) {
        Ok(ts) => (ts, resolve_hostname(&mut cursor, client)),
        Err(_) => {
            cursor.pos = header_start;
            cursor.skip_tag = true;
            (now_truncated_to_seconds(), String::new())
        }
    };
    record.set("timestamp", Value::Timestamp(timestamp));
    record.set("hostname", Value::Str(hostname));

    let tag = if cursor.skip_tag {
        String::new()
    } else {
        String::from_utf8_lossy(parse_tag(&mut cursor)).to_string()
    };
    record.set("tag", Value::Str(tag));

    let content = String::from_utf8_lossy(trim_spaces(cursor.remaining())).to_string();
    record.set("content", Value::Str(content));
    record.set("client", Value::Str(client.to_string()));
    record
}

fn set_priority(record: &mut Record, p: Priority) {
    record.set("priority", Value::Int(p.p as i64));
    record.set("facility", Value::Int(p.facility as i64));
    record.set("severity", Value::Int(p.severity as i64));
}
