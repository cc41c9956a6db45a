//! RFC 5424 (structured) record parser: `PRI VERSION SP TIMESTAMP SP
//! HOSTNAME SP APP-NAME SP PROCID SP MSGID SP STRUCTURED-DATA [SP MSG]`.

use crate::cursor::ParseCursor;
use crate::error::{FieldError, VersionError};
use crate::pri::{self, Priority};
use crate::structured_data::parse_structured_data_span;
use crate::timestamp::parse_5424_timestamp;
use crate::value::{Record, Value};

const APPNAME_MAX: usize = 48;
const PROCID_MAX: usize = 128;
const MSGID_MAX: usize = 32;

/// A `P5424` parser instance. `location` is accepted for API-compatibility
/// with callers that configure a default timezone; an RFC 5424 `DATE-TIME`
/// always carries its own offset, so it's never consulted here.
pub struct P5424 {
    #[allow(dead_code)]
    location: Option<String>,
}

impl P5424 {
    pub fn new(location: Option<String>) -> Self {
        P5424 { location }
    }

    pub fn parse(&self, buf: &[u8], client: &str) -> Record {
        parse(buf, client)
    }
}

fn set_priority(record: &mut Record, p: Priority) {
    record.set("priority", Value::Int(p.p as i64));
    record.set("facility", Value::Int(p.facility as i64));
    record.set("severity", Value::Int(p.severity as i64));
}

/// Parses a single RFC 5424 record. On a priority failure the fall-back
/// `(13, 1, 5)` is recorded and parsing stops there — unlike P3164, the
/// rest of the fixed header is never attempted once `<PRI>` is unreadable.
pub fn parse(buf: &[u8], client: &str) -> Record {
    let mut cursor = ParseCursor::new(buf);
    let mut record = Record::new(buf, client);

    let priority = match pri::parse_priority(&mut cursor) {
        Ok(p) => p,
        Err(err) => {
            set_priority(&mut record, Priority::fallback());
            record.set("client", Value::Str(client.to_string()));
            record.error = Some(err.into());
            return record;
        }
    };
    set_priority(&mut record, priority);

    let version = match cursor.parse_version() {
        Some(v) => v,
        None => {
            record.set("client", Value::Str(client.to_string()));
            record.error = Some(VersionError::VersionNotFound.into());
            return record;
        }
    };
    record.set("version", Value::Int(version as i64));

    if !cursor.skip_byte(b' ') {
        record.set("client", Value::Str(client.to_string()));
        record.error = Some(VersionError::VersionNotFound.into());
        return record;
    }

    if cursor.skip_byte(b'-') {
        cursor.skip_byte(b' ');
    } else {
        match parse_5424_timestamp(&mut cursor) {
            Ok(ts) => {
                record.set("timestamp", Value::Timestamp(ts));
                cursor.skip_byte(b' ');
            }
            Err(err) => {
                record.set("client", Value::Str(client.to_string()));
                record.error = Some(err.into());
                return record;
            }
        }
    }

    let hostname = cursor.parse_hostname().unwrap_or(&[]);
    record.set("hostname", Value::Str(String::from_utf8_lossy(hostname).to_string()));
    cursor.skip_byte(b' ');

    let app_name = match cursor.parse_up_to_len(APPNAME_MAX, FieldError::InvalidAppName) {
        Ok(a) => a,
        Err(err) => {
            record.set("client", Value::Str(client.to_string()));
            record.error = Some(err.into());
            return record;
        }
    };
    record.set("appName", Value::Str(String::from_utf8_lossy(app_name).to_string()));
    cursor.skip_byte(b' ');

    // PROCID and MSGID are lenient: a malformed trailer here is swallowed,
    // leaving the field unset rather than aborting the whole record.
    if let Ok(proc_id) = cursor.parse_up_to_len(PROCID_MAX, FieldError::InvalidProcId) {
        record.set("procId", Value::Str(String::from_utf8_lossy(proc_id).to_string()));
        cursor.skip_byte(b' ');
    }

    if let Ok(msg_id) = cursor.parse_up_to_len(MSGID_MAX, FieldError::InvalidMsgId) {
        record.set("msgId", Value::Str(String::from_utf8_lossy(msg_id).to_string()));
        cursor.skip_byte(b' ');
    }

    let sd_span = match parse_structured_data_span(&mut cursor) {
        Ok(span) => span,
        Err(err) => {
            record.set("client", Value::Str(client.to_string()));
            record.error = Some(err.into());
            return record;
        }
    };
    let sd = if sd_span.is_empty() {
        "-".to_string()
    } else {
        String::from_utf8_lossy(sd_span).to_string()
    };
    record.set("structuredData", Value::Str(sd));

    cursor.skip_byte(b' ');
    let message = String::from_utf8_lossy(cursor.remaining()).to_string();
    record.set("message", Value::Str(message));
    record.set("client", Value::Str(client.to_string()));
    record
}
