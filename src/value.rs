//! The parsed record and the typed values that populate its header.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::ParseError;

/// One of the three header value kinds the grammar can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Str(String),
    Timestamp(DateTime<FixedOffset>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Timestamp(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        }
    }
}

/// The product of parsing one syslog message.
///
/// `raw` never includes framing bytes (the length prefix or trailing
/// newline the framer stripped). `error` is populated even when the rest of
/// the record is a usable partial result — a record with an error is still
/// handed to the caller's handler, never silently dropped by the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub header: BTreeMap<&'static str, Value>,
    pub raw: Vec<u8>,
    pub client: String,
    pub error: Option<ParseError>,
}

impl Record {
    pub fn new(raw: &[u8], client: &str) -> Self {
        Record {
            header: BTreeMap::new(),
            raw: raw.to_vec(),
            client: client.to_string(),
            error: None,
        }
    }

    pub fn set(&mut self, key: &'static str, value: Value) {
        self.header.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.header.get(key)
    }
}

/// JSON projection: `{"header": {...}, "body": "..."}`. The body is
/// the raw bytes decoded lossily to UTF-8 — the wire format itself doesn't
/// guarantee valid UTF-8, so this is a best-effort projection, not a
/// round-trip-safe encoding.
impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("header", &self.header)?;
        map.serialize_entry("body", &String::from_utf8_lossy(&self.raw))?;
        map.end()
    }
}
