#![deny(clippy::all)]
#![deny(clippy::cargo)]

mod connection;
mod cursor;
mod detect;
mod error;
mod framer;
mod hostname;
mod pri;
mod rfc3164;
mod rfc5424;
mod server;
mod structured_data;
mod timestamp;
mod value;

pub use connection::{Connection, MemoryConnection};
pub use cursor::{DigitsError, ParseCursor};
pub use detect::{detect, Grammar};
pub use error::{FieldError, FramingError, ParseError, PriorityError, StructureError, TimestampError, VersionError};
pub use framer::{FrameResult, Framer, FramingPolicy};
pub use pri::{parse_priority, Priority, SyslogFacility, SyslogSeverity};
pub use rfc5424::P5424;
pub use server::{AddrError, Address, CodecPolicy, DefaultHandler, Handler, Server};
pub use structured_data::{decompose, StructuredElement};
pub use timestamp::IncompleteDate;
pub use value::{Record, Value};

/// Parses a single RFC 3164 (BSD) record.
///
/// `client` is the transport-level peer address, used as a fall-back
/// hostname when the record's own hostname is missing (a common deviation
/// seen from GNU syslog clients). `get_year` supplies the year for
/// timestamps that don't carry one.
pub fn parse_3164(buf: &[u8], client: &str, get_year: impl Fn() -> i32) -> Record {
    rfc3164::parse(buf, client, get_year)
}

/// Parses a single RFC 5424 (structured) record.
pub fn parse_5424(buf: &[u8], client: &str) -> Record {
    rfc5424::parse(buf, client)
}
