//! Error taxonomy for the framing layer and the two record grammars.
//!
//! Every variant here names a distinct failure kind rather than carrying a
//! formatted string, so a caller can match on `ParseError` and decide
//! per-kind whether to drop, count or log a record.

use thiserror::Error;

/// Errors raised while recognising a `<PRI>` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriorityError {
    #[error("priority field does not start with '<'")]
    NoStart,
    #[error("priority field is empty")]
    Empty,
    #[error("priority field has no closing '>'")]
    NoEnd,
    #[error("priority field is shorter than expected")]
    TooShort,
    #[error("priority field has more than 4 digits")]
    TooLong,
    #[error("priority field contains a non-digit byte")]
    NonDigit,
}

/// Errors raised by primitives shared between both grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Doubles as the normal "nothing left to read" sentinel for
    /// `parse_content` and as a genuine error for bounded-width primitives
    /// that run out of input before they're satisfied.
    #[error("unexpected end of record")]
    Eol,
    #[error("expected a space separator")]
    NoSpace,
    #[error("hostname field is empty")]
    HostnameTooShort,
}

/// Errors raised parsing an RFC 5424 `DATE-TIME`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("year is not a 4-digit number")]
    YearInvalid,
    #[error("month is out of range 01-12")]
    MonthInvalid,
    #[error("day is out of range 01-31")]
    DayInvalid,
    #[error("hour is out of range 00-23")]
    HourInvalid,
    #[error("minute is out of range 00-59")]
    MinuteInvalid,
    #[error("second is out of range 00-59")]
    SecondInvalid,
    #[error("fractional seconds field is malformed")]
    SecFracInvalid,
    #[error("timezone offset is malformed")]
    TimeZoneInvalid,
    #[error("timestamp does not match any known layout")]
    InvalidTimeFormat,
    #[error("timestamp format could not be determined")]
    TimestampUnknownFormat,
}

/// Errors raised parsing the RFC 5424 trailer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("app-name exceeds the maximum field width")]
    InvalidAppName,
    #[error("procid exceeds the maximum field width")]
    InvalidProcId,
    #[error("msgid exceeds the maximum field width")]
    InvalidMsgId,
    #[error("structured data block has no terminator")]
    NoStructuredData,
}

/// Errors raised by the `VERSION` primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version digit not found")]
    VersionNotFound,
}

/// Errors raised extracting a framed record from a connection buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FramingError {
    /// Not a parse failure: the caller should wait for more bytes.
    #[error("record is not yet fully buffered")]
    Incomplete,
    #[error("framing prefix is not a valid length")]
    FramingInvalid,
}

/// The union of every error a record parser can report.
///
/// A parser always returns its best-effort `Record` alongside an
/// `Option<ParseError>` rather than a bare `Result` — a record with an
/// error populated is still handed to the caller's handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Priority(#[from] PriorityError),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Version(#[from] VersionError),
}
