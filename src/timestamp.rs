//! Timestamp grammars for both record parsers.
//!
//! RFC 3164 timestamps come in two shapes and the wrong guess order is
//! expensive (a bad dest-layout attempt can partially match a different
//! input); RFC 5424 timestamps are a single strict `DATE-TIME` grammar with
//! per-field bounds.

use chrono::prelude::*;
use chrono::Duration;

use crate::cursor::ParseCursor;
use crate::error::TimestampError;

/// month,day,hour,minute,second — RFC 3164's `Stamp` layout carries no year.
pub type IncompleteDate = (u32, u32, u32, u32, u32);

fn parse_month(b: &[u8]) -> Option<u32> {
    if b.len() != 3 {
        return None;
    }
    let mut lower = [0u8; 3];
    for (i, &c) in b.iter().enumerate() {
        lower[i] = c.to_ascii_lowercase();
    }
    match &lower {
        b"jan" => Some(1),
        b"feb" => Some(2),
        b"mar" => Some(3),
        b"apr" => Some(4),
        b"may" => Some(5),
        b"jun" => Some(6),
        b"jul" => Some(7),
        b"aug" => Some(8),
        b"sep" => Some(9),
        b"oct" => Some(10),
        b"nov" => Some(11),
        b"dec" => Some(12),
        _ => None,
    }
}

fn digit(b: u8) -> Option<u32> {
    if b.is_ascii_digit() {
        Some((b - b'0') as u32)
    } else {
        None
    }
}

fn two_digits(a: u8, b: u8) -> Option<u32> {
    Some(digit(a)? * 10 + digit(b)?)
}

/// Fixed-width `Mmm dd hh:mm:ss` (15 bytes). The day is space-padded when
/// single-digit, matching Go's `time.Stamp` reference layout.
fn try_parse_stamp(b: &[u8]) -> Option<IncompleteDate> {
    if b.len() != 15 {
        return None;
    }
    let month = parse_month(&b[0..3])?;
    if b[3] != b' ' {
        return None;
    }
    let day = if b[4] == b' ' {
        digit(b[5])?
    } else {
        two_digits(b[4], b[5])?
    };
    if b[6] != b' ' {
        return None;
    }
    let hour = two_digits(b[7], b[8])?;
    if b[9] != b':' {
        return None;
    }
    let minute = two_digits(b[10], b[11])?;
    if b[12] != b':' {
        return None;
    }
    let second = two_digits(b[13], b[14])?;
    Some((month, day, hour, minute, second))
}

fn try_parse_rfc3339(b: &[u8]) -> Option<DateTime<FixedOffset>> {
    let s = std::str::from_utf8(b).ok()?;
    DateTime::parse_from_rfc3339(s).ok()
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days elapsed before the first of `month` (1-indexed) in `year`.
fn days_before_month(year: i32, month: u32) -> i64 {
    const CUMULATIVE: [i64; 13] = [0, 0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
    let mut days = CUMULATIVE[month.clamp(1, 12) as usize];
    if month > 2 && is_leap_year(year) {
        days += 1;
    }
    days
}

/// Builds a local date-time from raw calendar fields without ever panicking,
/// regardless of whether `month`/`day`/`hour`/`minute`/`second` are in their
/// normal ranges: out-of-range fields roll forward into the following
/// calendar unit (`Feb 30` becomes `Mar 1` or `Mar 2` depending on the leap
/// year), the same normalization `time.Date` performs in the reference
/// implementation this grammar is ported from. `NaiveDate::from_ymd_opt` on
/// `year, 1, 1` never fails, so the whole offset is then added as a
/// `Duration` rather than constructed field-by-field.
fn build_local_datetime(offset: FixedOffset, year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32, nanos: u32) -> DateTime<FixedOffset> {
    let jan_first = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let days_into_year = days_before_month(year, month) + i64::from(day) - 1;
    let naive = jan_first
        + Duration::days(days_into_year)
        + Duration::hours(i64::from(hour))
        + Duration::minutes(i64::from(minute))
        + Duration::seconds(i64::from(second))
        + Duration::nanoseconds(i64::from(nanos));
    offset
        .from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| offset.from_utc_datetime(&naive))
}

fn with_year(date: IncompleteDate, year: i32) -> DateTime<FixedOffset> {
    let (month, day, hour, minute, second) = date;
    build_local_datetime(FixedOffset::west(0), year, month, day, hour, minute, second, 0)
}

/// Parses the RFC 3164 `TIMESTAMP` at the cursor. Tries `Mmm dd hh:mm:ss`
/// and RFC3339, in an order that depends on the current byte: if it's an
/// ASCII digit strictly between `'0'` and `'9'` (matching the source's own
/// `c > '0' && c < '9'` check), RFC3339 is tried first since a leading year
/// digit makes that the likelier layout. Leaves the cursor untouched on
/// failure — the caller is responsible for any fall-back rewind.
pub fn parse_3164_timestamp<F>(cursor: &mut ParseCursor<'_>, get_year: F) -> Result<DateTime<FixedOffset>, TimestampError>
where
    F: Fn() -> i32,
{
    let start = cursor.pos;
    let first = cursor.buf.get(start).copied();
    let rfc3339_first = matches!(first, Some(b) if b > b'0' && b < b'9');

    let try_stamp = |cursor: &mut ParseCursor<'_>| -> Option<DateTime<FixedOffset>> {
        if start + 15 > cursor.len {
            return None;
        }
        let date = try_parse_stamp(&cursor.buf[start..start + 15])?;
        cursor.pos = start + 15;
        Some(with_year(date, get_year()))
    };

    let try_3339 = |cursor: &mut ParseCursor<'_>| -> Option<DateTime<FixedOffset>> {
        let end = cursor.find_next_space(start).map(|s| s - 1).unwrap_or(cursor.len);
        if end <= start {
            return None;
        }
        let ts = try_parse_rfc3339(&cursor.buf[start..end])?;
        cursor.pos = end;
        Some(if ts.year() == 0 {
            with_year((ts.month(), ts.day(), ts.hour(), ts.minute(), ts.second()), get_year())
        } else {
            ts
        })
    };

    let result = if rfc3339_first {
        try_3339(cursor).or_else(|| try_stamp(cursor))
    } else {
        try_stamp(cursor).or_else(|| try_3339(cursor))
    };

    match result {
        Some(ts) => {
            cursor.skip_byte(b' ');
            Ok(ts)
        }
        None => {
            cursor.pos = start;
            Err(TimestampError::TimestampUnknownFormat)
        }
    }
}

/// The current instant, truncated to whole seconds, for use as a fallback
/// timestamp when a record's own timestamp can't be parsed.
pub fn now_truncated_to_seconds() -> DateTime<FixedOffset> {
    let now = Utc::now().with_timezone(&FixedOffset::east(0));
    FixedOffset::east(0)
        .ymd(now.year(), now.month(), now.day())
        .and_hms(now.hour(), now.minute(), now.second())
}

/// Parses an RFC 5424 `DATE-TIME` (the non-nil case; the caller handles the
/// single `'-'` nil value separately).
pub fn parse_5424_timestamp(cursor: &mut ParseCursor<'_>) -> Result<DateTime<FixedOffset>, TimestampError> {
    let start = cursor.pos;

    let year = cursor
        .parse_ndigits(4, 0, 9999)
        .map_err(|_| TimestampError::YearInvalid)?;
    if !cursor.skip_byte(b'-') {
        cursor.pos = start;
        return Err(TimestampError::InvalidTimeFormat);
    }
    let month = cursor.parse_2digits(1, 12).map_err(|_| TimestampError::MonthInvalid)?;
    if !cursor.skip_byte(b'-') {
        cursor.pos = start;
        return Err(TimestampError::InvalidTimeFormat);
    }
    let day = cursor.parse_2digits(1, 31).map_err(|_| TimestampError::DayInvalid)?;
    if !cursor.skip_byte(b'T') {
        cursor.pos = start;
        return Err(TimestampError::InvalidTimeFormat);
    }
    let hour = cursor.parse_2digits(0, 23).map_err(|_| TimestampError::HourInvalid)?;
    if !cursor.skip_byte(b':') {
        cursor.pos = start;
        return Err(TimestampError::InvalidTimeFormat);
    }
    let minute = cursor.parse_2digits(0, 59).map_err(|_| TimestampError::MinuteInvalid)?;
    if !cursor.skip_byte(b':') {
        cursor.pos = start;
        return Err(TimestampError::InvalidTimeFormat);
    }
    let second = cursor.parse_2digits(0, 59).map_err(|_| TimestampError::SecondInvalid)?;

    let mut nanos: u32 = 0;
    if cursor.skip_byte(b'.') {
        let frac_start = cursor.pos;
        let mut i = frac_start;
        while i < cursor.len && cursor.buf[i].is_ascii_digit() && i - frac_start < 6 {
            i += 1;
        }
        if i == frac_start {
            cursor.pos = start;
            return Err(TimestampError::SecFracInvalid);
        }
        let digits = &cursor.buf[frac_start..i];
        let mut padded = [b'0'; 9];
        padded[..digits.len()].copy_from_slice(digits);
        nanos = std::str::from_utf8(&padded).unwrap().parse().unwrap_or(0);
        cursor.pos = i;
    }

    let offset = if cursor.skip_byte(b'Z') {
        FixedOffset::east(0)
    } else {
        let sign = match cursor.buf.get(cursor.pos) {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => {
                cursor.pos = start;
                return Err(TimestampError::TimeZoneInvalid);
            }
        };
        cursor.pos += 1;
        let off_hour = cursor.parse_2digits(0, 23).map_err(|_| TimestampError::TimeZoneInvalid)?;
        if !cursor.skip_byte(b':') {
            cursor.pos = start;
            return Err(TimestampError::TimeZoneInvalid);
        }
        let off_minute = cursor.parse_2digits(0, 59).map_err(|_| TimestampError::TimeZoneInvalid)?;
        let seconds = (off_hour as i32 * 3600 + off_minute as i32 * 60) * sign;
        if sign >= 0 {
            FixedOffset::east(seconds)
        } else {
            FixedOffset::west(-seconds)
        }
    };

    Ok(build_local_datetime(offset, year as i32, month, day, hour, minute, second, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_no_year_parses() {
        let mut c = ParseCursor::new(b"Dec 28 16:49:07 rest");
        let ts = parse_3164_timestamp(&mut c, || 2019).unwrap();
        assert_eq!((ts.month(), ts.day(), ts.hour(), ts.minute(), ts.second()), (12, 28, 16, 49, 7));
        assert_eq!(ts.year(), 2019);
        assert_eq!(c.pos, "Dec 28 16:49:07 ".len());
    }

    #[test]
    fn stamp_single_digit_day() {
        let mut c = ParseCursor::new(b"Oct  1 22:14:15 rest");
        let ts = parse_3164_timestamp(&mut c, || 2024).unwrap();
        assert_eq!(ts.day(), 1);
    }

    #[test]
    fn rfc3339_embedded_in_3164_parses() {
        let mut c = ParseCursor::new(b"2003-10-11T22:14:15Z h rest");
        let ts = parse_3164_timestamp(&mut c, || 2024).unwrap();
        assert_eq!(ts.year(), 2003);
        assert_eq!(ts.month(), 10);
    }

    #[test]
    fn unknown_layout_leaves_cursor_untouched() {
        let mut c = ParseCursor::new(b"not-a-timestamp h rest");
        let start = c.pos;
        assert_eq!(parse_3164_timestamp(&mut c, || 2024), Err(TimestampError::TimestampUnknownFormat));
        assert_eq!(c.pos, start);
    }

    #[test]
    fn no_calendar_validation_for_3164() {
        // Never rejected outright: an invalid calendar date rolls forward
        // instead of failing the parse. 2024 is a leap year, so day 60 of
        // the year (Jan 31 + Feb 29 + 0) lands on March 1.
        let mut c = ParseCursor::new(b"Feb 30 10:00:00 rest");
        let ts = parse_3164_timestamp(&mut c, || 2024).unwrap();
        assert_eq!((ts.month(), ts.day()), (3, 1));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (10, 0, 0));
    }

    #[test]
    fn no_calendar_validation_for_5424() {
        // April has 30 days; day 31 rolls into May 1.
        let mut c = ParseCursor::new(b"2003-04-31T10:00:00Z rest");
        let ts = parse_5424_timestamp(&mut c).unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2003, 5, 1));
    }

    #[test]
    fn parses_5424_timestamp_with_fraction_and_offset() {
        let mut c = ParseCursor::new(b"2003-10-11T22:14:15.003-07:00 rest");
        let ts = parse_5424_timestamp(&mut c).unwrap();
        assert_eq!(ts.year(), 2003);
        assert_eq!(ts.timestamp_subsec_nanos(), 3_000_000);
    }

    #[test]
    fn parses_5424_timestamp_utc() {
        let mut c = ParseCursor::new(b"2003-10-11T22:14:15Z rest");
        let ts = parse_5424_timestamp(&mut c).unwrap();
        assert_eq!(ts.hour(), 22);
        assert_eq!(c.pos, "2003-10-11T22:14:15Z".len());
    }

    #[test]
    fn rejects_out_of_range_month() {
        let mut c = ParseCursor::new(b"2003-13-11T22:14:15Z rest");
        assert_eq!(parse_5424_timestamp(&mut c), Err(TimestampError::MonthInvalid));
    }
}
