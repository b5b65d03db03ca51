use crate::day::days_through;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;
use time::{format_description::FormatItem, macros::format_description, Date};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Separator between the endpoints of a range in its textual form
const RANGE_SEP: &str = "..";

/// An inclusive span of calendar days.
///
/// The endpoints are sorted on construction, so `start() <= end()` always
/// holds no matter which order the caller supplied them in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(a: Date, b: Date) -> DateRange {
        if a <= b {
            DateRange { start: a, end: b }
        } else {
            DateRange { start: b, end: a }
        }
    }

    /// A range covering exactly one day
    pub fn single(date: Date) -> DateRange {
        DateRange {
            start: date,
            end: date,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    /// Every calendar year the range touches
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start.year()..=self.end.year()
    }

    pub fn days(&self) -> impl Iterator<Item = Date> {
        days_through(self.start, self.end)
    }

    /// Convert to an entry, collapsing a one-day range into a point
    pub fn to_entry(self) -> DateEntry {
        if self.is_single_day() {
            DateEntry::Point(self.start)
        } else {
            DateEntry::Range(self)
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{RANGE_SEP}{}", self.start, self.end)
    }
}

/// A disabled (or queried) item: either a single day or a span of days
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum DateEntry {
    Point(Date),
    Range(DateRange),
}

impl DateEntry {
    /// The days covered by the entry, expressed as a range
    pub fn span(&self) -> DateRange {
        match self {
            DateEntry::Point(date) => DateRange::single(*date),
            DateEntry::Range(range) => *range,
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.span().contains(date)
    }
}

impl From<Date> for DateEntry {
    fn from(date: Date) -> DateEntry {
        DateEntry::Point(date)
    }
}

impl From<DateRange> for DateEntry {
    fn from(range: DateRange) -> DateEntry {
        DateEntry::Range(range)
    }
}

impl fmt::Display for DateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateEntry::Point(date) => write!(f, "{date}"),
            DateEntry::Range(range) => write!(f, "{range}"),
        }
    }
}

impl FromStr for DateEntry {
    type Err = ParseEntryError;

    /// Parse `YYYY-MM-DD` as a point or `YYYY-MM-DD..YYYY-MM-DD` as a range.
    /// Range endpoints may be given in either order.
    fn from_str(s: &str) -> Result<DateEntry, ParseEntryError> {
        let s = s.trim();
        match s.split_once(RANGE_SEP) {
            Some((a, b)) => Ok(DateEntry::Range(DateRange::new(
                parse_date(a)?,
                parse_date(b)?,
            ))),
            None => parse_date(s).map(DateEntry::Point),
        }
    }
}

fn parse_date(s: &str) -> Result<Date, ParseEntryError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ParseEntryError::MissingDate);
    }
    Date::parse(s, &YMD_FMT).map_err(|source| ParseEntryError::InvalidDate {
        input: s.to_owned(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ParseEntryError {
    #[error("missing date in entry")]
    MissingDate,
    #[error("invalid date {input:?}; expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        source: time::error::Parse,
    },
}
