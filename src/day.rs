use std::fmt;
use std::iter::successors;
use time::Date;

/// Length of one calendar day in milliseconds
pub const DAY_MS: i64 = 86_400_000;

/// Julian day number of 1970-01-01
const UNIX_EPOCH_JULIAN_DAY: i64 = 2_440_588;

/// Milliseconds between 1970-01-01T00:00Z and the start of a calendar day.
///
/// A `DayStamp` is always a multiple of [`DAY_MS`].  No timezone or
/// daylight-saving offset is ever applied, so consecutive days are exactly one
/// `DAY_MS` apart.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DayStamp(i64);

impl DayStamp {
    pub fn of(date: Date) -> DayStamp {
        DayStamp((i64::from(date.to_julian_day()) - UNIX_EPOCH_JULIAN_DAY) * DAY_MS)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    /// The stamp of the following day
    pub fn next(self) -> DayStamp {
        DayStamp(self.0 + DAY_MS)
    }
}

impl From<Date> for DayStamp {
    fn from(date: Date) -> DayStamp {
        DayStamp::of(date)
    }
}

/// Key identifying a day within its year, as used for annual marks.
///
/// Displays as `{month}_{day}`, e.g. `2_29`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AnnualMarkKey {
    month: u8,
    day: u8,
}

impl AnnualMarkKey {
    pub fn of(date: Date) -> AnnualMarkKey {
        AnnualMarkKey {
            month: u8::from(date.month()),
            day: date.day(),
        }
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl fmt::Display for AnnualMarkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.month, self.day)
    }
}

/// Iterate over the days from `start` through `end`, inclusive.  Yields
/// nothing if `start > end`.
pub fn days_through(start: Date, end: Date) -> impl Iterator<Item = Date> {
    successors(Some(start), |&d| d.next_day()).take_while(move |&d| d <= end)
}

/// Iterate over every day of `year`.  Yields nothing if the year is outside
/// the range supported by [`time::Date`].
pub fn days_of_year(year: i32) -> impl Iterator<Item = Date> {
    successors(Date::from_ordinal_date(year, 1).ok(), |&d| d.next_day())
        .take_while(move |d| d.year() == year)
}
