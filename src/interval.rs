//! Closed date intervals: the shape of every claim against a resource.
//!
//! Both ends are inclusive and compared at day granularity.
//! An interval whose end precedes its start is clamped to a single day at
//! `start`, both when constructed and when deserialized from a snapshot.
//!
//! Snapshot dates may carry a time of day or an offset. Only the calendar
//! day is kept; instants are reduced to their UTC date.

use jiff::{ToSpan, Timestamp, civil::Date, tz::TimeZone};
use serde::{Deserialize, Deserializer, Serialize, de};

/// An inclusive `[start, end]` range of calendar days. Always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Bounds", into = "Bounds")]
pub struct Interval {
    start: Date,
    end: Date,
}

/// Wire form of an interval, before clamping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Bounds {
    #[serde(deserialize_with = "deserialize_day")]
    start: Date,
    #[serde(deserialize_with = "deserialize_day")]
    end: Date,
}

impl From<Bounds> for Interval {
    fn from(b: Bounds) -> Self {
        Self::new(b.start, b.end)
    }
}

impl From<Interval> for Bounds {
    fn from(i: Interval) -> Self {
        Self {
            start: i.start,
            end: i.end,
        }
    }
}

impl Interval {
    /// Creates an interval, clamping an inverted range to the single day `start`.
    pub fn new(start: Date, end: Date) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// A one-day interval.
    pub fn day(day: Date) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    /// Whether the two intervals share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Number of days covered, counting both ends. Never less than 1.
    pub fn day_count(&self) -> i64 {
        let between = self
            .start
            .until(self.end)
            .map_or(0, |span| i64::from(span.get_days()));
        between.max(0) + 1
    }

    /// Every day in the interval, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        self.start.series(1.day()).take_while(move |d| *d <= end)
    }
}

/// Whether `a` and `b` share at least one day.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
    a.overlaps(b)
}

/// Reads the calendar day out of a date, a civil datetime, or a timestamp.
///
/// `2025-01-04`, `2025-01-04T18:00:00` and `2025-01-04T18:00:00.000Z` all
/// give 4 January 2025. Timestamps are taken in UTC.
pub fn parse_day(s: &str) -> Result<Date, jiff::Error> {
    match s.parse::<Timestamp>() {
        Ok(ts) => Ok(ts.to_zoned(TimeZone::UTC).date()),
        Err(_) => s.parse::<Date>(),
    }
}

/// Serde adapter for [`parse_day`], for date fields in snapshot records.
pub fn deserialize_day<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_day(&s).map_err(de::Error::custom)
}
