//! A single recurring validity window ("opening hours").
//!
//! An interval has an optional start date, an optional end date, optional
//! start and end clock times, and a set of weekdays it applies to. For
//! example, weekday mornings from 10 to 20:
//!
//! ```
//! use chrono::Weekday;
//! use timetable::{ClockTime, Interval};
//!
//! let opening_hours = Interval::builder()
//!     .clock(ClockTime::utc(10, 0).unwrap(), ClockTime::utc(20, 0).unwrap())
//!     .weekdays([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri])
//!     .build();
//! assert!(opening_hours.start_date().is_none());
//! ```

use crate::clock::ClockTime;
use crate::week::WeekdaySet;
use chrono::{DateTime, Datelike, Weekday};
use chrono_tz::Tz;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    label: Option<String>,
    start_date: Option<DateTime<Tz>>,
    end_date: Option<DateTime<Tz>>,
    start_clock: ClockTime,
    end_clock: ClockTime,
    weekdays: WeekdaySet,
}

impl Default for Interval {
    fn default() -> Self {
        Self {
            label: None,
            start_date: None,
            end_date: None,
            start_clock: ClockTime::default(),
            end_clock: ClockTime::default(),
            weekdays: WeekdaySet::ALL,
        }
    }
}

impl Interval {
    /// A permanently valid interval: every weekday, no date or clock bound.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> IntervalBuilder {
        IntervalBuilder::default()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn start_date(&self) -> Option<&DateTime<Tz>> {
        self.start_date.as_ref()
    }

    pub fn end_date(&self) -> Option<&DateTime<Tz>> {
        self.end_date.as_ref()
    }

    pub fn start_clock(&self) -> ClockTime {
        self.start_clock
    }

    pub fn end_clock(&self) -> ClockTime {
        self.end_clock
    }

    pub fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    /// Clock filtering applies as soon as either bound is non-zero.
    pub fn has_clock_bounds(&self) -> bool {
        !self.start_clock.is_zero() || !self.end_clock.is_zero()
    }

    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        if !self.weekdays.contains_day(instant.weekday()) {
            return false;
        }

        if self.start_date.as_ref().is_some_and(|start| instant < start) {
            return false;
        }

        if self.end_date.as_ref().is_some_and(|end| instant > end) {
            return false;
        }

        if self.has_clock_bounds() {
            let clock = ClockTime::from_instant(instant);
            if clock.before(&self.start_clock) || clock.after(&self.end_clock) {
                return false;
            }
        }

        true
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "{label}: ")?;
        }
        match (&self.start_date, &self.end_date) {
            (None, None) => f.write_str("any date")?,
            (Some(start), None) => write!(f, "from {}", start.to_rfc3339())?,
            (None, Some(end)) => write!(f, "until {}", end.to_rfc3339())?,
            (Some(start), Some(end)) => {
                write!(f, "from {} to {}", start.to_rfc3339(), end.to_rfc3339())?
            }
        }
        if self.has_clock_bounds() {
            write!(f, ", {:#} to {:#}", self.start_clock, self.end_clock)?;
        } else {
            f.write_str(", any time")?;
        }
        if self.weekdays == WeekdaySet::ALL {
            f.write_str(", every day")
        } else {
            write!(f, ", on {}", self.weekdays)
        }
    }
}

/// Fluent construction of an [`Interval`]. Every setter is optional; an
/// unconfigured builder yields [`Interval::default`].
#[derive(Debug, Clone, Default)]
pub struct IntervalBuilder {
    interval: Interval,
}

impl IntervalBuilder {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.interval.label = Some(label.into());
        self
    }

    pub fn start_date(mut self, start: DateTime<Tz>) -> Self {
        self.interval.start_date = Some(start);
        self
    }

    pub fn end_date(mut self, end: DateTime<Tz>) -> Self {
        self.interval.end_date = Some(end);
        self
    }

    /// Restrict the interval to the inclusive clock range `start..=end`.
    pub fn clock(self, start: ClockTime, end: ClockTime) -> Self {
        self.start_clock(start).end_clock(end)
    }

    pub fn start_clock(mut self, start: ClockTime) -> Self {
        self.interval.start_clock = start;
        self
    }

    pub fn end_clock(mut self, end: ClockTime) -> Self {
        self.interval.end_clock = end;
        self
    }

    pub fn weekdays<I>(mut self, weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        self.interval.weekdays = WeekdaySet::new(weekdays);
        self
    }

    pub fn weekday_set(mut self, weekdays: WeekdaySet) -> Self {
        self.interval.weekdays = weekdays;
        self
    }

    pub fn build(self) -> Interval {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn end_clock_alone_activates_clock_filter() {
        let interval = Interval::builder()
            .end_clock(ClockTime::utc(6, 0).unwrap())
            .build();
        assert!(interval.has_clock_bounds());

        let early = Tz::UTC.with_ymd_and_hms(2024, 3, 4, 5, 59, 0).unwrap();
        let late = Tz::UTC.with_ymd_and_hms(2024, 3, 4, 6, 1, 0).unwrap();
        assert!(interval.contains(&early));
        assert!(!interval.contains(&late));
    }

    #[test]
    fn display_summarises_restrictions() {
        let interval = Interval::builder()
            .label("morning")
            .clock(ClockTime::utc(8, 0).unwrap(), ClockTime::utc(12, 0).unwrap())
            .weekdays([Weekday::Mon, Weekday::Sat])
            .build();
        assert_eq!(
            interval.to_string(),
            "morning: any date, 08:00 UTC to 12:00 UTC, on Mondays, Saturdays"
        );
        assert_eq!(Interval::new().to_string(), "any date, any time, every day");
    }
}
