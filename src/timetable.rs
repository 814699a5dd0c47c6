//! A recurring schedule built as the union of zero or more intervals.
//!
//! ```
//! use chrono::{TimeZone, Weekday};
//! use chrono_tz::Tz;
//! use timetable::{ClockTime, Interval, Timetable};
//!
//! let workdays = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
//! let opening_hours: Timetable = [
//!     Interval::builder()
//!         .clock(ClockTime::utc(8, 0).unwrap(), ClockTime::utc(12, 0).unwrap())
//!         .weekdays(workdays)
//!         .build(),
//!     Interval::builder()
//!         .clock(ClockTime::utc(14, 30).unwrap(), ClockTime::utc(19, 30).unwrap())
//!         .weekdays(workdays)
//!         .build(),
//! ]
//! .into_iter()
//! .collect();
//!
//! let lunch_break = Tz::UTC.with_ymd_and_hms(2019, 11, 8, 13, 0, 0).unwrap();
//! assert!(!opening_hours.contains(&lunch_break));
//! ```

use crate::interval::Interval;
use chrono::DateTime;
use chrono_tz::Tz;
use rayon::prelude::*;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timetable {
    intervals: Vec<Interval>,
}

impl Timetable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.intervals.push(interval);
        self
    }

    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// True when at least one interval contains `instant`. An empty
    /// timetable contains nothing.
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.intervals.iter().any(|interval| interval.contains(instant))
    }

    /// The first interval, in insertion order, that contains `instant`.
    pub fn matching_interval(&self, instant: &DateTime<Tz>) -> Option<(usize, &Interval)> {
        self.intervals
            .iter()
            .enumerate()
            .find(|(_, interval)| interval.contains(instant))
    }

    /// Evaluates [`Timetable::contains`] for every instant in parallel.
    /// Results keep the input order.
    pub fn contains_each(&self, instants: &[DateTime<Tz>]) -> Vec<bool> {
        instants
            .par_iter()
            .map(|instant| self.contains(instant))
            .collect()
    }
}

impl fmt::Display for Timetable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return f.write_str("(no intervals)");
        }
        for (idx, interval) in self.intervals.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "#{idx} {interval}")?;
        }
        Ok(())
    }
}

impl FromIterator<Interval> for Timetable {
    fn from_iter<T: IntoIterator<Item = Interval>>(iter: T) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}

impl Extend<Interval> for Timetable {
    fn extend<T: IntoIterator<Item = Interval>>(&mut self, iter: T) {
        self.intervals.extend(iter);
    }
}

impl IntoIterator for Timetable {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.into_iter()
    }
}

impl<'a> IntoIterator for &'a Timetable {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}
