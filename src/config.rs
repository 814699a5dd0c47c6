use crate::{ClockTime, Interval, Timetable, WeekdaySet};
use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Serializable description of an [`Interval`]. Absent or `null` fields keep
/// the interval defaults (unbounded dates, no clock bound, every weekday).
///
/// `null` is only accepted here, through the `Option` fields; a bare
/// [`ClockTime`] or [`WeekdaySet`] still rejects it when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_clock: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_clock: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekdays: Option<WeekdaySet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableConfig {
    #[serde(default)]
    pub intervals: Vec<IntervalConfig>,
}

impl IntervalConfig {
    pub fn to_interval(&self) -> Interval {
        let mut builder = Interval::builder();
        if let Some(label) = &self.label {
            builder = builder.label(label.clone());
        }
        if let Some(start) = self.start_date {
            builder = builder.start_date(start.with_timezone(&Tz::UTC));
        }
        if let Some(end) = self.end_date {
            builder = builder.end_date(end.with_timezone(&Tz::UTC));
        }
        if let Some(start) = self.start_clock {
            builder = builder.start_clock(start);
        }
        if let Some(end) = self.end_clock {
            builder = builder.end_clock(end);
        }
        if let Some(weekdays) = self.weekdays {
            builder = builder.weekday_set(weekdays);
        }
        builder.build()
    }
}

impl From<&Interval> for IntervalConfig {
    fn from(interval: &Interval) -> Self {
        let clock = |value: ClockTime| (!value.is_zero()).then_some(value);
        Self {
            label: interval.label().map(str::to_string),
            start_date: interval.start_date().map(|date| date.fixed_offset()),
            end_date: interval.end_date().map(|date| date.fixed_offset()),
            start_clock: clock(interval.start_clock()),
            end_clock: clock(interval.end_clock()),
            weekdays: (interval.weekdays() != WeekdaySet::ALL).then_some(interval.weekdays()),
        }
    }
}

impl TimetableConfig {
    pub fn to_timetable(&self) -> Timetable {
        self.intervals.iter().map(IntervalConfig::to_interval).collect()
    }
}

impl From<&Timetable> for TimetableConfig {
    fn from(timetable: &Timetable) -> Self {
        Self {
            intervals: timetable.iter().map(IntervalConfig::from).collect(),
        }
    }
}
