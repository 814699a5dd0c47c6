use super::{PersistenceError, PersistenceResult};
use crate::config::TimetableConfig;
use crate::{ClockTime, Interval, Timetable, WeekdaySet};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub fn save_timetable_to_json<P: AsRef<Path>>(
    timetable: &Timetable,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &TimetableConfig::from(timetable))?;
    tracing::debug!(
        path = %path.as_ref().display(),
        intervals = timetable.len(),
        "timetable saved as json"
    );
    Ok(())
}

pub fn load_timetable_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Timetable> {
    let file = File::open(path.as_ref())?;
    let config: TimetableConfig = serde_json::from_reader(file)?;
    let timetable = config.to_timetable();
    tracing::debug!(
        path = %path.as_ref().display(),
        intervals = timetable.len(),
        "timetable loaded from json"
    );
    Ok(timetable)
}

#[derive(Default, Serialize, Deserialize)]
struct IntervalCsvRecord {
    label: String,
    start_date: String,
    end_date: String,
    start_clock: String,
    end_clock: String,
    weekdays: String,
}

impl From<&Interval> for IntervalCsvRecord {
    fn from(interval: &Interval) -> Self {
        Self {
            label: interval.label().unwrap_or_default().to_string(),
            start_date: format_date(interval.start_date()),
            end_date: format_date(interval.end_date()),
            start_clock: format_clock(interval.start_clock()),
            end_clock: format_clock(interval.end_clock()),
            weekdays: interval.weekdays().to_bitstring(),
        }
    }
}

impl IntervalCsvRecord {
    fn into_interval(self) -> PersistenceResult<Interval> {
        let mut builder = Interval::builder()
            .weekday_set(self.weekdays.trim().parse::<WeekdaySet>()?);
        if !self.label.trim().is_empty() {
            builder = builder.label(self.label);
        }
        if let Some(start) = parse_date(&self.start_date)? {
            builder = builder.start_date(start);
        }
        if let Some(end) = parse_date(&self.end_date)? {
            builder = builder.end_date(end);
        }
        if let Some(start) = parse_clock(&self.start_clock)? {
            builder = builder.start_clock(start);
        }
        if let Some(end) = parse_clock(&self.end_clock)? {
            builder = builder.end_clock(end);
        }
        Ok(builder.build())
    }
}

pub fn save_timetable_to_csv<P: AsRef<Path>>(
    timetable: &Timetable,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for interval in timetable {
        writer.serialize(IntervalCsvRecord::from(interval))?;
    }
    writer.flush()?;
    tracing::debug!(
        path = %path.as_ref().display(),
        intervals = timetable.len(),
        "timetable saved as csv"
    );
    Ok(())
}

pub fn load_timetable_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Timetable> {
    let file = File::open(path.as_ref())?;
    let mut reader = csv::Reader::from_reader(file);
    let mut timetable = Timetable::new();
    for record in reader.deserialize::<IntervalCsvRecord>() {
        timetable.push(record?.into_interval()?);
    }
    tracing::debug!(
        path = %path.as_ref().display(),
        intervals = timetable.len(),
        "timetable loaded from csv"
    );
    Ok(timetable)
}

fn format_date(date: Option<&DateTime<Tz>>) -> String {
    date.map(|d| d.to_rfc3339()).unwrap_or_default()
}

pub(crate) fn parse_date(input: &str) -> PersistenceResult<Option<DateTime<Tz>>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(input.trim())
        .map(|d| Some(d.with_timezone(&Tz::UTC)))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_clock(clock: ClockTime) -> String {
    if clock.is_zero() {
        String::new()
    } else {
        format!("{clock:#}")
    }
}

fn parse_clock(input: &str) -> PersistenceResult<Option<ClockTime>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(input.trim().parse()?))
}
