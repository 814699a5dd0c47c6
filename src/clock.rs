use chrono::{DateTime, NaiveDate, TimeZone, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("hour {0} out of range (must be between 0 and 23)")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range (must be between 0 and 59)")]
    MinuteOutOfRange(u32),
    #[error("invalid clock {0:?} (expected \"HH:MM\" or \"HH:MM <zone>\")")]
    Format(String),
    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),
}

/// A time of day (hour and minute) in a specific timezone.
///
/// Ordering through [`ClockTime::before`] and [`ClockTime::after`] compares
/// the raw hour/minute fields and ignores the zone; normalize both operands
/// with [`ClockTime::with_timezone`] first when they may differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
    zone: Tz,
}

impl Default for ClockTime {
    fn default() -> Self {
        Self {
            hour: 0,
            minute: 0,
            zone: Tz::UTC,
        }
    }
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32, zone: Tz) -> Result<Self, ClockError> {
        if hour > 23 {
            return Err(ClockError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(ClockError::MinuteOutOfRange(minute));
        }
        Ok(Self { hour, minute, zone })
    }

    pub fn utc(hour: u32, minute: u32) -> Result<Self, ClockError> {
        Self::new(hour, minute, Tz::UTC)
    }

    /// Local hour and minute of `instant` in its own timezone.
    pub fn from_instant(instant: &DateTime<Tz>) -> Self {
        Self {
            hour: instant.hour(),
            minute: instant.minute(),
            zone: instant.timezone(),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// 00:00 in any zone. Intervals read this as "no clock bound".
    pub fn is_zero(&self) -> bool {
        self.hour == 0 && self.minute == 0
    }

    pub fn before(&self, other: &ClockTime) -> bool {
        (self.hour, self.minute) < (other.hour, other.minute)
    }

    pub fn after(&self, other: &ClockTime) -> bool {
        (self.hour, self.minute) > (other.hour, other.minute)
    }

    /// The same wall-clock moment expressed in `zone`, evaluated on the
    /// reference date 2000-01-01.
    pub fn with_timezone(&self, zone: Tz) -> ClockTime {
        Self::from_instant(&self.reference_instant().with_timezone(&zone))
    }

    fn reference_instant(&self) -> DateTime<Tz> {
        let naive = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, 0))
            .unwrap_or_default();
        self.zone
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| self.zone.from_utc_datetime(&naive))
    }

    fn parse_zone(name: &str) -> Result<Tz, ClockError> {
        match name {
            "Z" | "UTC" => Ok(Tz::UTC),
            _ => name
                .parse::<Tz>()
                .map_err(|_| ClockError::UnknownTimezone(name.to_string())),
        }
    }

    fn parse_two_digits(field: &str, raw: &str) -> Result<u32, ClockError> {
        if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClockError::Format(raw.to_string()));
        }
        field
            .parse()
            .map_err(|_| ClockError::Format(raw.to_string()))
    }
}

/// `{}` renders the canonical `HH:MM`; `{:#}` appends the zone name.
impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)?;
        if f.alternate() {
            write!(f, " {}", self.zone.name())?;
        }
        Ok(())
    }
}

impl FromStr for ClockTime {
    type Err = ClockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (clock, zone) = match s.split_once(' ') {
            Some((clock, zone)) if !zone.is_empty() && !zone.contains(' ') => (clock, Some(zone)),
            Some(_) => return Err(ClockError::Format(s.to_string())),
            None => (s, None),
        };
        let (hour, minute) = clock
            .split_once(':')
            .ok_or_else(|| ClockError::Format(s.to_string()))?;
        let hour = Self::parse_two_digits(hour, s)?;
        let minute = Self::parse_two_digits(minute, s)?;
        let zone = match zone {
            Some(name) => Self::parse_zone(name)?,
            None => Tz::UTC,
        };
        Self::new(hour, minute, zone)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.zone == Tz::UTC {
            serializer.collect_str(self)
        } else {
            serializer.collect_str(&format_args!("{self:#}"))
        }
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
