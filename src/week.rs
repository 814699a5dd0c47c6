use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WeekdayError {
    #[error("weekday set storage value not of type string")]
    NotString,
    #[error("weekday set storage value empty")]
    EmptyValue,
    #[error("weekday set storage value {0:?} contains a non-binary digit")]
    InvalidDigit(String),
    #[error("weekday set storage value {0:?} has more than 7 significant bits")]
    TooManyBits(String),
}

/// A set of weekdays stored as a 7-bit mask, Sunday in bit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<Weekday>", from = "Vec<Weekday>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    /// Canonical rendering order, Sunday first.
    const ORDER: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn new<I>(weekdays: I) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        weekdays
            .into_iter()
            .fold(Self::EMPTY, |set, day| WeekdaySet(set.0 | Self::bit(day)))
    }

    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits > Self::ALL.0 {
            None
        } else {
            Some(WeekdaySet(bits))
        }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True when every given weekday is a member. An empty argument list is
    /// trivially contained.
    pub fn contains<I>(self, weekdays: I) -> bool
    where
        I: IntoIterator<Item = Weekday>,
    {
        let other = Self::new(weekdays);
        self.0 | other.0 == self.0
    }

    pub fn contains_day(self, weekday: Weekday) -> bool {
        self.0 & Self::bit(weekday) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn union(self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 | other.0)
    }

    pub const fn intersection(self, other: WeekdaySet) -> WeekdaySet {
        WeekdaySet(self.0 & other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        Self::ORDER
            .into_iter()
            .filter(move |day| self.contains_day(*day))
    }

    /// Binary digits, most significant bit first. The empty set is `"0"`.
    pub fn to_bitstring(self) -> String {
        format!("{:b}", self.0)
    }

    pub fn parse_bitstring(raw: &str) -> Result<Self, WeekdayError> {
        if raw.is_empty() {
            return Err(WeekdayError::EmptyValue);
        }
        let mut bits: u8 = 0;
        for ch in raw.chars() {
            let digit = match ch {
                '0' => 0,
                '1' => 1,
                _ => return Err(WeekdayError::InvalidDigit(raw.to_string())),
            };
            if bits > Self::ALL.0 >> 1 {
                return Err(WeekdayError::TooManyBits(raw.to_string()));
            }
            bits = (bits << 1) | digit;
        }
        Ok(WeekdaySet(bits))
    }

    fn bit(weekday: Weekday) -> u8 {
        1 << weekday.num_days_from_sunday()
    }

    fn plural_name(weekday: Weekday) -> &'static str {
        match weekday {
            Weekday::Sun => "Sundays",
            Weekday::Mon => "Mondays",
            Weekday::Tue => "Tuesdays",
            Weekday::Wed => "Wednesdays",
            Weekday::Thu => "Thursdays",
            Weekday::Fri => "Fridays",
            Weekday::Sat => "Saturdays",
        }
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .iter()
            .map(Self::plural_name)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&names)
    }
}

impl FromStr for WeekdaySet {
    type Err = WeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_bitstring(s)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<T: IntoIterator<Item = Weekday>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<Weekday>> for WeekdaySet {
    fn from(days: Vec<Weekday>) -> Self {
        Self::new(days)
    }
}

impl From<WeekdaySet> for Vec<Weekday> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().collect()
    }
}

impl BitOr for WeekdaySet {
    type Output = WeekdaySet;

    fn bitor(self, rhs: WeekdaySet) -> WeekdaySet {
        self.union(rhs)
    }
}

impl BitAnd for WeekdaySet {
    type Output = WeekdaySet;

    fn bitand(self, rhs: WeekdaySet) -> WeekdaySet {
        self.intersection(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_follow_sunday_first_numbering() {
        assert_eq!(WeekdaySet::new([Weekday::Sun]).bits(), 0b1);
        assert_eq!(WeekdaySet::new([Weekday::Mon]).bits(), 0b10);
        assert_eq!(WeekdaySet::new([Weekday::Sat]).bits(), 0b100_0000);
        assert_eq!(WeekdaySet::new(WeekdaySet::ORDER), WeekdaySet::ALL);
    }

    #[test]
    fn from_bits_rejects_eighth_bit() {
        assert_eq!(WeekdaySet::from_bits(127), Some(WeekdaySet::ALL));
        assert_eq!(WeekdaySet::from_bits(128), None);
    }

    #[test]
    fn parse_bitstring_rejects_overflow() {
        assert_eq!(
            WeekdaySet::parse_bitstring("11111111"),
            Err(WeekdayError::TooManyBits("11111111".into()))
        );
        assert_eq!(
            WeekdaySet::parse_bitstring("00000001"),
            Ok(WeekdaySet::new([Weekday::Sun]))
        );
    }
}
