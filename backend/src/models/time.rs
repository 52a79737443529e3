use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wall-clock time of day with minute precision.
///
/// No date or timezone component. Ordering is by hour, then minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

/// Reason a time or interval string failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("expected HH:MM, got '{0}'")]
    Format(String),
    #[error("hour {0} out of range 0..=23")]
    HourOutOfRange(u32),
    #[error("minute {0} out of range 0..=59")]
    MinuteOutOfRange(u32),
    #[error("expected HH:MM-HH:MM, got '{0}'")]
    IntervalFormat(String),
}

impl TimeOfDay {
    /// Midnight (00:00).
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    /// Create a time of day, validating both components.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeParseError> {
        if hour > 23 {
            return Err(TimeParseError::HourOutOfRange(hour));
        }
        if minute > 59 {
            return Err(TimeParseError::MinuteOutOfRange(minute));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Minutes elapsed since midnight.
    pub fn minutes_since_midnight(&self) -> u32 {
        self.hour() * 60 + self.minute()
    }

    /// Truncate any chrono time value to minute precision.
    pub fn from_timelike<T: chrono::Timelike>(t: &T) -> Self {
        Self {
            hour: t.hour() as u8,
            minute: t.minute() as u8,
        }
    }
}

fn parse_component(raw: &str, whole: &str) -> Result<u32, TimeParseError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimeParseError::Format(whole.to_string()));
    }
    raw.parse()
        .map_err(|_| TimeParseError::Format(whole.to_string()))
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(s.to_string()))?;
        let hour = parse_component(h, s)?;
        let minute = parse_component(m, s)?;
        Self::new(hour, minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive time-of-day window.
///
/// An interval whose start is after its end is degenerate: it matches no time.
/// Windows crossing midnight (e.g. `23:00-01:00`) are therefore not expressible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeakInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl PeakInterval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time <= self.end
    }

    pub fn is_degenerate(&self) -> bool {
        self.start > self.end
    }
}

impl FromStr for PeakInterval {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| TimeParseError::IntervalFormat(s.to_string()))?;
        let start = start
            .parse()
            .map_err(|_| TimeParseError::IntervalFormat(s.to_string()))?;
        let end = end
            .parse()
            .map_err(|_| TimeParseError::IntervalFormat(s.to_string()))?;
        Ok(Self { start, end })
    }
}

impl fmt::Display for PeakInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl Serialize for PeakInterval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeakInterval {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
