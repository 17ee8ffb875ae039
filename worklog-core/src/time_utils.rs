//! Clock-time arithmetic shared by the line parsers and the schedule predictor.
//!
//! Times of day travel through the crate as minute offsets from midnight
//! (`09:30` → `570`). Durations are plain minute counts.

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid clock regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("invalid clock time `{0}`, expected HH:MM")]
    Format(String),
}

/// Parses `HH:MM` (or `H:MM`) into minutes since midnight.
pub fn parse_time_to_minutes(text: &str) -> Result<u32, TimeError> {
    let text = text.trim();
    let caps = CLOCK_TIME
        .captures(text)
        .ok_or_else(|| TimeError::Format(text.to_string()))?;
    let hours: u32 = caps[1]
        .parse()
        .map_err(|_| TimeError::Format(text.to_string()))?;
    let minutes: u32 = caps[2]
        .parse()
        .map_err(|_| TimeError::Format(text.to_string()))?;
    if hours > 23 || minutes > 59 {
        return Err(TimeError::Format(text.to_string()));
    }
    Ok(hours * 60 + minutes)
}

/// Renders minutes since midnight as `HH:MM`, wrapping once per day.
/// `1500` becomes `01:00`; the day is never carried.
pub fn minutes_to_time_str(minutes: u32) -> String {
    let wrapped = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

/// Minutes since midnight for a wall-clock time, seconds dropped.
pub fn time_of_day_minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// `125` → `2時間5分`, `60` → `1時間`, `45` → `45分`, `0` → `0分`.
/// Negative values render their absolute value followed by `超過` (overrun).
pub fn format_duration(minutes: i64) -> String {
    let text = clock_duration(minutes.unsigned_abs());
    if minutes < 0 {
        format!("{text}超過")
    } else {
        text
    }
}

fn clock_duration(minutes: u64) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, 0) => "0分".to_string(),
        (0, m) => format!("{m}分"),
        (h, 0) => format!("{h}時間"),
        (h, m) => format!("{h}時間{m}分"),
    }
}

/// Rounds an instant to the nearest multiple of `granularity_minutes`,
/// half-up over raw epoch milliseconds. A granularity of zero is a no-op.
pub fn round_time<Tz: TimeZone>(instant: DateTime<Tz>, granularity_minutes: u32) -> DateTime<Tz> {
    if granularity_minutes == 0 {
        return instant;
    }
    let unit = i64::from(granularity_minutes) * 60_000;
    let millis = instant.timestamp_millis();
    let rounded = (millis + unit / 2).div_euclid(unit) * unit;
    instant + TimeDelta::milliseconds(rounded - millis)
}
