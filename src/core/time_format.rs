use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Ticks;
use crate::core::primitives::{TICKS_PER_SECOND, seconds_to_ticks};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Textual encodings a timestamp column may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// Integer ticks (10,000,000 per second).
    Ticks,
    /// Floating-point seconds.
    #[default]
    Seconds,
    /// `H:MM:SS[.fraction]`, optionally prefixed by a date and a space.
    ///
    /// Without a date the hour field is an elapsed count and may exceed 23.
    Clock,
}

impl TimeFormat {
    /// Order in which formats are retried when the remembered one fails.
    pub const FALLBACK_ORDER: [Self; 3] = [Self::Ticks, Self::Seconds, Self::Clock];

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "ticks" | "tick" | "long" => Some(Self::Ticks),
            "seconds" | "second" | "float" | "s" => Some(Self::Seconds),
            "clock" | "string" | "datetime" | "time" => Some(Self::Clock),
            _ => None,
        }
    }

    #[must_use]
    pub fn parse(self, raw: &str) -> Option<Ticks> {
        let raw = raw.trim();
        match self {
            Self::Ticks => raw.parse::<i64>().ok(),
            Self::Seconds => raw.parse::<f64>().ok().and_then(seconds_to_ticks),
            Self::Clock => parse_clock(raw),
        }
    }
}

/// Parses `H:MM:SS[.fraction]`, optionally preceded by a date.
///
/// Undated input is elapsed time and yields ticks since zero, so recordings
/// longer than a day keep counting hours. Dated input must be a valid time of
/// day and yields ticks since the Unix epoch.
#[must_use]
pub fn parse_clock(raw: &str) -> Option<Ticks> {
    let Some((date_part, time_part)) = raw.rsplit_once(' ') else {
        return parse_elapsed(raw);
    };
    let (date_part, time_part) = (date_part.trim(), time_part.trim());

    let time = NaiveTime::parse_from_str(time_part, "%H:%M:%S%.f").ok()?;
    let time_of_day =
        i64::from(time.num_seconds_from_midnight()) * TICKS_PER_SECOND + i64::from(time.nanosecond() / 100);

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp();
    midnight
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(time_of_day)
}

/// `H:MM:SS[.fraction]` with an unbounded hour count. Fractions finer than a
/// tick are truncated.
fn parse_elapsed(raw: &str) -> Option<Ticks> {
    let mut fields = raw.split(':');
    let (hours, minutes, seconds) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }

    let hours = parse_digits(hours)?;
    let minutes = parse_digits(minutes).filter(|minutes| *minutes < 60)?;
    let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
    let whole = parse_digits(whole).filter(|seconds| *seconds < 60)?;
    if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }

    let mut sub_ticks = 0_i64;
    let mut scale = TICKS_PER_SECOND;
    for digit in fraction.bytes().take(7) {
        scale /= 10;
        sub_ticks += i64::from(digit - b'0') * scale;
    }

    hours
        .checked_mul(3_600)?
        .checked_add(minutes * 60 + whole)?
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(sub_ticks)
}

fn parse_digits(field: &str) -> Option<i64> {
    if field.is_empty() || !field.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Per-file timestamp parser that remembers the last format that worked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveTimestampParser {
    current: TimeFormat,
}

impl AdaptiveTimestampParser {
    #[must_use]
    pub fn new(initial: TimeFormat) -> Self {
        Self { current: initial }
    }

    #[must_use]
    pub fn current(&self) -> TimeFormat {
        self.current
    }

    /// Tries the remembered format first, then the others in fallback order.
    ///
    /// A successful fallback becomes the remembered format. Returns `None`
    /// when no format accepts the value.
    pub fn parse(&mut self, raw: &str) -> Option<Ticks> {
        if let Some(ticks) = self.current.parse(raw) {
            return Some(ticks);
        }

        for format in TimeFormat::FALLBACK_ORDER {
            if format == self.current {
                continue;
            }
            if let Some(ticks) = format.parse(raw) {
                debug!(from = ?self.current, to = ?format, raw, "switching timestamp format");
                self.current = format;
                return Some(ticks);
            }
        }
        None
    }
}
