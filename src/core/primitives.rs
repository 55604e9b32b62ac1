use crate::core::Ticks;

pub const TICKS_PER_SECOND: i64 = 10_000_000;
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

#[must_use]
pub fn ticks_to_seconds(ticks: Ticks) -> f64 {
    ticks as f64 / TICKS_PER_SECOND as f64
}

/// Converts floating seconds to ticks, rounding to the nearest tick.
///
/// Returns `None` for non-finite input or values outside the tick range.
#[must_use]
pub fn seconds_to_ticks(seconds: f64) -> Option<Ticks> {
    if !seconds.is_finite() {
        return None;
    }
    let ticks = (seconds * TICKS_PER_SECOND as f64).round();
    if ticks < i64::MIN as f64 || ticks > i64::MAX as f64 {
        return None;
    }
    Some(ticks as i64)
}

/// Where a semantic field of an entity gets its value from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    /// Value read from the named column of the entity's data file.
    Column(String),
    /// Constant written as `{value}` in the descriptor.
    Literal(f64),
    /// Neither; the role default applies.
    Absent,
}

impl FieldSource {
    /// Classifies a descriptor token.
    ///
    /// `{1.5}` is a literal, anything else non-empty is a column name. A
    /// literal whose contents do not parse yields `Err` with the raw contents
    /// so the caller can log and fall back to the role default.
    pub fn parse(token: &str) -> Result<Self, String> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(Self::Absent);
        }
        if let Some(inner) = token
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        {
            let inner = inner.trim();
            return inner
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(Self::Literal)
                .ok_or_else(|| inner.to_owned());
        }
        Ok(Self::Column(token.to_owned()))
    }

    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Column(name) => Some(name),
            Self::Literal(_) | Self::Absent => None,
        }
    }

    #[must_use]
    pub fn literal_or(&self, default: f64) -> f64 {
        match self {
            Self::Literal(value) => *value,
            Self::Column(_) | Self::Absent => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldSource, seconds_to_ticks, ticks_to_seconds};

    #[test]
    fn literal_tokens_are_distinguished_from_columns() {
        assert_eq!(FieldSource::parse("{0.5}"), Ok(FieldSource::Literal(0.5)));
        assert_eq!(FieldSource::parse(" { -2 } "), Ok(FieldSource::Literal(-2.0)));
        assert_eq!(
            FieldSource::parse("HeadPosX"),
            Ok(FieldSource::Column("HeadPosX".to_owned()))
        );
        assert_eq!(FieldSource::parse(""), Ok(FieldSource::Absent));
    }

    #[test]
    fn malformed_literal_reports_its_contents() {
        assert_eq!(FieldSource::parse("{abc}"), Err("abc".to_owned()));
    }

    #[test]
    fn seconds_and_ticks_convert_at_ten_million_per_second() {
        assert_eq!(seconds_to_ticks(1.5), Some(15_000_000));
        assert_eq!(seconds_to_ticks(f64::NAN), None);
        assert!((ticks_to_seconds(20_000_000) - 2.0).abs() <= 1e-12);
    }
}
