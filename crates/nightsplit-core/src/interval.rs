use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::Stage;

/// One observed sleep-stage event, in the timezone it was recorded in.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub source: String,
    pub quantity: f64,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub raw_stage: String,
}

impl Interval {
    pub fn new(
        source: impl Into<String>,
        quantity: f64,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        raw_stage: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            quantity,
            start,
            end,
            raw_stage: raw_stage.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        Stage::from_raw(&self.raw_stage)
    }

    /// Copy of this interval with both endpoints moved by `seconds`.
    pub fn shifted(&self, seconds: i64) -> Self {
        let delta = TimeDelta::seconds(seconds);
        Self {
            start: self.start + delta,
            end: self.end + delta,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_shift_moves_both_endpoints() {
        let interval = Interval::new(
            "Watch",
            1.0,
            at("2024-01-15T23:00:00+01:00"),
            at("2024-01-15T23:30:00+01:00"),
            "Core",
        );

        let shifted = interval.shifted(-3600);
        assert_eq!(shifted.start, at("2024-01-15T22:00:00+01:00"));
        assert_eq!(shifted.end, at("2024-01-15T22:30:00+01:00"));
        assert_eq!(shifted.start.offset(), interval.start.offset());
        assert_eq!(shifted.raw_stage, "Core");
        assert_eq!(shifted.stage(), Stage::Light);
    }
}
