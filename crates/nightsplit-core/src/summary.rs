use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::debug;

use crate::{Interval, Stage, SummaryError, Timeline, SLOT_SECONDS};

/// Statistics for one night.
///
/// The trailing zero fields are not computed; they exist so the record
/// lines up with the import format's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NightSummary {
    pub start: DateTime<FixedOffset>,
    pub stop: DateTime<FixedOffset>,
    pub total: TimeDelta,
    pub sleep_onset: TimeDelta,
    pub asleep: TimeDelta,
    pub light: TimeDelta,
    pub deep: TimeDelta,
    pub rem: TimeDelta,
    pub wake: TimeDelta,
    /// Wake time minus sleep onset. Not clamped at zero.
    pub wake_after_sleep_onset: TimeDelta,
    pub awakenings: usize,
    pub hypnogram: Vec<Stage>,
    pub position_changes: u32,
    pub mean_heart_rate: u32,
    pub mean_respiration_cpm: u32,
    pub stimulations: u32,
    pub sleep_efficiency: u32,
}

impl NightSummary {
    pub fn stage_duration(&self, stage: Stage) -> TimeDelta {
        match stage {
            Stage::Asleep => self.asleep,
            Stage::Light => self.light,
            Stage::Deep => self.deep,
            Stage::Rem => self.rem,
            Stage::Wake => self.wake,
        }
    }

    /// Slot labels joined by commas, wrapped in brackets.
    pub fn hypnogram_string(&self) -> String {
        let labels: Vec<&str> = self.hypnogram.iter().map(|s| s.label()).collect();
        format!("[{}]", labels.join(","))
    }
}

/// Summarize one night's intervals after shifting them by `shift_seconds`.
pub fn summarize(intervals: &[Interval], shift_seconds: i64) -> Result<NightSummary, SummaryError> {
    let mut sorted: Vec<Interval> = intervals.iter().map(|i| i.shifted(shift_seconds)).collect();
    sorted.sort_by_key(|i| i.start);

    let start = sorted.first().ok_or(SummaryError::EmptyNight)?.start;
    let stop = sorted
        .iter()
        .map(|i| i.end)
        .max()
        .ok_or(SummaryError::EmptyNight)?;

    debug!(%start, %stop, intervals = sorted.len(), "Summarizing night");

    let timeline = Timeline::from_intervals(start, stop, &sorted);

    let onset_slot = timeline.first_sleep_index().unwrap_or(0);
    let sleep_onset = timeline.slot_start(onset_slot) - start;

    let slot_time = |stage: Stage| TimeDelta::seconds(SLOT_SECONDS * timeline.count(stage) as i64);
    let wake = slot_time(Stage::Wake);

    Ok(NightSummary {
        start,
        stop,
        total: stop - start,
        sleep_onset,
        asleep: slot_time(Stage::Asleep),
        light: slot_time(Stage::Light),
        deep: slot_time(Stage::Deep),
        rem: slot_time(Stage::Rem),
        wake,
        wake_after_sleep_onset: wake - sleep_onset,
        awakenings: timeline.awakenings(),
        hypnogram: timeline.stages().to_vec(),
        position_changes: 0,
        mean_heart_rate: 0,
        mean_respiration_cpm: 0,
        stimulations: 0,
        sleep_efficiency: 0,
    })
}

/// Render a duration as `H:MM:SS`. Hours are not wrapped at 24.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn interval(start: &str, end: &str, raw: &str) -> Interval {
        Interval::new("Watch", 1.0, at(start), at(end), raw)
    }

    fn sample_night() -> Vec<Interval> {
        vec![
            interval("2024-01-15T19:30:00+01:00", "2024-01-15T23:00:00+01:00", "Core"),
            interval("2024-01-16T07:00:00+01:00", "2024-01-16T07:30:00+01:00", "Awake"),
            interval("2024-01-15T19:00:00+01:00", "2024-01-15T19:30:00+01:00", "InBed"),
            interval("2024-01-15T23:00:00+01:00", "2024-01-15T23:05:00+01:00", "Deep"),
        ]
    }

    #[test]
    fn test_empty_night_is_an_error() {
        assert_eq!(summarize(&[], 0), Err(SummaryError::EmptyNight));
    }

    #[test]
    fn test_sample_night_statistics() {
        let summary = summarize(&sample_night(), 0).unwrap();

        assert_eq!(summary.start, at("2024-01-15T19:00:00+01:00"));
        assert_eq!(summary.stop, at("2024-01-16T07:30:00+01:00"));
        assert_eq!(format_duration(summary.total), "12:30:00");
        assert_eq!(format_duration(summary.sleep_onset), "0:30:00");
        assert_eq!(format_duration(summary.light), "3:30:30");
        assert_eq!(format_duration(summary.deep), "0:05:00");
        assert_eq!(format_duration(summary.rem), "0:00:00");
        assert_eq!(format_duration(summary.wake), "8:54:30");
        assert_eq!(format_duration(summary.wake_after_sleep_onset), "8:24:30");
        assert_eq!(summary.awakenings, 1);
        assert_eq!(summary.hypnogram.len(), 1500);
    }

    #[test]
    fn test_sample_night_hypnogram_shape() {
        let summary = summarize(&sample_night(), 0).unwrap();
        let h = &summary.hypnogram;

        assert!(h[..60].iter().all(|s| *s == Stage::Wake));
        assert!(h[60..481].iter().all(|s| *s == Stage::Light));
        assert!(h[481..491].iter().all(|s| *s == Stage::Deep));
        assert!(h[491..].iter().all(|s| *s == Stage::Wake));

        let text = summary.hypnogram_string();
        assert!(text.starts_with("[WAKE,"));
        assert!(text.ends_with(",WAKE]"));
    }

    #[test]
    fn test_stage_durations_cover_every_slot() {
        let summary = summarize(&sample_night(), 0).unwrap();
        let total: TimeDelta = Stage::ALL
            .iter()
            .map(|&s| summary.stage_duration(s))
            .fold(TimeDelta::zero(), |acc, d| acc + d);

        assert_eq!(
            total,
            TimeDelta::seconds(SLOT_SECONDS * summary.hypnogram.len() as i64)
        );
    }

    #[test]
    fn test_shift_moves_night_without_changing_shape() {
        let base = summarize(&sample_night(), 0).unwrap();
        let shifted = summarize(&sample_night(), 3600).unwrap();

        assert_eq!(shifted.start - base.start, TimeDelta::hours(1));
        assert_eq!(shifted.stop - base.stop, TimeDelta::hours(1));
        assert_eq!(shifted.total, base.total);
        assert_eq!(shifted.sleep_onset, base.sleep_onset);
        assert_eq!(shifted.hypnogram, base.hypnogram);
        assert_eq!(shifted.awakenings, base.awakenings);
    }

    #[test]
    fn test_all_wake_night_has_zero_onset() {
        let summary = summarize(
            &[interval("2024-01-15T22:00:00Z", "2024-01-15T22:10:00Z", "Awake")],
            0,
        )
        .unwrap();

        assert_eq!(summary.sleep_onset, TimeDelta::zero());
        assert_eq!(summary.awakenings, 0);
        assert_eq!(summary.wake, TimeDelta::minutes(10));
        assert_eq!(summary.wake_after_sleep_onset, TimeDelta::minutes(10));
    }

    #[test]
    fn test_placeholders_are_zero() {
        let summary = summarize(&sample_night(), 0).unwrap();
        assert_eq!(summary.position_changes, 0);
        assert_eq!(summary.mean_heart_rate, 0);
        assert_eq!(summary.mean_respiration_cpm, 0);
        assert_eq!(summary.stimulations, 0);
        assert_eq!(summary.sleep_efficiency, 0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::zero()), "0:00:00");
        assert_eq!(format_duration(TimeDelta::seconds(3_725)), "1:02:05");
        assert_eq!(format_duration(TimeDelta::hours(26)), "26:00:00");
        assert_eq!(format_duration(TimeDelta::seconds(-90)), "-0:01:30");
    }
}
