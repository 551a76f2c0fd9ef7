use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use tracing::debug;

use crate::Interval;

/// Clock times bounding a night: from `start` on the night date until `end`
/// on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(19, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(11, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl NightWindow {
    /// The night an instant belongs to, judged by its local clock time.
    pub fn night_date(&self, at: &DateTime<FixedOffset>) -> NaiveDate {
        if at.time() >= self.start {
            at.date_naive()
        } else {
            (*at - TimeDelta::days(1)).date_naive()
        }
    }

    /// Start and end of the night `date` in the given offset.
    pub fn bounds(
        &self,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)> {
        let next = date.succ_opt()?;
        let start = offset
            .from_local_datetime(&date.and_time(self.start))
            .single()?;
        let end = offset
            .from_local_datetime(&next.and_time(self.end))
            .single()?;
        Some((start, end))
    }
}

/// Inclusive range an interval must lie within to be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<FixedOffset>,
    pub to: DateTime<FixedOffset>,
}

impl DateRange {
    pub fn new(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, interval: &Interval) -> bool {
        interval.start >= self.from && interval.end <= self.to
    }
}

/// The intervals recorded during one night, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct NightGroup {
    pub date: NaiveDate,
    pub intervals: Vec<Interval>,
}

impl NightGroup {
    /// Earliest start among the night's intervals.
    pub fn segment_start(&self) -> Option<DateTime<FixedOffset>> {
        self.intervals.iter().map(|i| i.start).min()
    }

    /// Latest end among the night's intervals.
    pub fn segment_end(&self) -> Option<DateTime<FixedOffset>> {
        self.intervals.iter().map(|i| i.end).max()
    }
}

/// Bucket chronologically sorted intervals into nights.
///
/// An interval is kept only if it lies entirely inside its night's window
/// and inside `range`; everything else is dropped. Runs of consecutive
/// intervals with the same night date form one group, so input that is not
/// sorted by start can yield several groups for the same date. Groups are
/// never empty.
pub fn group_nights(
    intervals: &[Interval],
    window: &NightWindow,
    range: &DateRange,
) -> Vec<NightGroup> {
    let mut groups: Vec<NightGroup> = Vec::new();
    let mut current: Option<NightGroup> = None;
    let mut dropped = 0usize;

    for interval in intervals {
        let date = window.night_date(&interval.start);

        let Some((night_start, night_end)) = window.bounds(date, *interval.start.offset()) else {
            dropped += 1;
            continue;
        };

        let inside_night = interval.start >= night_start && interval.end <= night_end;
        if !inside_night || !range.contains(interval) {
            dropped += 1;
            continue;
        }

        if let Some(group) = current.as_mut().filter(|g| g.date == date) {
            group.intervals.push(interval.clone());
            continue;
        }

        let next = NightGroup {
            date,
            intervals: vec![interval.clone()],
        };
        if let Some(done) = current.replace(next) {
            groups.push(done);
        }
    }

    if let Some(done) = current {
        groups.push(done);
    }

    debug!(
        nights = groups.len(),
        kept = intervals.len() - dropped,
        dropped,
        "Grouped intervals into nights"
    );

    groups
}
