use std::ops::Range;

use chrono::{DateTime, FixedOffset, TimeDelta};
use tracing::debug;

use crate::{Interval, Stage};

/// Width of one timeline slot.
pub const SLOT_SECONDS: i64 = 30;

const SLOT_MILLIS: i64 = SLOT_SECONDS * 1000;

/// One 30-second slot of a night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub stage: Stage,
}

/// Fixed-resolution stage timeline.
///
/// Slot `i` starts at `start + i * 30s`. Slots are stored by offset, so the
/// sequence is contiguous and ordered by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    start: DateTime<FixedOffset>,
    slots: Vec<Stage>,
}

impl Timeline {
    /// Lay out Wake slots from `start` while a slot's start is before `end`.
    pub fn build(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        let span = (end - start).num_milliseconds();
        let count = if span <= 0 {
            0
        } else {
            ((span + SLOT_MILLIS - 1) / SLOT_MILLIS) as usize
        };

        Self {
            start,
            slots: vec![Stage::Wake; count],
        }
    }

    /// Build the timeline for `[start, end)` and overlay `intervals`.
    ///
    /// `intervals` must be sorted by start so the earliest interval wins
    /// wherever intervals overlap.
    pub fn from_intervals(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        intervals: &[Interval],
    ) -> Self {
        let mut timeline = Self::build(start, end);
        timeline.overlay(intervals);
        timeline
    }

    /// Assign each interval's stage to the still-Wake slots whose start lies
    /// within `[interval.start, interval.end]`.
    ///
    /// A slot that already holds a sleep stage is never overwritten, so the
    /// result depends on the order of `intervals`.
    pub fn overlay(&mut self, intervals: &[Interval]) {
        for interval in intervals {
            let stage = interval.stage();
            if stage.is_wake() {
                continue;
            }

            let range = self.covered(interval);
            for slot in &mut self.slots[range] {
                if slot.is_wake() {
                    *slot = stage;
                }
            }
        }

        debug!(
            slots = self.slots.len(),
            intervals = intervals.len(),
            "Overlaid intervals onto timeline"
        );
    }

    /// Indices of the slots whose start falls inside the interval, inclusive
    /// at both ends.
    fn covered(&self, interval: &Interval) -> Range<usize> {
        let from = (interval.start - self.start).num_milliseconds();
        let to = (interval.end - self.start).num_milliseconds();

        if self.slots.is_empty() || to < 0 {
            return 0..0;
        }

        let first = if from <= 0 {
            0
        } else {
            ((from + SLOT_MILLIS - 1) / SLOT_MILLIS) as usize
        };
        let last = ((to / SLOT_MILLIS) as usize).min(self.slots.len() - 1);

        if first > last {
            0..0
        } else {
            first..last + 1
        }
    }

    pub fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.slots
    }

    pub fn slot_start(&self, index: usize) -> DateTime<FixedOffset> {
        self.start + TimeDelta::seconds(SLOT_SECONDS * index as i64)
    }

    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.slots.iter().enumerate().map(|(i, &stage)| TimeSlot {
            start: self.slot_start(i),
            stage,
        })
    }

    /// Number of slots holding `stage`.
    pub fn count(&self, stage: Stage) -> usize {
        self.slots.iter().filter(|&&s| s == stage).count()
    }

    /// Index of the first non-Wake slot.
    pub fn first_sleep_index(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_wake())
    }

    /// Number of sleep -> Wake transitions between adjacent slots.
    pub fn awakenings(&self) -> usize {
        self.slots
            .windows(2)
            .filter(|pair| !pair[0].is_wake() && pair[1].is_wake())
            .count()
    }
}
