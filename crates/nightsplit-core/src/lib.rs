//! # nightsplit-core
//!
//! Night segmentation and sleep statistics for nightsplit.
//!
//! This crate turns a stream of irregular, possibly overlapping sleep-stage
//! intervals into per-night summaries. It performs no I/O.
//!
//! ## Overview
//!
//! Processing a batch of intervals goes through four steps:
//! - [`Stage::from_raw`] maps device labels into the five canonical stages
//! - [`group_nights`] buckets chronologically sorted intervals into nights
//! - [`Timeline`] lays one night out as fixed 30-second slots
//! - [`summarize`] derives durations, awakenings, onset and the hypnogram
//!
//! ## Key Types
//!
//! - [`Interval`] - One observed sleep-stage event
//! - [`NightGroup`] - The intervals owned by one night
//! - [`NightSummary`] - Per-night statistics, ready for serialization
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nightsplit_core::{group_nights, summarize, DateRange, NightWindow};
//!
//! let nights = group_nights(&intervals, &NightWindow::default(), &range);
//! for night in &nights {
//!     let summary = summarize(&night.intervals, 0)?;
//!     println!("{}: {} awakenings", night.date, summary.awakenings);
//! }
//! ```

mod error;
mod interval;
mod night;
mod stage;
mod summary;
mod timeline;

pub use error::SummaryError;
pub use interval::Interval;
pub use night::{group_nights, DateRange, NightGroup, NightWindow};
pub use stage::Stage;
pub use summary::{format_duration, summarize, NightSummary};
pub use timeline::{TimeSlot, Timeline, SLOT_SECONDS};
