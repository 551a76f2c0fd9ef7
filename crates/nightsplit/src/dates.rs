//! Resolution of the `--from` / `--to` filter range.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use nightsplit_core::{DateRange, NightWindow};
use nightsplit_export::parse_timestamp;
use tracing::warn;

/// Build the filter range from optional user input.
///
/// Missing `from` is yesterday at the night start, missing `to` is today at
/// the night end. A value given as a bare date is moved to the night start
/// (`from`) or night end (`to`) on that date. Unparseable values fall back to
/// the defaults.
pub fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
    window: &NightWindow,
    now: DateTime<Local>,
) -> DateRange {
    let today = now.date_naive();
    let yesterday = today - TimeDelta::days(1);

    let from = resolve(from, "from", window.start)
        .unwrap_or_else(|| local_at(yesterday, window.start));
    let to = resolve(to, "to", window.end).unwrap_or_else(|| local_at(today, window.end));

    DateRange::new(from, to)
}

fn resolve(input: Option<&str>, name: &str, midnight_replacement: NaiveTime) -> Option<DateTime<FixedOffset>> {
    let input = input?;
    let Some(parsed) = parse_timestamp(input) else {
        warn!(input, name, "Invalid date format, using default");
        return None;
    };

    if parsed.time() != NaiveTime::MIN {
        return Some(parsed);
    }

    parsed
        .offset()
        .from_local_datetime(&parsed.date_naive().and_time(midnight_replacement))
        .single()
}

fn local_at(date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    let naive = date.and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .unwrap_or_else(|| naive.and_utc().fixed_offset())
}
