//! Recurrence expansion: pattern plus bounds to concrete occurrences.
//!
//! Expansion is a pure function of its inputs. Preview UIs and the commit
//! path in the mutation service call the same function, so what the user
//! previews is exactly what gets created (modulo the preview limit).

use chrono::{Duration, NaiveDateTime};

use crate::model::{Interval, RecurrencePattern, RecurringSeries};

/// Occurrences shown in preview UIs before committing a series.
pub const PREVIEW_LIMIT: usize = 5;

/// Limit value for commit-time expansion; the range end is the only bound.
pub const UNLIMITED: usize = usize::MAX;

/// Expand a recurrence into concrete occurrence intervals.
///
/// Walks from `range_start` in fixed day steps, emitting an occurrence of
/// `duration` at each instant that is still within the inclusive
/// `range_end`, up to `limit` occurrences. An inverted range yields an
/// empty sequence; that is a valid result, not an error. `duration` comes
/// from a validated anchor interval and must be positive.
///
/// The sequence is always finite and restartable: identical arguments
/// yield identical occurrences on every call.
pub fn expand(
    pattern: RecurrencePattern,
    duration: Duration,
    range_start: NaiveDateTime,
    range_end: NaiveDateTime,
    limit: usize,
) -> Vec<Interval> {
    let step = Duration::days(pattern.step_days());
    let mut occurrences = Vec::new();
    let mut current = range_start;

    while current <= range_end && occurrences.len() < limit {
        occurrences.push(Interval {
            start: current,
            end: current + duration,
        });
        current += step;
    }

    occurrences
}

/// Expand a series using its anchor duration and generation bounds.
pub fn expand_series(series: &RecurringSeries, limit: usize) -> Vec<Interval> {
    expand(
        series.pattern,
        series.occurrence_duration(),
        series.range_start,
        series.range_end,
        limit,
    )
}

/// The first [`PREVIEW_LIMIT`] occurrences of a series.
pub fn preview(series: &RecurringSeries) -> Vec<Interval> {
    expand_series(series, PREVIEW_LIMIT)
}
