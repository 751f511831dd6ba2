//! Shared CLI result types.

use serde::Serialize;

use bookline::model::{Interval, RecurrencePattern, ScheduledItem};

/// Result of a recurrence expansion preview.
#[derive(Debug, Serialize)]
pub struct ExpandResult {
    pub pattern: RecurrencePattern,
    pub occurrences: Vec<Interval>,
    /// True when the preview limit truncated the sequence.
    pub truncated: bool,
}

/// Result of an advisory conflict check.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub interval: Interval,
    pub conflicts: Vec<ScheduledItem>,
}

impl CheckResult {
    pub fn is_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}
