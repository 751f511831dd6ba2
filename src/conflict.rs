//! Conflict detection for candidate placements.
//!
//! A pure query over the existing item collection: no side effects, safe
//! to call on every drag-move tick. The authoritative check lives in the
//! backend; this detector is the optimistic client-side pass.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::{Interval, ScheduledItem};

/// A proposed placement to test against the existing collection.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub interval: Interval,
    /// Staff scope; absent applies to all staff.
    pub owner: Option<String>,
    /// Resource scope; only a shared, present resource can collide.
    pub resource: Option<String>,
    /// Item id to exclude from comparison. A move re-checks the collection
    /// minus the moved item itself; an item is never in conflict with
    /// itself.
    pub exclude: Option<String>,
}

impl Candidate {
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            owner: None,
            resource: None,
            exclude: None,
        }
    }

    /// Candidate for re-placing an existing item: same scopes, excluded
    /// from comparison by id.
    pub fn for_item(item: &ScheduledItem) -> Self {
        Self {
            interval: item.interval,
            owner: item.owner.clone(),
            resource: item.resource.clone(),
            exclude: Some(item.id.clone()),
        }
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn excluding(mut self, id: impl Into<String>) -> Self {
        self.exclude = Some(id.into());
        self
    }
}

/// True when `existing` blocks the candidate placement.
///
/// An existing item is a conflict only when all of these hold:
/// - it is not the excluded item;
/// - it is not a cancelled appointment (blockers have no status and
///   always count);
/// - its interval overlaps the candidate's (half-open semantics);
/// - it shares scope: same owner, either side's owner absent (applies to
///   everyone), or the same present resource on both sides.
pub fn blocks(candidate: &Candidate, existing: &ScheduledItem) -> bool {
    if let Some(excluded) = &candidate.exclude {
        if existing.id == *excluded {
            return false;
        }
    }
    if existing.is_cancelled() {
        return false;
    }
    if !candidate.interval.overlaps(&existing.interval) {
        return false;
    }

    let owner_shared = match (&candidate.owner, &existing.owner) {
        (Some(a), Some(b)) => a == b,
        _ => true,
    };
    let resource_shared = match (&candidate.resource, &existing.resource) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    };

    owner_shared || resource_shared
}

/// All items blocking the candidate, in iteration order. Empty means the
/// placement may proceed.
pub fn find_conflicts<'a, I>(candidate: &Candidate, existing: I) -> Vec<&'a ScheduledItem>
where
    I: IntoIterator<Item = &'a ScheduledItem>,
{
    existing
        .into_iter()
        .filter(|item| blocks(candidate, item))
        .collect()
}

/// The overlap window between a candidate interval and a conflicting item,
/// for display.
#[derive(Debug, Clone, Serialize)]
pub struct OverlapDetail {
    pub item_id: String,
    pub overlap_start: NaiveDateTime,
    pub overlap_end: NaiveDateTime,
    pub overlap_minutes: i64,
}

impl OverlapDetail {
    pub fn between(candidate: &Interval, item: &ScheduledItem) -> Self {
        let overlap_start = candidate.start.max(item.interval.start);
        let overlap_end = candidate.end.min(item.interval.end);
        Self {
            item_id: item.id.clone(),
            overlap_start,
            overlap_end,
            overlap_minutes: (overlap_end - overlap_start).num_minutes(),
        }
    }
}
