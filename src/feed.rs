//! Calendar widget feed.
//!
//! Flattens the store's items into the shape a rendering widget consumes
//! and routes the widget's drag/resize callbacks back through the
//! mutation service as explicit messages. Rendering-layer code never
//! touches conflict logic directly; everything funnels through
//! [`apply_action`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::backend::ScheduleBackend;
use crate::error::Result;
use crate::model::{AppointmentStatus, Interval, ItemKind, ScheduledItem};
use crate::service::Scheduler;

/// Prefix namespacing blocker entries so widget callbacks can be routed
/// back to the right collection.
const BLOCKER_PREFIX: &str = "blocker-";

/// Blockers always render in gray.
const BLOCKER_COLOR: &str = "#6c757d";

/// One entry in the flat list handed to the calendar widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub background_color: String,
}

/// A widget interaction, expressed as a message rather than a callback
/// into the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FeedAction {
    /// Drag-drop to a new slot.
    Move {
        id: String,
        new_start: NaiveDateTime,
        new_end: NaiveDateTime,
    },
    /// Drag the bottom edge; only the end instant changes.
    Resize { id: String, new_end: NaiveDateTime },
}

/// Resolve a named color to its hex value. Unknown values pass through
/// verbatim so raw hex strings keep working.
fn named_color(name: &str) -> &str {
    match name {
        "green" => "#28a745",
        "yellow" => "#ffc107",
        "red" => "#dc3545",
        "blue" => "#007bff",
        "orange" => "#fd7e14",
        "purple" => "#6f42c1",
        other => other,
    }
}

fn status_color(status: AppointmentStatus) -> &'static str {
    match status {
        AppointmentStatus::Scheduled => "#28a745",
        AppointmentStatus::Pending => "#ffc107",
        AppointmentStatus::Cancelled => "#dc3545",
        AppointmentStatus::Completed => "#007bff",
    }
}

/// Map one item to its widget entry.
pub fn entry_for(item: &ScheduledItem) -> CalendarEntry {
    match &item.kind {
        ItemKind::Appointment(details) => {
            let client = if details.client_name.is_empty() {
                "Customer"
            } else {
                details.client_name.as_str()
            };
            let services = if details.services.is_empty() {
                "Service".to_string()
            } else {
                details
                    .services
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            let background_color = details
                .color
                .as_deref()
                .map(|c| named_color(c).to_string())
                .unwrap_or_else(|| status_color(details.status).to_string());

            CalendarEntry {
                id: item.id.clone(),
                title: format!("{} - {}", client, services),
                start: item.interval.start,
                end: item.interval.end,
                background_color,
            }
        }
        ItemKind::Blocker(details) => CalendarEntry {
            id: format!("{}{}", BLOCKER_PREFIX, item.id),
            title: details.reason.clone().unwrap_or_else(|| "Blocked".to_string()),
            start: item.interval.start,
            end: item.interval.end,
            background_color: BLOCKER_COLOR.to_string(),
        },
    }
}

/// The full widget feed for a set of items.
pub fn feed<'a, I>(items: I) -> Vec<CalendarEntry>
where
    I: IntoIterator<Item = &'a ScheduledItem>,
{
    items.into_iter().map(entry_for).collect()
}

/// Strip the blocker namespace off a widget entry id.
fn item_id(entry_id: &str) -> &str {
    entry_id.strip_prefix(BLOCKER_PREFIX).unwrap_or(entry_id)
}

/// Route a widget interaction through the mutation service. Conflicts
/// surface to the caller exactly as service errors; the feed layer never
/// overrides them.
pub async fn apply_action<B: ScheduleBackend>(
    scheduler: &Scheduler<B>,
    action: FeedAction,
) -> Result<ScheduledItem> {
    match action {
        FeedAction::Move {
            id,
            new_start,
            new_end,
        } => {
            let interval = Interval::new(new_start, new_end)?;
            scheduler.move_item(item_id(&id), interval, false).await
        }
        FeedAction::Resize { id, new_end } => {
            scheduler.resize(item_id(&id), new_end, false).await
        }
    }
}
