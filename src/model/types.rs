//! Core data types for the scheduling engine.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};

/// Fallback duration when a record carries no duration information.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

// ============================================================================
// Interval
// ============================================================================

/// A time interval in the salon's local time.
///
/// Instants are timezone-naive; the engine performs no timezone conversion
/// anywhere. Overlap semantics are half-open: an interval ending exactly
/// when another starts does not overlap it, so back-to-back bookings are
/// never in conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    /// Create an interval. Fails with `InvalidInterval` unless `end > start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        if end <= start {
            return Err(ScheduleError::InvalidInterval(format!(
                "end ({}) must be after start ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Interval covering `minutes` from `start`.
    pub fn with_duration(start: NaiveDateTime, minutes: i64) -> Result<Self> {
        Self::new(start, start + Duration::minutes(minutes))
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test: `a.start < b.end && b.start < a.end`.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `instant` falls inside the interval (end excluded).
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

// ============================================================================
// Scheduled items
// ============================================================================

/// Appointment lifecycle status.
///
/// `Completed` and `Cancelled` are terminal; the legal transitions are
/// enforced by the mutation service, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ScheduleError::InvalidRecord(format!(
                "unknown appointment status: {}",
                other
            ))),
        }
    }
}

/// One service line on an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub name: String,
    /// Minutes. A missing duration contributes the 60-minute default when
    /// the appointment's end instant is derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ServiceEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration_minutes: None,
            price: None,
        }
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

/// Appointment-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDetails {
    #[serde(default)]
    pub status: AppointmentStatus,
    pub client_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceEntry>,
    /// Set once the appointment is linked to a completed sale; a linked
    /// appointment can no longer be updated or deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Explicit display color; overrides the status-derived color in the
    /// calendar feed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Blocker-specific payload. Blockers carry no status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlockerDetails {
    /// Shown as "Blocked" in the calendar feed when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Variant payload of a [`ScheduledItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Appointment(AppointmentDetails),
    Blocker(BlockerDetails),
}

/// A schedulable item: one appointment or one slot blocker, normalized to
/// a uniform interval representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledItem {
    /// Opaque identifier, unique within the store.
    pub id: String,
    /// Owning staff member. Absent means the item applies to all staff; a
    /// staff-less blocker blocks everyone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Physical resource (room, equipment). Absent means none required.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(flatten)]
    pub interval: Interval,
    /// Back-reference to the generating series. Weak reference: used for
    /// display and grouping only, never ownership.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl ScheduledItem {
    /// Create an appointment with a generated id and default status.
    pub fn appointment(client_name: impl Into<String>, interval: Interval) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: None,
            resource: None,
            interval,
            series: None,
            kind: ItemKind::Appointment(AppointmentDetails {
                status: AppointmentStatus::default(),
                client_name: client_name.into(),
                services: Vec::new(),
                sale_ref: None,
                notes: None,
                color: None,
            }),
        }
    }

    /// Create a slot blocker with a generated id.
    pub fn blocker(interval: Interval) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner: None,
            resource: None,
            interval,
            series: None,
            kind: ItemKind::Blocker(BlockerDetails::default()),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
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

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    /// Set the status. No effect on blockers.
    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        if let ItemKind::Appointment(details) = &mut self.kind {
            details.status = status;
        }
        self
    }

    /// Set the service list. No effect on blockers.
    pub fn with_services(mut self, services: Vec<ServiceEntry>) -> Self {
        if let ItemKind::Appointment(details) = &mut self.kind {
            details.services = services;
        }
        self
    }

    /// Set the display color. No effect on blockers.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        if let ItemKind::Appointment(details) = &mut self.kind {
            details.color = Some(color.into());
        }
        self
    }

    /// Set the reason. No effect on appointments.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        if let ItemKind::Blocker(details) = &mut self.kind {
            details.reason = Some(reason.into());
        }
        self
    }

    pub fn is_appointment(&self) -> bool {
        matches!(self.kind, ItemKind::Appointment(_))
    }

    pub fn is_blocker(&self) -> bool {
        matches!(self.kind, ItemKind::Blocker(_))
    }

    pub fn as_appointment(&self) -> Option<&AppointmentDetails> {
        match &self.kind {
            ItemKind::Appointment(details) => Some(details),
            ItemKind::Blocker(_) => None,
        }
    }

    pub fn as_appointment_mut(&mut self) -> Option<&mut AppointmentDetails> {
        match &mut self.kind {
            ItemKind::Appointment(details) => Some(details),
            ItemKind::Blocker(_) => None,
        }
    }

    pub fn as_blocker(&self) -> Option<&BlockerDetails> {
        match &self.kind {
            ItemKind::Blocker(details) => Some(details),
            ItemKind::Appointment(_) => None,
        }
    }

    /// Appointment status; `None` for blockers.
    pub fn status(&self) -> Option<AppointmentStatus> {
        self.as_appointment().map(|d| d.status)
    }

    /// Cancelled appointments are invisible to conflict detection.
    /// Blockers are never cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status() == Some(AppointmentStatus::Cancelled)
    }
}

// ============================================================================
// Recurring series
// ============================================================================

/// Recurrence pattern for a series.
///
/// Steps are fixed day counts. `Monthly` steps 30 days rather than one
/// calendar month, so a series anchored late in a month drifts backward
/// across month boundaries over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    pub fn step_days(&self) -> i64 {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ScheduleError::InvalidRecord(format!(
                "unknown recurrence pattern: {}",
                other
            ))),
        }
    }
}

/// A recurring series: a template interval plus inclusive generation
/// bounds. The template's duration is reused for every occurrence; the
/// occurrence start instants walk from `range_start` in fixed steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSeries {
    pub id: String,
    pub pattern: RecurrencePattern,
    pub anchor: Interval,
    pub range_start: NaiveDateTime,
    pub range_end: NaiveDateTime,
}

impl RecurringSeries {
    /// Create a series. Fails with `InvalidInterval` unless
    /// `range_end > range_start`.
    pub fn new(
        pattern: RecurrencePattern,
        anchor: Interval,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Result<Self> {
        if range_end <= range_start {
            return Err(ScheduleError::InvalidInterval(
                "end date must be after start date".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            pattern,
            anchor,
            range_start,
            range_end,
        })
    }

    /// Duration each occurrence inherits from the anchor.
    pub fn occurrence_duration(&self) -> Duration {
        self.anchor.duration()
    }
}

// ============================================================================
// Resources
// ============================================================================

/// Physical resource category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Room,
    Equipment,
    #[default]
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Equipment => "equipment",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "room" => Ok(Self::Room),
            "equipment" => Ok(Self::Equipment),
            "other" => Ok(Self::Other),
            other => Err(ScheduleError::InvalidRecord(format!(
                "unknown resource kind: {}",
                other
            ))),
        }
    }
}

/// A bookable physical resource (room or equipment), referenced weakly by
/// scheduled items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ResourceKind,
    #[serde(rename = "is_active", default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Resource {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            kind,
            active: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Template for the appointments a recurring series generates.
///
/// Occurrence duration is derived from the service list exactly as for a
/// single appointment (60-minute defaults), unless an explicit duration
/// overrides it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTemplate {
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl SeriesTemplate {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            owner: None,
            resource: None,
            services: Vec::new(),
            notes: None,
            color: None,
            duration_minutes: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_services(mut self, services: Vec<ServiceEntry>) -> Self {
        self.services = services;
        self
    }

    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Minutes each occurrence lasts: the explicit override when present,
    /// otherwise the summed service durations with per-entry and overall
    /// 60-minute defaults.
    pub fn occurrence_minutes(&self) -> i64 {
        if let Some(minutes) = self.duration_minutes {
            if minutes > 0 {
                return minutes;
            }
        }
        let total: i64 = self
            .services
            .iter()
            .map(|s| match s.duration_minutes {
                Some(minutes) if minutes > 0 => minutes,
                _ => DEFAULT_DURATION_MINUTES,
            })
            .sum();
        if total > 0 {
            total
        } else {
            DEFAULT_DURATION_MINUTES
        }
    }

    /// Materialize one occurrence as an appointment tied to `series_id`.
    pub fn build_item(&self, interval: Interval, series_id: &str) -> ScheduledItem {
        ScheduledItem {
            id: Uuid::new_v4().to_string(),
            owner: self.owner.clone(),
            resource: self.resource.clone(),
            interval,
            series: Some(series_id.to_string()),
            kind: ItemKind::Appointment(AppointmentDetails {
                status: AppointmentStatus::default(),
                client_name: self.client_name.clone(),
                services: self.services.clone(),
                sale_ref: None,
                notes: self.notes.clone(),
                color: self.color.clone(),
            }),
        }
    }
}

// ============================================================================
// Partial updates
// ============================================================================

/// Partial update applied to an existing item. `None` fields are left
/// unchanged. Status changes go through the transition check in the
/// mutation service; interval changes go through the conflict gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ItemUpdate {
    /// The interval the item would have after this update, validated.
    pub fn updated_interval(&self, current: &Interval) -> Result<Interval> {
        let start = self.start.unwrap_or(current.start);
        let end = self.end.unwrap_or(current.end);
        Interval::new(start, end)
    }

    /// True when the update touches the item's time placement.
    pub fn changes_interval(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Apply the non-status fields to `item`. The caller validates the
    /// interval and the status transition first.
    pub fn apply_to(&self, item: &mut ScheduledItem) {
        if let Some(start) = self.start {
            item.interval.start = start;
        }
        if let Some(end) = self.end {
            item.interval.end = end;
        }
        if let Some(owner) = &self.owner {
            item.owner = Some(owner.clone());
        }
        if let Some(resource) = &self.resource {
            item.resource = Some(resource.clone());
        }
        match &mut item.kind {
            ItemKind::Appointment(details) => {
                if let Some(status) = self.status {
                    details.status = status;
                }
                if let Some(client_name) = &self.client_name {
                    details.client_name = client_name.clone();
                }
                if let Some(services) = &self.services {
                    details.services = services.clone();
                }
                if let Some(notes) = &self.notes {
                    details.notes = Some(notes.clone());
                }
                if let Some(color) = &self.color {
                    details.color = Some(color.clone());
                }
            }
            ItemKind::Blocker(details) => {
                if let Some(reason) = &self.reason {
                    details.reason = Some(reason.clone());
                }
            }
        }
    }
}

/// Partial update applied to an existing resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,
    #[serde(rename = "is_active", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl ResourceUpdate {
    pub fn apply_to(&self, resource: &mut Resource) {
        if let Some(name) = &self.name {
            resource.name = name.clone();
        }
        if let Some(kind) = self.kind {
            resource.kind = kind;
        }
        if let Some(active) = self.active {
            resource.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn instant(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_interval_rejects_inverted_bounds() {
        assert!(Interval::new(instant(10, 0), instant(9, 0)).is_err());
        assert!(Interval::new(instant(10, 0), instant(10, 0)).is_err());
        assert!(Interval::new(instant(10, 0), instant(11, 0)).is_ok());
    }

    #[test]
    fn test_interval_overlap_is_half_open() {
        let first = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let adjacent = Interval::new(instant(11, 0), instant(12, 0)).unwrap();
        let overlapping = Interval::new(instant(10, 30), instant(11, 30)).unwrap();

        assert!(!first.overlaps(&adjacent));
        assert!(!adjacent.overlaps(&first));
        assert!(first.overlaps(&overlapping));
        assert!(overlapping.overlaps(&first));
    }

    #[test]
    fn test_interval_contains_excludes_end() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        assert!(interval.contains(instant(10, 0)));
        assert!(interval.contains(instant(10, 59)));
        assert!(!interval.contains(instant(11, 0)));
    }

    #[test]
    fn test_appointment_builder() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let item = ScheduledItem::appointment("Amina Odhiambo", interval)
            .with_owner("staff-7")
            .with_resource("room-1")
            .with_services(vec![ServiceEntry::new("Haircut").with_duration(45)]);

        assert!(item.is_appointment());
        assert_eq!(item.owner.as_deref(), Some("staff-7"));
        assert_eq!(item.resource.as_deref(), Some("room-1"));
        assert_eq!(item.status(), Some(AppointmentStatus::Scheduled));
        assert_eq!(item.as_appointment().unwrap().services.len(), 1);
    }

    #[test]
    fn test_blocker_has_no_status() {
        let interval = Interval::new(instant(12, 0), instant(13, 0)).unwrap();
        let blocker = ScheduledItem::blocker(interval).with_reason("Lunch");

        assert!(blocker.is_blocker());
        assert_eq!(blocker.status(), None);
        assert!(!blocker.is_cancelled());
        assert_eq!(blocker.as_blocker().unwrap().reason.as_deref(), Some("Lunch"));
    }

    #[test]
    fn test_status_builder_ignores_blockers() {
        let interval = Interval::new(instant(12, 0), instant(13, 0)).unwrap();
        let blocker = ScheduledItem::blocker(interval).with_status(AppointmentStatus::Cancelled);
        assert_eq!(blocker.status(), None);
    }

    #[test]
    fn test_pattern_step_days() {
        assert_eq!(RecurrencePattern::Daily.step_days(), 1);
        assert_eq!(RecurrencePattern::Weekly.step_days(), 7);
        assert_eq!(RecurrencePattern::Monthly.step_days(), 30);
    }

    #[test]
    fn test_pattern_round_trip() {
        for pattern in [
            RecurrencePattern::Daily,
            RecurrencePattern::Weekly,
            RecurrencePattern::Monthly,
        ] {
            assert_eq!(pattern.as_str().parse::<RecurrencePattern>().unwrap(), pattern);
        }
        assert!("fortnightly".parse::<RecurrencePattern>().is_err());
    }

    #[test]
    fn test_series_rejects_inverted_range() {
        let anchor = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let result = RecurringSeries::new(
            RecurrencePattern::Weekly,
            anchor,
            instant(10, 0),
            instant(9, 0),
        );
        assert!(matches!(result, Err(ScheduleError::InvalidInterval(_))));
    }

    #[test]
    fn test_item_serde_round_trip() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let item = ScheduledItem::appointment("Ras Kip", interval)
            .with_owner("staff-2")
            .with_status(AppointmentStatus::Pending);

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"appointment\""));
        assert!(json.contains("\"status\":\"pending\""));

        let back: ScheduledItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_resource_defaults() {
        let json = r#"{"id": "r1", "name": "Massage Room"}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.kind, ResourceKind::Other);
        assert!(resource.active);
    }

    #[test]
    fn test_update_interval_validation() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let update = ItemUpdate {
            end: Some(instant(9, 0)),
            ..Default::default()
        };
        assert!(update.updated_interval(&interval).is_err());

        let update = ItemUpdate {
            end: Some(instant(12, 0)),
            ..Default::default()
        };
        let updated = update.updated_interval(&interval).unwrap();
        assert_eq!(updated.start, interval.start);
        assert_eq!(updated.end, instant(12, 0));
    }

    #[test]
    fn test_template_duration_derivation() {
        let template = SeriesTemplate::new("Naliaka").with_services(vec![
            ServiceEntry::new("Braiding").with_duration(120),
            ServiceEntry::new("Wash"),
        ]);
        assert_eq!(template.occurrence_minutes(), 180);

        assert_eq!(SeriesTemplate::new("Naliaka").occurrence_minutes(), 60);
        assert_eq!(
            SeriesTemplate::new("Naliaka").with_duration(45).occurrence_minutes(),
            45
        );
    }

    #[test]
    fn test_template_build_item_carries_series_ref() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let item = SeriesTemplate::new("Naliaka")
            .with_owner("staff-4")
            .build_item(interval, "series-1");

        assert_eq!(item.series.as_deref(), Some("series-1"));
        assert_eq!(item.owner.as_deref(), Some("staff-4"));
        assert_eq!(item.status(), Some(AppointmentStatus::Scheduled));
    }

    #[test]
    fn test_update_apply_to_appointment() {
        let interval = Interval::new(instant(10, 0), instant(11, 0)).unwrap();
        let mut item = ScheduledItem::appointment("Wanjiru", interval);
        let update = ItemUpdate {
            client_name: Some("Wanjiru N.".to_string()),
            notes: Some("prefers window seat".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut item);

        let details = item.as_appointment().unwrap();
        assert_eq!(details.client_name, "Wanjiru N.");
        assert_eq!(details.notes.as_deref(), Some("prefers window seat"));
    }
}
