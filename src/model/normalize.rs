//! Normalization of raw backend records into [`ScheduledItem`]s.
//!
//! Backend appointments carry a start instant plus a nested service list;
//! their end instant is derived from the summed service durations. Slot
//! blockers carry explicit start and end date strings. Both arrive with
//! ISO-8601 date strings and integer ids; everything here is a pure
//! transform with no side effects.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ScheduleError};
use crate::model::types::{
    AppointmentDetails, AppointmentStatus, BlockerDetails, Interval, ItemKind, Resource,
    ResourceKind, ScheduledItem, ServiceEntry, DEFAULT_DURATION_MINUTES,
};

/// Parse an ISO-8601-ish instant into a timezone-naive local instant.
///
/// A trailing `Z` or UTC offset is dropped, keeping the wall-clock reading
/// unchanged; all engine times are naive local time and no conversion is
/// ever performed. Date-only strings resolve to midnight.
pub fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ScheduleError::InvalidRecord(
            "empty date string".to_string(),
        ));
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(instant);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // Date-only inputs come from all-day pickers.
        if let Some(instant) = date.and_hms_opt(0, 0, 0) {
            return Ok(instant);
        }
    }

    Err(ScheduleError::InvalidRecord(format!(
        "unparseable date: {}",
        raw
    )))
}

/// Service line as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawService {
    pub name: String,
    /// Minutes; absent or non-positive falls back to the 60-minute default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCustomer {
    #[serde(default)]
    pub name: String,
}

/// Appointment record as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAppointment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<RawCustomer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<RawService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_appointment_id: Option<i64>,
}

/// Slot blocker record as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBlocker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Absent applies the blocker to all staff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Resource record as the backend serializes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Sum of service durations in minutes, with the 60-minute default applied
/// per missing entry and to an empty list.
fn derived_duration_minutes(services: &[RawService]) -> i64 {
    let total: i64 = services
        .iter()
        .map(|s| match s.duration {
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

fn id_or_generated(id: Option<i64>) -> String {
    id.map(|n| n.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

impl RawAppointment {
    /// Normalize into a [`ScheduledItem`], deriving the end instant from
    /// the service durations.
    pub fn normalize(&self) -> Result<ScheduledItem> {
        let start_raw = self.appointment_date.as_deref().ok_or_else(|| {
            ScheduleError::InvalidRecord("appointment is missing appointment_date".to_string())
        })?;
        let start = parse_instant(start_raw)?;
        let interval = Interval::with_duration(start, derived_duration_minutes(&self.services))?;

        let status = match self.status.as_deref() {
            Some(raw) => raw.parse::<AppointmentStatus>()?,
            None => AppointmentStatus::default(),
        };

        Ok(ScheduledItem {
            id: id_or_generated(self.id),
            owner: self.staff_id.map(|n| n.to_string()),
            resource: self.resource_id.map(|n| n.to_string()),
            interval,
            series: self.parent_appointment_id.map(|n| n.to_string()),
            kind: ItemKind::Appointment(AppointmentDetails {
                status,
                client_name: self
                    .customer
                    .as_ref()
                    .map(|c| c.name.clone())
                    .unwrap_or_default(),
                services: self
                    .services
                    .iter()
                    .map(|s| ServiceEntry {
                        name: s.name.clone(),
                        duration_minutes: s.duration,
                        price: s.price,
                    })
                    .collect(),
                sale_ref: self.sale_id.map(|n| n.to_string()),
                notes: self.notes.clone(),
                color: self.color.clone(),
            }),
        })
    }
}

impl RawBlocker {
    /// Normalize into a [`ScheduledItem`]. Both date bounds are required;
    /// an inverted pair fails with `InvalidInterval`.
    pub fn normalize(&self) -> Result<ScheduledItem> {
        let start_raw = self.start_date.as_deref().ok_or_else(|| {
            ScheduleError::InvalidRecord("blocker is missing start_date".to_string())
        })?;
        let end_raw = self.end_date.as_deref().ok_or_else(|| {
            ScheduleError::InvalidRecord("blocker is missing end_date".to_string())
        })?;
        let interval = Interval::new(parse_instant(start_raw)?, parse_instant(end_raw)?)?;

        Ok(ScheduledItem {
            id: id_or_generated(self.id),
            owner: self.staff_id.map(|n| n.to_string()),
            resource: None,
            interval,
            series: None,
            kind: ItemKind::Blocker(BlockerDetails {
                reason: self.reason.clone(),
            }),
        })
    }
}

impl RawResource {
    pub fn normalize(&self) -> Result<Resource> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::InvalidRecord(
                "resource name is required".to_string(),
            ));
        }
        let kind = match self.kind.as_deref() {
            Some(raw) => raw.parse::<ResourceKind>()?,
            None => ResourceKind::default(),
        };
        Ok(Resource {
            id: id_or_generated(self.id),
            name: self.name.clone(),
            kind,
            active: self.is_active.unwrap_or(true),
        })
    }
}
