//! REST backend client.
//!
//! Talks to the salon backend over HTTP with JSON bodies and the
//! `X-User-Id` header from the active session. Appointments and slot
//! blockers live behind separate endpoints; blocker ids are prefixed
//! `sb-` locally so the two collections share one id space in the store
//! and updates route back to the right endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::backend::ScheduleBackend;
use crate::error::{BackendError, Result, ScheduleError};
use crate::model::{
    ItemKind, ItemUpdate, RawAppointment, RawBlocker, RawResource, RecurringSeries, Resource,
    ResourceUpdate, ScheduledItem, SeriesTemplate,
};

/// Local id prefix for slot blockers.
const BLOCKER_ID_PREFIX: &str = "sb-";

/// Error body the backend sends with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Body of `POST /appointments/recurring`.
#[derive(Debug, Serialize)]
struct RecurringRequest<'a> {
    template: &'a SeriesTemplate,
    pattern: &'a str,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct RecurringResponse {
    #[serde(default)]
    appointments: Vec<RawAppointment>,
}

/// HTTP client for the authoritative scheduling backend.
pub struct RestBackend {
    client: Client,
    base_url: String,
    user_id: Option<String>,
}

impl RestBackend {
    /// Build a client for `base_url` with a request timeout. `user_id`
    /// comes from the active session and fills the `X-User-Id` header;
    /// `None` issues unauthenticated requests.
    pub fn new(base_url: &str, user_id: Option<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                BackendError::Connection(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, url);
        if let Some(user_id) = &self.user_id {
            builder = builder.header("X-User-Id", user_id);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout
            } else if e.is_connect() {
                BackendError::Connection(e.to_string())
            } else {
                BackendError::Api(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Non-2xx carries an `{error}` body; fall back to the HTTP status.
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        if status == StatusCode::CONFLICT {
            debug!("Backend reported a conflict: {}", message);
        }
        Err(BackendError::Api(message).into())
    }

    async fn parse<T: serde::de::DeserializeOwned>(&self, response: Response) -> Result<T> {
        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()).into())
    }

    fn split_blocker_id(id: &str) -> Option<&str> {
        id.strip_prefix(BLOCKER_ID_PREFIX)
    }

    fn normalize_blocker(raw: &RawBlocker) -> Result<ScheduledItem> {
        let item = raw.normalize()?;
        let id = format!("{}{}", BLOCKER_ID_PREFIX, item.id);
        Ok(item.with_id(id))
    }

    async fn fetch_appointment(&self, id: &str) -> Result<ScheduledItem> {
        let response = self
            .send(self.request(Method::GET, &format!("/appointments/{}", id)))
            .await?;
        let raw: RawAppointment = self.parse(response).await?;
        raw.normalize()
    }
}

#[async_trait]
impl ScheduleBackend for RestBackend {
    async fn list_items(&self) -> Result<Vec<ScheduledItem>> {
        let response = self.send(self.request(Method::GET, "/appointments")).await?;
        let appointments: Vec<RawAppointment> = self.parse(response).await?;

        let response = self.send(self.request(Method::GET, "/slot-blockers")).await?;
        let blockers: Vec<RawBlocker> = self.parse(response).await?;

        let mut items = Vec::with_capacity(appointments.len() + blockers.len());
        for raw in &appointments {
            items.push(raw.normalize()?);
        }
        for raw in &blockers {
            items.push(Self::normalize_blocker(raw)?);
        }
        Ok(items)
    }

    async fn list_series(&self) -> Result<Vec<RecurringSeries>> {
        // The backend stores series membership as a parent reference on
        // each occurrence rather than as standalone series records.
        Ok(Vec::new())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let response = self.send(self.request(Method::GET, "/resources")).await?;
        let raw: Vec<RawResource> = self.parse(response).await?;
        raw.iter().map(|r| r.normalize()).collect()
    }

    async fn create_item(&self, item: &ScheduledItem) -> Result<ScheduledItem> {
        match &item.kind {
            ItemKind::Appointment(details) => {
                let body = json!({
                    "appointment_date": item.interval.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "staff_id": item.owner,
                    "resource_id": item.resource,
                    "status": details.status.as_str(),
                    "customer_name": details.client_name,
                    "services": details.services,
                    "notes": details.notes,
                    "color": details.color,
                });
                let response = self
                    .send(self.request(Method::POST, "/appointments").json(&body))
                    .await?;
                let raw: RawAppointment = self.parse(response).await?;
                raw.normalize()
            }
            ItemKind::Blocker(details) => {
                let body = json!({
                    "staff_id": item.owner,
                    "start_date": item.interval.start.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "end_date": item.interval.end.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    "reason": details.reason,
                });
                let response = self
                    .send(self.request(Method::POST, "/slot-blockers").json(&body))
                    .await?;
                let raw: RawBlocker = self.parse(response).await?;
                Self::normalize_blocker(&raw)
            }
        }
    }

    async fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<ScheduledItem> {
        if let Some(blocker_id) = Self::split_blocker_id(id) {
            let mut body = serde_json::Map::new();
            if let Some(start) = update.start {
                body.insert(
                    "start_date".to_string(),
                    json!(start.format("%Y-%m-%dT%H:%M:%S").to_string()),
                );
            }
            if let Some(end) = update.end {
                body.insert(
                    "end_date".to_string(),
                    json!(end.format("%Y-%m-%dT%H:%M:%S").to_string()),
                );
            }
            if let Some(owner) = &update.owner {
                body.insert("staff_id".to_string(), json!(owner));
            }
            if let Some(reason) = &update.reason {
                body.insert("reason".to_string(), json!(reason));
            }
            let response = self
                .send(
                    self.request(Method::PUT, &format!("/slot-blockers/{}", blocker_id))
                        .json(&body),
                )
                .await?;
            let raw: RawBlocker = self.parse(response).await?;
            Self::normalize_blocker(&raw)
        } else {
            let mut body = serde_json::Map::new();
            if let Some(start) = update.start {
                body.insert(
                    "appointment_date".to_string(),
                    json!(start.format("%Y-%m-%dT%H:%M:%S").to_string()),
                );
            }
            if let Some(end) = update.end {
                body.insert(
                    "end_date".to_string(),
                    json!(end.format("%Y-%m-%dT%H:%M:%S").to_string()),
                );
            }
            if let Some(owner) = &update.owner {
                body.insert("staff_id".to_string(), json!(owner));
            }
            if let Some(resource) = &update.resource {
                body.insert("resource_id".to_string(), json!(resource));
            }
            if let Some(status) = update.status {
                body.insert("status".to_string(), json!(status.as_str()));
            }
            if let Some(notes) = &update.notes {
                body.insert("notes".to_string(), json!(notes));
            }
            if let Some(color) = &update.color {
                body.insert("color".to_string(), json!(color));
            }
            let response = self
                .send(
                    self.request(Method::PUT, &format!("/appointments/{}", id))
                        .json(&body),
                )
                .await?;
            let raw: RawAppointment = self.parse(response).await?;
            raw.normalize()
        }
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let path = match Self::split_blocker_id(id) {
            Some(blocker_id) => format!("/slot-blockers/{}", blocker_id),
            None => format!("/appointments/{}", id),
        };
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    async fn complete_item(&self, id: &str, sale_ref: Option<&str>) -> Result<ScheduledItem> {
        let body = json!({ "sale_id": sale_ref });
        self.send(
            self.request(Method::POST, &format!("/appointments/{}/complete", id))
                .json(&body),
        )
        .await?;
        self.fetch_appointment(id).await
    }

    async fn accept_item(&self, id: &str, staff: &str) -> Result<ScheduledItem> {
        let body = json!({ "staff_id": staff });
        self.send(
            self.request(Method::POST, &format!("/appointments/{}/accept", id))
                .json(&body),
        )
        .await?;
        self.fetch_appointment(id).await
    }

    async fn cancel_item(&self, id: &str) -> Result<ScheduledItem> {
        self.send(self.request(Method::POST, &format!("/appointments/{}/cancel", id)))
            .await?;
        self.fetch_appointment(id).await
    }

    async fn create_series(
        &self,
        series: &RecurringSeries,
        template: &SeriesTemplate,
        _accepted: &[ScheduledItem],
    ) -> Result<Vec<ScheduledItem>> {
        // The backend runs its own expansion and conflict pass; the
        // locally accepted occurrences are advisory only.
        let body = RecurringRequest {
            template,
            pattern: series.pattern.as_str(),
            start_date: series.range_start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end_date: series.range_end.format("%Y-%m-%dT%H:%M:%S").to_string(),
        };
        let response = self
            .send(self.request(Method::POST, "/appointments/recurring").json(&body))
            .await?;
        let created: RecurringResponse = self.parse(response).await?;
        created
            .appointments
            .iter()
            .map(|raw| raw.normalize())
            .collect()
    }

    async fn delete_series(&self, series_id: &str) -> Result<()> {
        Err(ScheduleError::Guarded(format!(
            "the remote backend does not support deleting series {} directly",
            series_id
        )))
    }

    async fn create_resource(&self, resource: &Resource) -> Result<Resource> {
        let body = json!({
            "name": resource.name,
            "type": resource.kind.as_str(),
            "is_active": resource.active,
        });
        let response = self
            .send(self.request(Method::POST, "/resources").json(&body))
            .await?;
        let raw: RawResource = self.parse(response).await?;
        raw.normalize()
    }

    async fn update_resource(&self, id: &str, update: &ResourceUpdate) -> Result<Resource> {
        let response = self
            .send(
                self.request(Method::PUT, &format!("/resources/{}", id))
                    .json(update),
            )
            .await?;
        let raw: RawResource = self.parse(response).await?;
        raw.normalize()
    }

    async fn delete_resource(&self, id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &format!("/resources/{}", id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalization() {
        let backend = RestBackend::new("http://localhost:5001/api/", None, 30).unwrap();
        assert!(!backend.base_url.ends_with('/'));
    }

    #[test]
    fn test_blocker_id_prefix_round_trip() {
        let raw = RawBlocker {
            id: Some(41),
            staff_id: None,
            start_date: Some("2026-01-15T12:00:00".to_string()),
            end_date: Some("2026-01-15T13:00:00".to_string()),
            reason: None,
        };
        let item = RestBackend::normalize_blocker(&raw).unwrap();
        assert_eq!(item.id, "sb-41");
        assert_eq!(RestBackend::split_blocker_id(&item.id), Some("41"));
        assert_eq!(RestBackend::split_blocker_id("41"), None);
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "End date must be after start date"}"#).unwrap();
        assert_eq!(body.error, "End date must be after start date");
    }

    #[test]
    fn test_recurring_request_shape() {
        let template = SeriesTemplate::new("Chebet");
        let start = chrono::NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let request = RecurringRequest {
            template: &template,
            pattern: "weekly",
            start_date: start.format("%Y-%m-%dT%H:%M:%S").to_string(),
            end_date: "2026-01-22T09:00:00".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["pattern"], "weekly");
        assert_eq!(json["start_date"], "2026-01-01T09:00:00");
        assert!(json["template"].is_object());
    }
}
