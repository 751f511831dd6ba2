//! In-memory backend.
//!
//! Backs the offline snapshot mode of the CLI and the test suites. Applies
//! mutations verbatim after data-shape validation; business guards
//! (status transitions, sale links, conflict gating) live in the mutation
//! service, which is the only caller.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::ScheduleBackend;
use crate::error::{Result, ScheduleError};
use crate::model::{
    ItemUpdate, RecurringSeries, Resource, ResourceUpdate, ScheduledItem, SeriesTemplate,
};

/// Serializable scheduling state: the snapshot-file format of the CLI's
/// offline mode and the seed format for tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    #[serde(default)]
    pub items: Vec<ScheduledItem>,
    #[serde(default)]
    pub series: Vec<RecurringSeries>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// In-memory [`ScheduleBackend`].
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<RwLock<ScheduleSnapshot>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ScheduleSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Current state, for writing back to a snapshot file.
    pub async fn snapshot(&self) -> ScheduleSnapshot {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl ScheduleBackend for MemoryBackend {
    async fn list_items(&self) -> Result<Vec<ScheduledItem>> {
        Ok(self.state.read().await.items.clone())
    }

    async fn list_series(&self) -> Result<Vec<RecurringSeries>> {
        Ok(self.state.read().await.series.clone())
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        Ok(self.state.read().await.resources.clone())
    }

    async fn create_item(&self, item: &ScheduledItem) -> Result<ScheduledItem> {
        let mut state = self.state.write().await;
        state.items.push(item.clone());
        Ok(item.clone())
    }

    async fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<ScheduledItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("item {}", id)))?;
        update.updated_interval(&item.interval)?;
        update.apply_to(item);
        Ok(item.clone())
    }

    async fn delete_item(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.items.len();
        state.items.retain(|i| i.id != id);
        if state.items.len() == before {
            return Err(ScheduleError::NotFound(format!("item {}", id)));
        }
        Ok(())
    }

    async fn complete_item(&self, id: &str, sale_ref: Option<&str>) -> Result<ScheduledItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("item {}", id)))?;
        if let Some(details) = item.as_appointment_mut() {
            details.status = crate::model::AppointmentStatus::Completed;
            if let Some(sale) = sale_ref {
                details.sale_ref = Some(sale.to_string());
            }
        }
        Ok(item.clone())
    }

    async fn accept_item(&self, id: &str, staff: &str) -> Result<ScheduledItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("item {}", id)))?;
        item.owner = Some(staff.to_string());
        if let Some(details) = item.as_appointment_mut() {
            details.status = crate::model::AppointmentStatus::Scheduled;
        }
        Ok(item.clone())
    }

    async fn cancel_item(&self, id: &str) -> Result<ScheduledItem> {
        let mut state = self.state.write().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("item {}", id)))?;
        if let Some(details) = item.as_appointment_mut() {
            details.status = crate::model::AppointmentStatus::Cancelled;
        }
        Ok(item.clone())
    }

    async fn create_series(
        &self,
        series: &RecurringSeries,
        _template: &SeriesTemplate,
        items: &[ScheduledItem],
    ) -> Result<Vec<ScheduledItem>> {
        let mut state = self.state.write().await;
        state.series.push(series.clone());
        state.items.extend_from_slice(items);
        Ok(items.to_vec())
    }

    async fn delete_series(&self, series_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.series.len();
        state.series.retain(|s| s.id != series_id);
        if state.series.len() == before {
            return Err(ScheduleError::NotFound(format!("series {}", series_id)));
        }
        // Detach, never cascade: generated items outlive their series.
        for item in &mut state.items {
            if item.series.as_deref() == Some(series_id) {
                item.series = None;
            }
        }
        Ok(())
    }

    async fn create_resource(&self, resource: &Resource) -> Result<Resource> {
        let mut state = self.state.write().await;
        state.resources.push(resource.clone());
        Ok(resource.clone())
    }

    async fn update_resource(&self, id: &str, update: &ResourceUpdate) -> Result<Resource> {
        let mut state = self.state.write().await;
        let resource = state
            .resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ScheduleError::NotFound(format!("resource {}", id)))?;
        update.apply_to(resource);
        Ok(resource.clone())
    }

    async fn delete_resource(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.resources.len();
        state.resources.retain(|r| r.id != id);
        if state.resources.len() == before {
            return Err(ScheduleError::NotFound(format!("resource {}", id)));
        }
        Ok(())
    }
}
