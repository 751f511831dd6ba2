//! Backend trait definition.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    ItemUpdate, RecurringSeries, Resource, ResourceUpdate, ScheduledItem, SeriesTemplate,
};

/// The authoritative store of scheduling state.
///
/// The mutation service runs its advisory conflict pass first and then
/// commits through this trait; whatever the backend returns is what lands
/// in local state. A conflict the backend reports after a clean local
/// pass still surfaces to the caller.
#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    async fn list_items(&self) -> Result<Vec<ScheduledItem>>;
    async fn list_series(&self) -> Result<Vec<RecurringSeries>>;
    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Persist a new item, returning it with its authoritative id.
    async fn create_item(&self, item: &ScheduledItem) -> Result<ScheduledItem>;
    async fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<ScheduledItem>;
    async fn delete_item(&self, id: &str) -> Result<()>;

    async fn complete_item(&self, id: &str, sale_ref: Option<&str>) -> Result<ScheduledItem>;
    async fn accept_item(&self, id: &str, staff: &str) -> Result<ScheduledItem>;
    async fn cancel_item(&self, id: &str) -> Result<ScheduledItem>;

    /// Persist a series and the occurrences the service accepted,
    /// returning the authoritative created items.
    async fn create_series(
        &self,
        series: &RecurringSeries,
        template: &SeriesTemplate,
        items: &[ScheduledItem],
    ) -> Result<Vec<ScheduledItem>>;
    async fn delete_series(&self, series_id: &str) -> Result<()>;

    async fn create_resource(&self, resource: &Resource) -> Result<Resource>;
    async fn update_resource(&self, id: &str, update: &ResourceUpdate) -> Result<Resource>;
    async fn delete_resource(&self, id: &str) -> Result<()>;
}
