//! Schedule mutation orchestration.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::backend::ScheduleBackend;
use crate::conflict::{self, Candidate};
use crate::error::{Result, ScheduleError};
use crate::model::{
    AppointmentStatus, Interval, ItemUpdate, RecurrencePattern, RecurringSeries, Resource,
    ResourceKind, ResourceUpdate, ScheduledItem, SeriesTemplate,
};
use crate::recurrence;
use crate::service::status::validate_transition;

/// Outcome of committing a recurring series: the occurrences that cleared
/// the conflict gate and were persisted, and the ones skipped with their
/// conflict sets.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesOutcome {
    pub series: RecurringSeries,
    pub created: Vec<ScheduledItem>,
    pub skipped: Vec<SkippedOccurrence>,
}

/// One occurrence the conflict gate rejected.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedOccurrence {
    pub interval: Interval,
    pub conflicts: Vec<ScheduledItem>,
}

#[derive(Debug, Default)]
struct LocalState {
    items: Vec<ScheduledItem>,
    series: Vec<RecurringSeries>,
    resources: Vec<Resource>,
}

/// The schedule mutation service.
///
/// The only component that creates, moves, resizes, bulk-generates, or
/// changes the status of items. Every mutation runs the conflict detector
/// before committing through the backend; the backend's response is
/// authoritative and replaces local state. A failed backend call leaves
/// local state unchanged.
pub struct Scheduler<B: ScheduleBackend> {
    backend: B,
    state: Arc<RwLock<LocalState>>,
}

impl<B: ScheduleBackend> Scheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(LocalState::default())),
        }
    }

    /// Replace local state with the backend's current collections.
    pub async fn refresh(&self) -> Result<()> {
        let items = self.backend.list_items().await?;
        let series = self.backend.list_series().await?;
        let resources = self.backend.list_resources().await?;

        let mut state = self.state.write().await;
        debug!(
            "Refreshed local state: {} items, {} series, {} resources",
            items.len(),
            series.len(),
            resources.len()
        );
        state.items = items;
        state.series = series;
        state.resources = resources;
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub async fn items(&self) -> Vec<ScheduledItem> {
        self.state.read().await.items.clone()
    }

    pub async fn item(&self, id: &str) -> Result<ScheduledItem> {
        self.state
            .read()
            .await
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| ScheduleError::NotFound(format!("item {}", id)))
    }

    /// Items whose intervals overlap `range` (half-open).
    pub async fn items_overlapping(&self, range: &Interval) -> Vec<ScheduledItem> {
        self.state
            .read()
            .await
            .items
            .iter()
            .filter(|i| i.interval.overlaps(range))
            .cloned()
            .collect()
    }

    pub async fn series_list(&self) -> Vec<RecurringSeries> {
        self.state.read().await.series.clone()
    }

    pub async fn resources(&self) -> Vec<Resource> {
        self.state.read().await.resources.clone()
    }

    /// Advisory conflict query for UI ticks; no side effects.
    pub async fn check(&self, candidate: &Candidate) -> Vec<ScheduledItem> {
        let state = self.state.read().await;
        conflict::find_conflicts(candidate, state.items.iter())
            .into_iter()
            .cloned()
            .collect()
    }

    // ========================================================================
    // Item mutations
    // ========================================================================

    /// Create an item. Fails with `Conflict` when the placement is blocked;
    /// never partially applies.
    pub async fn create(&self, item: ScheduledItem) -> Result<ScheduledItem> {
        let candidate = Candidate {
            interval: item.interval,
            owner: item.owner.clone(),
            resource: item.resource.clone(),
            exclude: None,
        };
        self.ensure_free(&candidate).await?;

        debug!("Creating item {} ({})", item.id, item.interval);
        let persisted = self.backend.create_item(&item).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Apply a partial update. Status changes are transition-checked;
    /// changes to the interval or to the owner/resource scope re-run the
    /// conflict gate with the item itself excluded.
    pub async fn update(&self, id: &str, update: ItemUpdate) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        guard_mutable(&item, "update")?;

        if let (Some(new_status), Some(current)) = (update.status, item.status()) {
            validate_transition(current, new_status)?;
        }

        let new_interval = update.updated_interval(&item.interval)?;
        let rescoped = update.changes_interval()
            || update.owner.is_some()
            || update.resource.is_some();
        if rescoped {
            let candidate = Candidate {
                interval: new_interval,
                owner: update.owner.clone().or_else(|| item.owner.clone()),
                resource: update.resource.clone().or_else(|| item.resource.clone()),
                exclude: Some(item.id.clone()),
            };
            self.ensure_free(&candidate).await?;
        }

        debug!("Updating item {}", id);
        let persisted = self.backend.update_item(id, &update).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Move an item to a new interval. On conflict the caller receives the
    /// conflicting set and decides whether to abort or re-issue with
    /// `force`; the service reports, it does not decide policy.
    pub async fn move_item(
        &self,
        id: &str,
        new_interval: Interval,
        force: bool,
    ) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        guard_mutable(&item, "move")?;

        if !force {
            let candidate = Candidate::for_item(&item).with_interval(new_interval);
            self.ensure_free(&candidate).await?;
        }

        debug!("Moving item {} to {}", id, new_interval);
        let update = ItemUpdate {
            start: Some(new_interval.start),
            end: Some(new_interval.end),
            ..Default::default()
        };
        let persisted = self.backend.update_item(id, &update).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Change only the end instant. Fails with `InvalidInterval` when
    /// `new_end` does not leave a positive duration.
    pub async fn resize(&self, id: &str, new_end: NaiveDateTime, force: bool) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        guard_mutable(&item, "resize")?;

        let new_interval = Interval::new(item.interval.start, new_end)?;
        if !force {
            let candidate = Candidate::for_item(&item).with_interval(new_interval);
            self.ensure_free(&candidate).await?;
        }

        debug!("Resizing item {} to end {}", id, new_end);
        let update = ItemUpdate {
            end: Some(new_end),
            ..Default::default()
        };
        let persisted = self.backend.update_item(id, &update).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Delete an item. Completed and sale-linked appointments are guarded;
    /// blockers delete unconditionally.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let item = self.item(id).await?;
        guard_mutable(&item, "delete")?;

        debug!("Deleting item {}", id);
        self.backend.delete_item(id).await?;
        let mut state = self.state.write().await;
        state.items.retain(|i| i.id != id);
        Ok(())
    }

    // ========================================================================
    // Status operations
    // ========================================================================

    /// Mark an appointment completed, optionally linking it to a sale.
    pub async fn complete(&self, id: &str, sale_ref: Option<&str>) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        let details = item.as_appointment().ok_or_else(|| {
            ScheduleError::Guarded("slot blockers have no status".to_string())
        })?;

        if details.status == AppointmentStatus::Completed {
            return Err(ScheduleError::Guarded(
                "appointment is already completed".to_string(),
            ));
        }
        if details.sale_ref.is_some() {
            return Err(ScheduleError::Guarded(
                "appointment is already linked to a sale".to_string(),
            ));
        }
        validate_transition(details.status, AppointmentStatus::Completed)?;

        debug!("Completing item {}", id);
        let persisted = self.backend.complete_item(id, sale_ref).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Claim an unassigned appointment for a staff member.
    pub async fn accept(&self, id: &str, staff: &str) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        let details = item.as_appointment().ok_or_else(|| {
            ScheduleError::Guarded("slot blockers have no status".to_string())
        })?;

        if let Some(owner) = &item.owner {
            return Err(ScheduleError::Guarded(if owner == staff {
                "appointment is already assigned to you".to_string()
            } else {
                "appointment is already assigned to another staff member".to_string()
            }));
        }
        if details.status.is_terminal() {
            return Err(ScheduleError::Guarded(format!(
                "cannot accept an appointment with status: {}",
                details.status
            )));
        }

        debug!("Assigning item {} to staff {}", id, staff);
        let persisted = self.backend.accept_item(id, staff).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    /// Cancel an appointment.
    pub async fn cancel(&self, id: &str) -> Result<ScheduledItem> {
        let item = self.item(id).await?;
        let details = item.as_appointment().ok_or_else(|| {
            ScheduleError::Guarded("slot blockers have no status".to_string())
        })?;

        if details.status == AppointmentStatus::Completed {
            return Err(ScheduleError::Guarded(
                "cannot cancel a completed appointment".to_string(),
            ));
        }
        if details.status == AppointmentStatus::Cancelled {
            return Err(ScheduleError::Guarded(
                "appointment is already cancelled".to_string(),
            ));
        }
        validate_transition(details.status, AppointmentStatus::Cancelled)?;

        debug!("Cancelling item {}", id);
        let persisted = self.backend.cancel_item(id).await?;
        self.replace_item(persisted.clone()).await;
        Ok(persisted)
    }

    // ========================================================================
    // Series
    // ========================================================================

    /// Create a recurring series, committing the occurrences that clear
    /// the conflict gate and reporting the rest as skipped.
    ///
    /// Each occurrence is checked independently against the existing
    /// collection plus the occurrences already accepted in this batch, so
    /// a series whose occurrences overlap each other cannot self-collide.
    pub async fn create_series(
        &self,
        template: &SeriesTemplate,
        pattern: RecurrencePattern,
        range_start: NaiveDateTime,
        range_end: NaiveDateTime,
    ) -> Result<SeriesOutcome> {
        let anchor = Interval::with_duration(range_start, template.occurrence_minutes())?;
        let series = RecurringSeries::new(pattern, anchor, range_start, range_end)?;
        let occurrences = recurrence::expand_series(&series, recurrence::UNLIMITED);

        let mut accepted: Vec<ScheduledItem> = Vec::new();
        let mut skipped: Vec<SkippedOccurrence> = Vec::new();
        {
            let state = self.state.read().await;
            for occurrence in occurrences {
                let candidate = Candidate {
                    interval: occurrence,
                    owner: template.owner.clone(),
                    resource: template.resource.clone(),
                    exclude: None,
                };
                let mut conflicts: Vec<ScheduledItem> =
                    conflict::find_conflicts(&candidate, state.items.iter())
                        .into_iter()
                        .cloned()
                        .collect();
                conflicts.extend(
                    conflict::find_conflicts(&candidate, accepted.iter())
                        .into_iter()
                        .cloned(),
                );

                if conflicts.is_empty() {
                    accepted.push(template.build_item(occurrence, &series.id));
                } else {
                    skipped.push(SkippedOccurrence {
                        interval: occurrence,
                        conflicts,
                    });
                }
            }
        }

        let created = self
            .backend
            .create_series(&series, template, &accepted)
            .await?;
        {
            let mut state = self.state.write().await;
            state.series.push(series.clone());
            state.items.extend(created.iter().cloned());
        }

        info!(
            "Created series {}: {} occurrence(s) committed, {} skipped",
            series.id,
            created.len(),
            skipped.len()
        );
        Ok(SeriesOutcome {
            series,
            created,
            skipped,
        })
    }

    /// Delete a series, detaching its generated items. The items survive;
    /// only their grouping reference is cleared.
    pub async fn delete_series(&self, series_id: &str) -> Result<()> {
        {
            let state = self.state.read().await;
            if !state.series.iter().any(|s| s.id == series_id) {
                return Err(ScheduleError::NotFound(format!("series {}", series_id)));
            }
        }

        debug!("Deleting series {} (detaching items)", series_id);
        self.backend.delete_series(series_id).await?;
        let mut state = self.state.write().await;
        state.series.retain(|s| s.id != series_id);
        for item in &mut state.items {
            if item.series.as_deref() == Some(series_id) {
                item.series = None;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Resources
    // ========================================================================

    pub async fn create_resource(
        &self,
        name: impl Into<String>,
        kind: ResourceKind,
    ) -> Result<Resource> {
        let resource = Resource::new(name, kind);
        debug!("Creating resource {} ({})", resource.name, resource.kind);
        let persisted = self.backend.create_resource(&resource).await?;
        let mut state = self.state.write().await;
        state.resources.push(persisted.clone());
        Ok(persisted)
    }

    pub async fn update_resource(&self, id: &str, update: ResourceUpdate) -> Result<Resource> {
        {
            let state = self.state.read().await;
            if !state.resources.iter().any(|r| r.id == id) {
                return Err(ScheduleError::NotFound(format!("resource {}", id)));
            }
        }

        let persisted = self.backend.update_resource(id, &update).await?;
        let mut state = self.state.write().await;
        if let Some(existing) = state.resources.iter_mut().find(|r| r.id == id) {
            *existing = persisted.clone();
        }
        Ok(persisted)
    }

    /// Delete a resource. Guarded while any item still references it.
    pub async fn delete_resource(&self, id: &str) -> Result<()> {
        {
            let state = self.state.read().await;
            if !state.resources.iter().any(|r| r.id == id) {
                return Err(ScheduleError::NotFound(format!("resource {}", id)));
            }
            if state.items.iter().any(|i| i.resource.as_deref() == Some(id)) {
                return Err(ScheduleError::Guarded(
                    "cannot delete a resource that is assigned to appointments".to_string(),
                ));
            }
        }

        debug!("Deleting resource {}", id);
        self.backend.delete_resource(id).await?;
        let mut state = self.state.write().await;
        state.resources.retain(|r| r.id != id);
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn ensure_free(&self, candidate: &Candidate) -> Result<()> {
        let state = self.state.read().await;
        let conflicts: Vec<ScheduledItem> =
            conflict::find_conflicts(candidate, state.items.iter())
                .into_iter()
                .cloned()
                .collect();
        if conflicts.is_empty() {
            Ok(())
        } else {
            warn!(
                "Conflict check failed for {}: {} overlapping item(s)",
                candidate.interval,
                conflicts.len()
            );
            Err(ScheduleError::Conflict { conflicts })
        }
    }

    async fn replace_item(&self, item: ScheduledItem) {
        let mut state = self.state.write().await;
        if let Some(existing) = state.items.iter_mut().find(|i| i.id == item.id) {
            *existing = item;
        } else {
            state.items.push(item);
        }
    }
}

fn guard_mutable(item: &ScheduledItem, verb: &str) -> Result<()> {
    if let Some(details) = item.as_appointment() {
        if details.status == AppointmentStatus::Completed {
            return Err(ScheduleError::Guarded(format!(
                "cannot {} a completed appointment",
                verb
            )));
        }
        if details.sale_ref.is_some() {
            return Err(ScheduleError::Guarded(format!(
                "cannot {} an appointment linked to a sale",
                verb
            )));
        }
    }
    Ok(())
}
