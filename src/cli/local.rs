//! Local execution against the offline snapshot store.
//!
//! Scheduling commands run against an in-memory backend seeded from a
//! JSON snapshot file and write the snapshot back after mutations. This
//! is the CLI analog of the browser app's demo mode: no network, same
//! engine semantics.

use std::path::PathBuf;

use tracing::debug;

use bookline::backend::{MemoryBackend, ScheduleSnapshot};
use bookline::config::Config;
use bookline::error::Result;
use bookline::service::Scheduler;

/// A snapshot-backed scheduler plus the path to write back to.
pub struct LocalStore {
    pub scheduler: Scheduler<MemoryBackend>,
    backend: MemoryBackend,
    path: PathBuf,
}

impl LocalStore {
    /// Open the configured snapshot file. A missing file starts an empty
    /// schedule; a corrupt one is an error rather than silent data loss.
    pub async fn open(config: &Config) -> Result<Self> {
        let path = config.snapshot_file();
        let snapshot = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<ScheduleSnapshot>(&content)?,
            Err(_) => {
                debug!("No snapshot at {}, starting empty", path.display());
                ScheduleSnapshot::default()
            }
        };

        let backend = MemoryBackend::from_snapshot(snapshot);
        let scheduler = Scheduler::new(backend.clone());
        scheduler.refresh().await?;
        Ok(Self {
            scheduler,
            backend,
            path,
        })
    }

    /// Write the current schedule back to the snapshot file.
    pub async fn persist(&self) -> Result<()> {
        let snapshot = self.backend.snapshot().await;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(&self.path, json)?;
        debug!("Wrote snapshot to {}", self.path.display());
        Ok(())
    }
}
