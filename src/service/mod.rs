//! Schedule mutation service.
//!
//! The only component permitted to create, move, resize, bulk-generate,
//! or change the status of scheduled items. Conflict checking happens
//! before every commit; the backend remains the authoritative arbiter.

mod scheduler;
mod status;

pub use scheduler::{Scheduler, SeriesOutcome, SkippedOccurrence};
pub use status::validate_transition;
