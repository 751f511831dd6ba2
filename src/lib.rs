//! Bookline: recurring-schedule and conflict-detection engine
//!
//! A scheduling core for appointment-driven businesses: timezone-naive
//! event model, recurrence expansion, advisory conflict detection, and a
//! mutation service that runs against an offline snapshot or a REST backend.

pub mod backend;
pub mod business;
pub mod config;
pub mod conflict;
pub mod error;
pub mod feed;
pub mod model;
pub mod recurrence;
pub mod service;
pub mod session;

pub use backend::{MemoryBackend, RestBackend, ScheduleBackend, ScheduleSnapshot};
pub use business::BusinessKind;
pub use config::Config;
pub use conflict::{find_conflicts, Candidate, OverlapDetail};
pub use error::{BackendError, ConfigError, Result, ScheduleError};
pub use feed::{CalendarEntry, FeedAction};
pub use model::{
    AppointmentDetails, AppointmentStatus, BlockerDetails, Interval, ItemKind, ItemUpdate,
    RecurrencePattern, RecurringSeries, Resource, ResourceKind, ResourceUpdate, ScheduledItem,
    SeriesTemplate, ServiceEntry,
};
pub use recurrence::{expand, expand_series, preview, PREVIEW_LIMIT, UNLIMITED};
pub use service::{Scheduler, SeriesOutcome, SkippedOccurrence};
pub use session::{Role, Session, User};
