//! Calendar event model: uniform interval-bearing items.
//!
//! Normalizes heterogeneous schedulable records (appointments with nested
//! service lists, slot blockers with raw date strings) into a single
//! [`ScheduledItem`] representation used by the expander, the conflict
//! detector, and the mutation service.

mod normalize;
mod types;

pub use normalize::{parse_instant, RawAppointment, RawBlocker, RawCustomer, RawResource, RawService};
pub use types::{
    AppointmentDetails, AppointmentStatus, BlockerDetails, Interval, ItemKind, ItemUpdate,
    RecurrencePattern, RecurringSeries, Resource, ResourceKind, ResourceUpdate, ScheduledItem,
    SeriesTemplate, ServiceEntry, DEFAULT_DURATION_MINUTES,
};
