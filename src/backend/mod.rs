//! Scheduling backends.
//!
//! The engine treats the backend as the authoritative store; the local
//! conflict pass is advisory. Two implementations:
//!
//! - [`RestBackend`]: the salon REST API over HTTP, authenticated with an
//!   `X-User-Id` header taken from the active session.
//! - [`MemoryBackend`]: in-process store backing the CLI's offline
//!   snapshot mode and the test suites.

mod memory;
mod rest;
mod traits;

pub use memory::{MemoryBackend, ScheduleSnapshot};
pub use rest::RestBackend;
pub use traits::ScheduleBackend;
