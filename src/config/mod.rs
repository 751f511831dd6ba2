//! Configuration loading for the bookline CLI and library consumers.

mod settings;

pub use settings::{BackendConfig, Config, DefaultsConfig, SessionConfig};
