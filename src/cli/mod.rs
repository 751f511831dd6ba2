//! CLI command handlers for the bookline binary.
//!
//! Commands execute against either the offline snapshot store or a
//! remote REST backend; output is JSON or human-readable text.

mod commands;
mod local;
mod output;
mod remote;
pub mod types;

pub use commands::*;
pub use local::LocalStore;
