//! Logging setup shared by the binaries of the workspace.

pub mod config;
pub mod panic_hook;
pub mod tracing;

pub use config::{Config, Format};
