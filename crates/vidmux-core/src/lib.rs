//! vidmux-core: shared errors and configuration.
//!
//! This crate is the foundational dependency for the other vidmux crates,
//! providing the unified error type and the application configuration with
//! sensible defaults for every section.

pub mod config;
pub mod error;

// Re-export the most commonly used items at the crate root.
pub use config::Config;
pub use error::{Error, Result};
