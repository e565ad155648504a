//! # vidmux-convert
//!
//! Conversion orchestration for the vidmux tool.
//!
//! This crate provides:
//!
//! - **Format catalog** ([`FormatCatalog`]) -- supported target formats,
//!   their file extensions, and HTTP content types.
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache the path to
//!   ffmpeg.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Conversion engine** ([`ConversionEngine`]) -- two-phase conversion of
//!   a single file (stream copy, falling back to re-encode).
//! - **Batch scheduling** ([`BatchScheduler`]) -- directory discovery plus a
//!   bounded worker pool.
//! - **Result aggregation** ([`stats::summarize`]) -- batch statistics.

pub mod batch;
pub mod command;
pub mod engine;
pub mod formats;
pub mod stats;
pub mod tools;

// ---- Re-exports for convenience ----

pub use batch::BatchScheduler;
pub use command::{ToolCommand, ToolOutput};
pub use engine::{ConversionEngine, ConversionResult};
pub use formats::FormatCatalog;
pub use stats::BatchStats;
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
