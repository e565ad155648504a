//! External tool discovery.
//!
//! vidmux delegates all transcoding to ffmpeg. The [`ToolRegistry`] resolves
//! its location once at startup (explicit config path first, then `PATH`) and
//! hands it out to the engine. A missing tool is a startup-fatal condition,
//! never a per-item one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use vidmux_core::config::ToolsConfig;
use vidmux_core::{Error, Result};

/// A resolved external tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Human-readable tool name (e.g. "ffmpeg").
    pub name: String,
    /// Resolved path to the executable.
    pub path: PathBuf,
}

/// Availability information for a tool, returned by [`ToolRegistry::check_all`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `-version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Resolved locations of the external tools vidmux shells out to.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    ffmpeg: Option<ToolConfig>,
}

impl ToolRegistry {
    /// Resolve ffmpeg from the config override or `PATH`.
    ///
    /// An override pointing at a path that does not exist falls back to the
    /// `PATH` lookup. Absence is not an error at this point; [`Self::ffmpeg`]
    /// turns it into one when the engine actually needs the tool.
    pub fn discover(tools_config: &ToolsConfig) -> Self {
        let ffmpeg = resolve("ffmpeg", tools_config.ffmpeg_path.as_deref());
        match &ffmpeg {
            Some(tool) => tracing::debug!(path = %tool.path.display(), "ffmpeg resolved"),
            None => tracing::debug!("ffmpeg not found"),
        }
        Self { ffmpeg }
    }

    /// The resolved ffmpeg, or [`Error::ToolMissing`] if discovery came up
    /// empty.
    pub fn ffmpeg(&self) -> Result<&ToolConfig> {
        self.ffmpeg
            .as_ref()
            .ok_or_else(|| Error::tool_missing("ffmpeg"))
    }

    /// Availability report for every tool vidmux knows about, for the
    /// `check-tools` command.
    pub fn check_all(&self) -> Vec<ToolInfo> {
        vec![describe("ffmpeg", self.ffmpeg.as_ref())]
    }
}

fn resolve(name: &str, override_path: Option<&Path>) -> Option<ToolConfig> {
    let path = match override_path {
        Some(p) if p.exists() => p.to_path_buf(),
        // No override, or the override does not exist: search PATH.
        _ => which::which(name).ok()?,
    };
    Some(ToolConfig {
        name: name.to_string(),
        path,
    })
}

fn describe(name: &str, tool: Option<&ToolConfig>) -> ToolInfo {
    match tool {
        Some(cfg) => ToolInfo {
            name: name.to_string(),
            available: true,
            version: detect_version(&cfg.path),
            path: Some(cfg.path.clone()),
        },
        None => ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        },
    }
}

/// First line of `<tool> -version` output.
fn detect_version(path: &Path) -> Option<String> {
    let output = std::process::Command::new(path)
        .arg("-version")
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
}
