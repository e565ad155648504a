//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries the
//! sub-configs for the server, conversion defaults, external tool paths, and
//! logging. Every section defaults sensibly so a completely empty `{}` file
//! is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Target formats used when the configuration does not list any explicitly.
pub const DEFAULT_FORMATS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "flv", "wmv", "webm", "mpeg", "m4v",
];

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub conversion: ConversionConfig,
    pub tools: ToolsConfig,
    pub log: LogConfig,
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.conversion.formats.is_empty() {
            warnings.push(format!(
                "conversion.formats is empty; using the default list ({})",
                DEFAULT_FORMATS.join(", ")
            ));
        }

        if self.conversion.max_workers == 0 {
            warnings.push("conversion.max_workers is 0; at least 1 worker is required".into());
        }

        if self.conversion.tool_timeout_secs == 0 {
            warnings.push("conversion.tool_timeout_secs is 0; conversions would always time out".into());
        }

        if let Some(ref p) = self.tools.ffmpeg_path {
            if !p.exists() {
                warnings.push(format!(
                    "tools.ffmpeg_path {} does not exist; falling back to PATH lookup",
                    p.display()
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            static_dir: Some(PathBuf::from("./static")),
        }
    }
}

/// Conversion defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Supported target formats, in preference order. The first entry is the
    /// default the web API advertises. Empty means "use [`DEFAULT_FORMATS`]".
    pub formats: Vec<String>,
    /// Video codec used by the re-encode phase.
    #[serde(default = "default_video_codec")]
    pub video_codec: String,
    /// Audio codec used by the re-encode phase.
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,
    /// Upper bound on concurrent conversions in batch mode.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Per-phase external tool timeout in seconds. Expiry is treated exactly
    /// like a non-zero exit: the phase fails and the engine falls back or
    /// gives up on that item.
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
}

fn default_video_codec() -> String {
    "libx264".into()
}
fn default_audio_codec() -> String {
    "aac".into()
}
fn default_max_workers() -> usize {
    4
}
fn default_tool_timeout() -> u64 {
    3600
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            formats: DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            max_workers: default_max_workers(),
            tool_timeout_secs: default_tool_timeout(),
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Append-style operational log file. `None` disables file logging.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from("vidmux.log")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.conversion.formats.len(), 9);
        assert_eq!(cfg.conversion.formats[0], "mp4");
        assert_eq!(cfg.conversion.video_codec, "libx264");
        assert_eq!(cfg.conversion.audio_codec, "aac");
        assert_eq!(cfg.conversion.max_workers, 4);
        assert_eq!(cfg.log.file, Some(PathBuf::from("vidmux.log")));
    }

    #[test]
    fn default_config_no_warnings() {
        let cfg = Config::default();
        let warnings = cfg.validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn empty_json_is_default() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg.conversion.formats.len(), 9);
        assert_eq!(cfg.conversion.max_workers, 4);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = Config::from_json(r#"{"conversion": {"max_workers": 8}}"#).unwrap();
        assert_eq!(cfg.conversion.max_workers, 8);
        assert_eq!(cfg.conversion.video_codec, "libx264");
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn invalid_json_is_error() {
        assert!(Config::from_json("not json").is_err());
    }

    #[test]
    fn zero_workers_warns() {
        let mut cfg = Config::default();
        cfg.conversion.max_workers = 0;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.contains("max_workers")));
    }

    #[test]
    fn load_missing_file_uses_defaults() {
        let cfg = Config::load_or_default(Some(Path::new("/no/such/config.json")));
        assert_eq!(cfg.server.port, 8000);
    }
}
