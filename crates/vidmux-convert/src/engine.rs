//! Two-phase conversion of a single media file.
//!
//! The [`ConversionEngine`] first asks ffmpeg to remux the input into the
//! target container without touching the encoded streams (`-c copy`). That is
//! fast but fails whenever the target container cannot carry the source
//! codecs, in which case the engine falls back to a full re-encode with the
//! configured default codecs.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::Serialize;

use vidmux_core::config::ConversionConfig;

use crate::command::ToolCommand;
use crate::formats::FormatCatalog;
use crate::tools::{ToolConfig, ToolRegistry};

/// Outcome of converting one input file.
///
/// Failures are captured here rather than propagated: one file's failure must
/// never abort a batch. `success == true` always comes with an `output_path`;
/// for a skipped same-format input it is the input path itself.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    pub success: bool,
    pub input_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        serialize_with = "serialize_secs",
        skip_serializing_if = "Option::is_none"
    )]
    pub processing_time: Option<Duration>,
}

fn serialize_secs<S>(d: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match d {
        Some(d) => serializer.serialize_f64(d.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

impl ConversionResult {
    /// A completed conversion.
    pub fn completed(input: &Path, output: PathBuf, elapsed: Duration) -> Self {
        Self {
            success: true,
            input_path: input.to_path_buf(),
            output_path: Some(output),
            message: None,
            processing_time: Some(elapsed),
        }
    }

    /// A no-op success: the input already is in the target format.
    pub fn skipped(input: &Path, message: String) -> Self {
        Self {
            success: true,
            input_path: input.to_path_buf(),
            output_path: Some(input.to_path_buf()),
            message: Some(message),
            processing_time: None,
        }
    }

    /// A failed conversion.
    pub fn failed(input: &Path, message: String) -> Self {
        Self {
            success: false,
            input_path: input.to_path_buf(),
            output_path: None,
            message: Some(message),
            processing_time: None,
        }
    }
}

/// Converts one input file to one target format using the two-phase strategy.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    config: ConversionConfig,
    catalog: FormatCatalog,
    ffmpeg: ToolConfig,
}

impl ConversionEngine {
    /// Build an engine, verifying that ffmpeg is available.
    ///
    /// # Errors
    ///
    /// Returns [`vidmux_core::Error::ToolMissing`] if ffmpeg was not found;
    /// callers treat this as fatal before any item is attempted.
    pub fn new(config: ConversionConfig, tools: &ToolRegistry) -> vidmux_core::Result<Self> {
        let ffmpeg = tools.ffmpeg()?.clone();
        let catalog = FormatCatalog::new(&config.formats);
        Ok(Self {
            config,
            catalog,
            ffmpeg,
        })
    }

    /// The format catalog derived from this engine's configuration.
    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    /// The conversion configuration this engine was built with.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert `input` to `target_format`.
    ///
    /// Validation order: unsupported format, then missing input, then the
    /// same-format no-op (success with `output_path == input` and no external
    /// invocation). Otherwise phase A (stream copy) runs, and only if it
    /// fails phase B (re-encode). Processing time spans validation through
    /// the final outcome.
    pub async fn convert(&self, input: &Path, target_format: &str) -> ConversionResult {
        let start = Instant::now();
        let format = target_format.trim().to_ascii_lowercase();

        if !self.catalog.is_supported(&format) {
            let message = format!(
                "unsupported target format: {format}; supported formats: {}",
                self.catalog.formats().join(", ")
            );
            tracing::error!(input = %input.display(), "{message}");
            return ConversionResult::failed(input, message);
        }

        if !input.is_file() {
            let message = format!("input file not found: {}", input.display());
            tracing::error!("{message}");
            return ConversionResult::failed(input, message);
        }

        let input_ext = input
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if input_ext.as_deref() == Some(format.as_str()) {
            let message = format!(
                "skipped {}: already in {format} format",
                input.display()
            );
            tracing::info!("{message}");
            return ConversionResult::skipped(input, message);
        }

        let output = output_path(input, &format);
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "starting conversion"
        );

        // Phase A: remux without re-encoding.
        match self.stream_copy(input, &output).await {
            Ok(()) => {
                let elapsed = start.elapsed();
                tracing::info!(
                    output = %output.display(),
                    secs = elapsed.as_secs_f64(),
                    "stream copy complete"
                );
                return ConversionResult::completed(input, output, elapsed);
            }
            Err(e) => {
                tracing::warn!(
                    input = %input.display(),
                    error = %e,
                    "stream copy failed, falling back to re-encode"
                );
            }
        }

        // Phase B: full re-encode with the default codecs.
        match self.reencode(input, &output).await {
            Ok(()) => {
                let elapsed = start.elapsed();
                tracing::info!(
                    output = %output.display(),
                    secs = elapsed.as_secs_f64(),
                    "re-encode complete"
                );
                ConversionResult::completed(input, output, elapsed)
            }
            Err(e) => {
                tracing::error!(input = %input.display(), error = %e, "re-encode failed");
                ConversionResult::failed(input, format!("conversion failed: {}", input.display()))
            }
        }
    }

    async fn stream_copy(&self, input: &Path, output: &Path) -> vidmux_core::Result<()> {
        let mut cmd = ToolCommand::new(self.ffmpeg.path.clone());
        cmd.arg("-i");
        cmd.arg(input.to_string_lossy().as_ref());
        cmd.args(["-c", "copy", "-y"]);
        cmd.arg(output.to_string_lossy().as_ref());
        cmd.timeout(self.timeout());
        cmd.execute().await?;
        Ok(())
    }

    async fn reencode(&self, input: &Path, output: &Path) -> vidmux_core::Result<()> {
        let mut cmd = ToolCommand::new(self.ffmpeg.path.clone());
        cmd.arg("-i");
        cmd.arg(input.to_string_lossy().as_ref());
        cmd.args(["-c:v", &self.config.video_codec]);
        cmd.args(["-c:a", &self.config.audio_codec]);
        cmd.arg("-y");
        cmd.arg(output.to_string_lossy().as_ref());
        cmd.timeout(self.timeout());
        cmd.execute().await?;
        Ok(())
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.tool_timeout_secs.max(1))
    }
}

/// Generate the output path: input without extension, an underscore, a
/// second-resolution timestamp, and the target extension.
///
/// Two conversions of the same input within the same wall-clock second will
/// collide; the `-y` overwrite makes that last-writer-wins.
fn output_path(input: &Path, format: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let file_name = format!("{stem}_{timestamp}.{format}");
    input.with_file_name(file_name)
}
