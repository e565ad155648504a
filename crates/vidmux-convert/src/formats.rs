//! Supported target formats, their file extensions, and content types.
//!
//! The [`FormatCatalog`] is a pure lookup table built once from the
//! configured format list. All comparisons normalize to ASCII lowercase, so
//! `MP4`, `Mp4`, and `mp4` are the same format.

use std::path::Path;

use vidmux_core::config::DEFAULT_FORMATS;

/// Static registry of supported target formats.
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    formats: Vec<String>,
}

impl FormatCatalog {
    /// Build a catalog from a configured format list.
    ///
    /// Formats are lowercased and de-duplicated while preserving order. An
    /// empty list falls back to [`DEFAULT_FORMATS`] so the catalog is never
    /// empty.
    pub fn new(formats: &[String]) -> Self {
        let mut normalized: Vec<String> = Vec::with_capacity(formats.len());
        for f in formats {
            let f = f.trim().to_ascii_lowercase();
            if !f.is_empty() && !normalized.contains(&f) {
                normalized.push(f);
            }
        }
        if normalized.is_empty() {
            normalized = DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect();
        }
        Self {
            formats: normalized,
        }
    }

    /// All supported formats, in preference order.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// The default target format (the first supported one).
    pub fn default_format(&self) -> &str {
        &self.formats[0]
    }

    /// Whether the given format is supported (case-insensitive).
    pub fn is_supported(&self, format: &str) -> bool {
        let format = format.trim().to_ascii_lowercase();
        self.formats.iter().any(|f| *f == format)
    }

    /// The file extension for a format, including the leading dot.
    pub fn extension_of(format: &str) -> String {
        format!(".{}", format.trim().to_ascii_lowercase())
    }

    /// The derived extension set: exactly `"." + format` per supported format.
    pub fn extensions(&self) -> Vec<String> {
        self.formats.iter().map(|f| Self::extension_of(f)).collect()
    }

    /// Whether a path's extension (case-insensitive) belongs to a supported
    /// format.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.is_supported(e))
            .unwrap_or(false)
    }

    /// The HTTP content type for a format.
    ///
    /// Formats outside the static MIME table fall back to a generic binary
    /// content type.
    pub fn content_type_of(format: &str) -> &'static str {
        match format.trim().to_ascii_lowercase().as_str() {
            "mp4" => "video/mp4",
            "mkv" => "video/x-matroska",
            "avi" => "video/x-msvideo",
            "mov" => "video/quicktime",
            "flv" => "video/x-flv",
            "wmv" => "video/x-ms-wmv",
            "webm" => "video/webm",
            "mpeg" => "video/mpeg",
            "m4v" => "video/x-m4v",
            _ => "application/octet-stream",
        }
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::new(&[])
    }
}
