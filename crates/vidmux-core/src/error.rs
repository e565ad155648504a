//! Unified error type for the vidmux application.
//!
//! All crates funnel their failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`].

/// Unified error type covering all failure modes in vidmux.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested target format is not in the catalog.
    #[error("unsupported target format: {format}; supported formats: {supported}")]
    UnsupportedFormat {
        /// The format that was requested.
        format: String,
        /// Comma-separated list of valid formats.
        supported: String,
    },

    /// The referenced input file or directory does not exist.
    #[error("input not found: {path}")]
    InputNotFound {
        /// The path that was looked up.
        path: String,
    },

    /// A required external tool is not installed or not in PATH.
    #[error("{tool} not found; is it installed and in PATH?")]
    ToolMissing {
        /// Name of the missing tool.
        tool: String,
    },

    /// An external tool invocation failed (non-zero exit, timeout, or spawn
    /// failure).
    #[error("tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Request data failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::UnsupportedFormat { .. } => 400,
            Error::InputNotFound { .. } => 404,
            Error::ToolMissing { .. } => 500,
            Error::Tool { .. } => 502,
            Error::Io { .. } => 500,
            Error::Validation(_) => 400,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::UnsupportedFormat`].
    pub fn unsupported_format(
        format: impl Into<String>,
        supported: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Error::UnsupportedFormat {
            format: format.into(),
            supported: supported
                .into_iter()
                .map(|s| s.as_ref().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Convenience constructor for [`Error::InputNotFound`].
    pub fn input_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Error::InputNotFound {
            path: path.as_ref().display().to_string(),
        }
    }

    /// Convenience constructor for [`Error::ToolMissing`].
    pub fn tool_missing(tool: impl Into<String>) -> Self {
        Error::ToolMissing { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
