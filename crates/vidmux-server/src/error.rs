//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`vidmux_core::Error`] so that route
//! handlers can return `Result<T, AppError>` directly. Raw external-tool
//! diagnostics never reach the response body; they are only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: vidmux_core::Error,
}

impl AppError {
    pub fn new(inner: vidmux_core::Error) -> Self {
        Self { inner }
    }
}

impl From<vidmux_core::Error> for AppError {
    fn from(e: vidmux_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            vidmux_core::Error::UnsupportedFormat { .. } => "unsupported_format",
            vidmux_core::Error::InputNotFound { .. } => "not_found",
            vidmux_core::Error::ToolMissing { .. } => "tool_missing",
            vidmux_core::Error::Tool { .. } => "tool_error",
            vidmux_core::Error::Io { .. } => "io_error",
            vidmux_core::Error::Validation(_) => "validation_error",
            vidmux_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
