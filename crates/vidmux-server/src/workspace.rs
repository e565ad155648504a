//! Per-request temporary workspace management.
//!
//! A [`RequestWorkspace`] owns a uniquely named temporary directory holding
//! one uploaded input file and, transiently, the produced output. The
//! directory is removed when the workspace is dropped, which happens either
//! on the error path (guard dropped before the error is surfaced) or, on
//! success, when the response body stream that owns it has been fully sent.

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use tempfile::TempDir;
use tokio_util::io::ReaderStream;

/// Temporary directory scoped to a single upload-convert-download cycle.
///
/// Ownership is exclusive: no other request ever addresses this directory,
/// so no locking is needed.
pub struct RequestWorkspace {
    temp_dir: TempDir,
}

impl RequestWorkspace {
    /// Create a fresh uniquely named workspace directory.
    pub fn create() -> vidmux_core::Result<Self> {
        let temp_dir = tempfile::Builder::new().prefix("vidmux_").tempdir()?;
        tracing::debug!(dir = %temp_dir.path().display(), "created request workspace");
        Ok(Self { temp_dir })
    }

    /// Path to the workspace directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Resolve the on-disk path for an uploaded file name.
    ///
    /// Only the final path component of the client-supplied name is used, so
    /// a hostile name cannot escape the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`vidmux_core::Error::Validation`] when the name has no usable
    /// file component.
    pub fn input_file(&self, file_name: &str) -> vidmux_core::Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| vidmux_core::Error::Validation("upload filename is missing".into()))?;
        Ok(self.temp_dir.path().join(name))
    }
}

/// Best-effort relocation of a produced output file into a caller-specified
/// directory.
///
/// Tries a rename first (same filesystem), then copy+remove. On any failure
/// the relocation is abandoned and the original path is returned; the caller
/// keeps serving from there.
pub async fn relocate_output(output: &Path, dest_dir: &Path) -> PathBuf {
    let Some(file_name) = output.file_name() else {
        return output.to_path_buf();
    };
    let dest = dest_dir.join(file_name);

    if tokio::fs::rename(output, &dest).await.is_ok() {
        tracing::info!(dest = %dest.display(), "output relocated");
        return dest;
    }

    match tokio::fs::copy(output, &dest).await {
        Ok(_) => {
            let _ = tokio::fs::remove_file(output).await;
            tracing::info!(dest = %dest.display(), "output relocated (copied)");
            dest
        }
        Err(e) => {
            tracing::warn!(
                dest = %dest.display(),
                error = %e,
                "output relocation failed; serving from original location"
            );
            output.to_path_buf()
        }
    }
}

/// Response body stream that keeps the request workspace alive until the
/// body has been fully transmitted (or the connection drops).
pub struct WorkspaceStream {
    inner: ReaderStream<tokio::fs::File>,
    _workspace: RequestWorkspace,
}

impl WorkspaceStream {
    /// Stream `file`, deleting `workspace` only once the stream is dropped.
    pub fn new(file: tokio::fs::File, workspace: RequestWorkspace) -> Self {
        Self {
            inner: ReaderStream::new(file),
            _workspace: workspace,
        }
    }
}

impl Stream for WorkspaceStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
