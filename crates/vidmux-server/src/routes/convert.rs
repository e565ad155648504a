//! Upload-convert-download route handler.
//!
//! One request cycle: validate the target format before any resource is
//! allocated, stream the uploaded body into a request-scoped temp directory,
//! run the conversion through the bounded worker semaphore, optionally
//! relocate the output, and stream the result back. The temp directory is
//! owned by the response body stream, so it is deleted only after the last
//! byte has been sent; every error path drops it immediately.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::multipart::{Field, Multipart};
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio::io::AsyncWriteExt;

use vidmux_convert::FormatCatalog;
use vidmux_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::workspace::{self, RequestWorkspace, WorkspaceStream};

/// An uploaded file persisted inside its request workspace.
struct Upload {
    workspace: RequestWorkspace,
    input_path: PathBuf,
}

/// POST /api/convert
///
/// Multipart fields: `file` (required), `target_format` (default: the
/// catalog's first format), `max_workers` / `use_parallel` (accepted for
/// interface symmetry with batch mode; a single upload ignores them), and
/// `output_folder` (optional relocation target).
pub async fn convert_upload(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let catalog = ctx.engine.catalog();

    let mut target_format: Option<String> = None;
    let mut output_folder: Option<PathBuf> = None;
    let mut upload: Option<Upload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "target_format" => {
                let value = text_field(field, &name).await?.trim().to_ascii_lowercase();
                if !catalog.is_supported(&value) {
                    return Err(Error::unsupported_format(value, catalog.formats()).into());
                }
                target_format = Some(value);
            }
            "max_workers" => {
                let value = text_field(field, &name).await?;
                tracing::debug!(max_workers = %value, "accepted for batch symmetry");
            }
            "use_parallel" => {
                let value = text_field(field, &name).await?;
                tracing::debug!(use_parallel = %value, "accepted for batch symmetry");
            }
            "output_folder" => {
                let value = text_field(field, &name).await?;
                let value = value.trim();
                if !value.is_empty() {
                    output_folder = Some(PathBuf::from(value));
                }
            }
            "file" => {
                upload = Some(receive_file(field).await?);
            }
            _ => {}
        }
    }

    let Some(Upload {
        workspace,
        input_path,
    }) = upload
    else {
        return Err(Error::Validation("missing file field".into()).into());
    };

    let format =
        target_format.unwrap_or_else(|| catalog.default_format().to_string());

    // Hand the conversion to the bounded worker context so a slow external
    // invocation cannot starve other requests of pool slots.
    let result = {
        let _permit = ctx
            .conversions
            .acquire()
            .await
            .map_err(|_| Error::Internal("conversion queue closed".into()))?;
        ctx.engine.convert(&input_path, &format).await
    };

    if !result.success {
        let message = result
            .message
            .unwrap_or_else(|| "conversion failed".into());
        return Err(Error::Internal(message).into());
    }
    let mut output = result
        .output_path
        .ok_or_else(|| Error::Internal("conversion reported no output path".into()))?;

    // Best-effort relocation; failure degrades to the original location.
    if let Some(dir) = output_folder {
        if dir.is_dir() {
            output = workspace::relocate_output(&output, &dir).await;
        } else {
            tracing::warn!(dir = %dir.display(), "ignoring invalid output folder");
        }
    }

    let file = tokio::fs::File::open(&output).await.map_err(Error::from)?;
    let download_name = output
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("converted")
        .to_string();

    tracing::info!(
        input = %input_path.display(),
        download = %download_name,
        "serving converted file"
    );

    // The workspace guard rides inside the body stream; cleanup runs when
    // the stream is dropped after the response has been fully sent.
    let body = Body::from_stream(WorkspaceStream::new(file, workspace));
    let headers = [
        (
            header::CONTENT_TYPE,
            FormatCatalog::content_type_of(&format).to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{download_name}\""),
        ),
    ];

    Ok((headers, body).into_response())
}

/// Read a text form field.
async fn text_field(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| Error::Validation(format!("invalid {name} field: {e}")).into())
}

/// Persist the uploaded `file` field into a fresh workspace, streaming it in
/// bounded chunks rather than buffering the whole body.
async fn receive_file(mut field: Field<'_>) -> Result<Upload, AppError> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| Error::Validation("upload filename is missing".into()))?;

    let workspace = RequestWorkspace::create()?;
    let input_path = workspace.input_file(&file_name)?;

    tracing::info!(
        file = %file_name,
        dest = %input_path.display(),
        "receiving upload"
    );

    let mut out = tokio::fs::File::create(&input_path)
        .await
        .map_err(Error::from)?;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| Error::Validation(format!("upload interrupted: {e}")))?
    {
        out.write_all(&chunk).await.map_err(Error::from)?;
    }
    out.flush().await.map_err(Error::from)?;

    Ok(Upload {
        workspace,
        input_path,
    })
}
