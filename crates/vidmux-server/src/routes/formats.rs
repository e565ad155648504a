//! Supported-formats route handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::context::AppContext;

/// Response for `GET /api/formats`.
#[derive(Serialize)]
pub struct FormatsResponse {
    /// The default target format (first supported one).
    pub default: String,
    /// All supported target formats, in preference order.
    pub formats: Vec<String>,
}

/// GET /api/formats
pub async fn list_formats(State(ctx): State<AppContext>) -> Json<FormatsResponse> {
    let catalog = ctx.engine.catalog();
    Json(FormatsResponse {
        default: catalog.default_format().to_string(),
        formats: catalog.formats().to_vec(),
    })
}
