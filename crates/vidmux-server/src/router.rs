//! Axum router construction.
//!
//! Builds the application router with the API routes, middleware layers, and
//! static front-end serving.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/formats", get(routes::formats::list_formats))
        .route(
            "/convert",
            // Uploaded media can be arbitrarily large; the body is streamed
            // to disk, so the default in-memory body cap must not apply.
            post(routes::convert::convert_upload).layer(DefaultBodyLimit::disable()),
        );

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving: the front-end page at `/`, auxiliary assets under
    // `/static/*`.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app
                .nest_service("/static", tower_http::services::ServeDir::new(&dir))
                .fallback_service(
                    tower_http::services::ServeDir::new(&dir)
                        .append_index_html_on_directories(true)
                        .not_found_service(tower_http::services::ServeFile::new(index_path)),
                );
        }
    }

    app
}
