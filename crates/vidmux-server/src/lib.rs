//! vidmux-server: HTTP upload/convert/download service.
//!
//! This crate exposes the conversion engine behind an Axum server:
//!
//! - `GET /api/formats` -- supported target formats
//! - `POST /api/convert` -- multipart upload, converted file as the response
//! - `GET /` and `/static/*` -- static front-end (pass-through file serving)
//! - `GET /health` -- liveness probe
//!
//! Each upload gets an exclusively owned temporary directory whose deletion
//! is deferred until the response body has been fully sent; conversions run
//! through a bounded worker semaphore so the accept loop is never starved.

pub mod context;
pub mod error;
pub mod router;
pub mod routes;
pub mod workspace;

use std::net::SocketAddr;

use vidmux_convert::ToolRegistry;
use vidmux_core::Config;

use crate::context::AppContext;

/// Start the vidmux server.
///
/// Discovers external tools (missing ffmpeg aborts startup), builds the
/// [`AppContext`], and serves until SIGINT/SIGTERM.
pub async fn start(config: Config) -> vidmux_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let tools = ToolRegistry::discover(&config.tools);
    for info in tools.check_all() {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!("Tool not found: {}", info.name);
        }
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| vidmux_core::Error::Internal(format!("invalid server address: {e}")))?;

    let ctx = AppContext::new(&config, &tools)?;
    let app = router::build_router(ctx, config.server.static_dir.clone());

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| vidmux_core::Error::Internal(format!("failed to bind to {addr}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| vidmux_core::Error::Internal(format!("server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
