//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which wires an [`AppContext`] to a stub ffmpeg
//! executable and starts Axum on a random port for HTTP-level testing. The
//! stub makes conversion outcomes deterministic without a real ffmpeg.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use vidmux_convert::ToolRegistry;
use vidmux_core::Config;
use vidmux_server::context::AppContext;
use vidmux_server::router::build_router;

/// A stub body that writes its output path and exits successfully,
/// mimicking a stream copy that always works. Flag-only invocations
/// (e.g. `-version` probes) produce no file.
pub const STUB_OK: &str =
    r#"for a; do out=$a; done; case "$out" in -*) ;; *) echo converted > "$out";; esac; exit 0"#;

/// A stub body that always fails, for exercising the failure path.
pub const STUB_FAIL: &str = "exit 1";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a stub
/// external tool.
pub struct TestHarness {
    pub ctx: AppContext,
    // Keeps the stub executable alive for the duration of the test.
    _stub_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Start a server whose ffmpeg stub always succeeds.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_stub(STUB_OK).await
    }

    /// Start a server with a custom ffmpeg stub script body.
    pub async fn with_stub(body: &str) -> (Self, SocketAddr) {
        let stub_dir = tempfile::tempdir().expect("failed to create stub dir");
        let stub = write_stub(stub_dir.path(), body);

        let mut config = Config::default();
        config.tools.ffmpeg_path = Some(stub);

        let tools = ToolRegistry::discover(&config.tools);
        let ctx = AppContext::new(&config, &tools).expect("failed to build context");
        let app = build_router(ctx.clone(), None);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (
            Self {
                ctx,
                _stub_dir: stub_dir,
            },
            addr,
        )
    }
}

/// Write an executable shell script named `ffmpeg` into `dir`.
pub fn write_stub(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join("ffmpeg");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write stub");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("failed to chmod stub");
    path
}
