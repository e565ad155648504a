//! Application context shared by all request handlers.

use std::sync::Arc;

use tokio::sync::Semaphore;

use vidmux_convert::{ConversionEngine, ToolRegistry};
use vidmux_core::Config;

/// State handed to every route handler via Axum.
///
/// Cheaply cloneable: everything is behind an `Arc`, and all of it is
/// read-only after construction. Requests share no mutable state.
#[derive(Clone)]
pub struct AppContext {
    /// The conversion engine (owns the format catalog).
    pub engine: Arc<ConversionEngine>,
    /// Bounded worker context for conversions: one slow conversion must
    /// never block the service from accepting or progressing other requests,
    /// and the permit count caps how many external processes run at once.
    pub conversions: Arc<Semaphore>,
}

impl AppContext {
    /// Build the context, verifying the external tool is available.
    ///
    /// # Errors
    ///
    /// Returns [`vidmux_core::Error::ToolMissing`] if ffmpeg was not
    /// discovered; the server refuses to start rather than failing each
    /// request.
    pub fn new(config: &Config, tools: &ToolRegistry) -> vidmux_core::Result<Self> {
        let engine = Arc::new(ConversionEngine::new(config.conversion.clone(), tools)?);
        let permits = config.conversion.max_workers.max(1);
        Ok(Self {
            engine,
            conversions: Arc::new(Semaphore::new(permits)),
        })
    }
}
