//! Application state for the web server.
//!
//! The model is loaded once and shared read-only between requests.

use glyco_core::context::ModelContext;
use glyco_core::explain::AttributionLayout;
use glyco_core::Result;
use std::path::Path;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ModelContext>,
    /// Layout the explainer emits for every request.
    pub layout: AttributionLayout,
}

impl AppState {
    pub fn new(ctx: ModelContext, layout: AttributionLayout) -> Self {
        Self { ctx: Arc::new(ctx), layout }
    }

    /// Load the model artifact at `path`.
    pub fn load(path: &Path, layout: AttributionLayout) -> Result<Self> {
        Ok(Self::new(ModelContext::load(path)?, layout))
    }
}
