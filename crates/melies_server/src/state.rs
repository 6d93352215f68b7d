//! Shared handler state.

use derive_getters::Getters;
use melies_pipeline::Pipeline;
use std::path::PathBuf;
use std::sync::Arc;

/// State handed to every handler.
#[derive(Clone, Getters)]
pub struct AppState {
    /// The stage orchestrator.
    pipeline: Arc<Pipeline>,
    /// Root of the published media tree served under `/media`.
    media_root: PathBuf,
}

impl AppState {
    /// Create handler state over a pipeline and a published media root.
    pub fn new(pipeline: Arc<Pipeline>, media_root: impl Into<PathBuf>) -> Self {
        Self {
            pipeline,
            media_root: media_root.into(),
        }
    }
}
