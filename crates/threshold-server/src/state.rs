use std::sync::Arc;

use threshold_core::ThresholdConfig;
use threshold_github::client::SourceControl;

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub thresholds: ThresholdConfig,
    pub client: Arc<dyn SourceControl>,
}

impl AppState {
    pub fn new(thresholds: ThresholdConfig, client: Arc<dyn SourceControl>) -> Self {
        Self { thresholds, client }
    }
}
