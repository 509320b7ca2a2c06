use crate::config::VizConfig;
use crate::models::Entry;
use crate::normalize::prepare_entries;
use std::sync::Arc;
use tracing::info;

/// Read-only working set shared by every request: normalized, sorted entries plus config.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<Vec<Entry>>,
    pub config: Arc<VizConfig>,
}

impl AppState {
    pub fn new(raw: Vec<Entry>, config: VizConfig) -> Self {
        let prepared = prepare_entries(&raw);
        info!("prepared {} entries", prepared.sorted.len());
        Self {
            entries: Arc::new(prepared.sorted),
            config: Arc::new(config),
        }
    }
}
