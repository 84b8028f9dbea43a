use std::sync::Arc;

use backend_domain::ports::{BatchSource, TableStore};
use backend_domain::RuntimeConfig;
use tokio::sync::Mutex;

use crate::{LeagueRepository, Metrics};

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub repo: LeagueRepository,
    pub batch_source: Arc<dyn BatchSource>,
    pub metrics: Arc<Metrics>,
    /// Held for the whole of an import session so batches never interleave.
    pub import_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: RuntimeConfig,
        store: Arc<dyn TableStore>,
        batch_source: Arc<dyn BatchSource>,
    ) -> Self {
        Self {
            config,
            repo: LeagueRepository::new(store),
            batch_source,
            metrics: Arc::new(Metrics::default()),
            import_lock: Arc::new(Mutex::new(())),
        }
    }
}
