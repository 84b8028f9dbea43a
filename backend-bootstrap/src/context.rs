use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use backend_application::AppState;
use backend_domain::ports::TableStore;
use backend_domain::StoreBackend;
use backend_infrastructure::{AppConfig, FileBatchSource, InMemoryStore, RestStore};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let store_config = config.to_store_config();

        let store: Arc<dyn TableStore> = match store_config.backend {
            StoreBackend::Memory => {
                info!("using in-memory store, data is lost on exit");
                Arc::new(InMemoryStore::new())
            }
            StoreBackend::Rest => {
                info!(url = %store_config.url, "using REST table store");
                Arc::new(
                    RestStore::new(&store_config)
                        .with_context(|| format!("failed to build store client for {}", store_config.url))?,
                )
            }
        };
        let batch_source = Arc::new(FileBatchSource::new(&runtime_config.batch_import_path));

        Ok(Self {
            state: AppState::new(runtime_config, store, batch_source),
        })
    }
}
