// Runtime configuration handed to the application layer

use crate::value_objects::AmbiguousWinnerPolicy;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub batch_import_path: String,
    pub winner_policy: AmbiguousWinnerPolicy,
    pub rollback_failed_rows: bool,
    pub summary_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 30,
            batch_import_path: "./batch-import.csv".to_string(),
            winner_policy: AmbiguousWinnerPolicy::DefaultToA,
            rollback_failed_rows: true,
            summary_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Rest,
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}
