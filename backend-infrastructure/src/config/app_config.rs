use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{AmbiguousWinnerPolicy, RuntimeConfig, StoreBackend, StoreConfig};

use super::validation::{parse_store_backend, validate_store_url};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
    pub log_format: String,
    pub store: StoreSection,
    pub import: ImportSection,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreSection {
    pub backend: String,
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImportSection {
    pub batch_path: String,
    pub winner_policy: String,
    pub rollback_failed_rows: bool,
    pub summary_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 30,
            log_dir: None,
            log_format: "text".to_string(),
            store: StoreSection::default(),
            import: ImportSection::default(),
        }
    }
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: "http://127.0.0.1:54321/rest/v1".to_string(),
            api_key: None,
            timeout_seconds: 15,
        }
    }
}

impl Default for ImportSection {
    fn default() -> Self {
        Self {
            batch_path: "./batch-import.csv".to_string(),
            winner_policy: "default_to_a".to_string(),
            rollback_failed_rows: true,
            summary_limit: 10,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("BEYLEAGUE_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml_str(&content)?
        } else {
            warn!("{} not found, using defaults", path);
            AppConfig::default()
        };
        config.apply_overrides(|key| env::var(key).ok());
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        self.api_token = non_blank(self.api_token.take());
        self.log_dir = non_blank(self.log_dir.take());
        self.store.api_key = non_blank(self.store.api_key.take());
        self.log_format = self.log_format.trim().to_lowercase();
        self.store.backend = self.store.backend.trim().to_lowercase();
        self.store.url = self.store.url.trim().trim_end_matches('/').to_string();
        self.import.winner_policy = self.import.winner_policy.trim().to_lowercase();
        if self.import.summary_limit == 0 {
            self.import.summary_limit = ImportSection::default().summary_limit;
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.import.batch_path = resolve_path(base, &self.import.batch_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("log_format must be text or json"));
        }
        if self.store.timeout_seconds == 0 {
            return Err(anyhow!("store.timeout_seconds must be greater than 0"));
        }
        if parse_store_backend(&self.store.backend)? == StoreBackend::Rest {
            validate_store_url(&self.store.url)?;
        }
        self.winner_policy()?;
        if self.import.batch_path.trim().is_empty() {
            return Err(anyhow!("import.batch_path must not be empty"));
        }
        Ok(())
    }

    pub fn winner_policy(&self) -> Result<AmbiguousWinnerPolicy> {
        self.import
            .winner_policy
            .parse::<AmbiguousWinnerPolicy>()
            .map_err(|err| anyhow!("invalid import.winner_policy: {}", err))
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            batch_import_path: self.import.batch_path.clone(),
            winner_policy: self.winner_policy().unwrap_or_default(),
            rollback_failed_rows: self.import.rollback_failed_rows,
            summary_limit: self.import.summary_limit,
        }
    }

    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            backend: parse_store_backend(&self.store.backend).unwrap_or(StoreBackend::Memory),
            url: self.store.url.clone(),
            api_key: self.store.api_key.clone(),
            timeout_seconds: self.store.timeout_seconds,
        }
    }

    /// Apply `BEYLEAGUE_*` overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("BEYLEAGUE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("BEYLEAGUE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("BEYLEAGUE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("BEYLEAGUE_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Some(value) = lookup("BEYLEAGUE_LOG_FORMAT") {
            self.log_format = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_STORE_BACKEND") {
            self.store.backend = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_STORE_URL") {
            self.store.url = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_STORE_API_KEY") {
            self.store.api_key = Some(value);
        }
        if let Some(value) = lookup("BEYLEAGUE_STORE_TIMEOUT_SECONDS") {
            self.store.timeout_seconds = value.parse().unwrap_or(self.store.timeout_seconds);
        }
        if let Some(value) = lookup("BEYLEAGUE_BATCH_IMPORT_PATH") {
            self.import.batch_path = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_WINNER_POLICY") {
            self.import.winner_policy = value;
        }
        if let Some(value) = lookup("BEYLEAGUE_ROLLBACK_FAILED_ROWS") {
            self.import.rollback_failed_rows =
                value.parse().unwrap_or(self.import.rollback_failed_rows);
        }
        if let Some(value) = lookup("BEYLEAGUE_SUMMARY_LIMIT") {
            self.import.summary_limit = value.parse().unwrap_or(self.import.summary_limit);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|item| !item.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
