use anyhow::{anyhow, Result};

use backend_domain::StoreBackend;

pub fn parse_store_backend(value: &str) -> Result<StoreBackend> {
    match value.trim().to_lowercase().as_str() {
        "memory" | "in_memory" => Ok(StoreBackend::Memory),
        "rest" | "postgrest" => Ok(StoreBackend::Rest),
        other => Err(anyhow!(
            "unknown store.backend '{}', expected memory or rest",
            other
        )),
    }
}

pub fn validate_store_url(value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("store.url must not be empty"));
    }
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(anyhow!("store.url must start with http:// or https://"));
    }
    Ok(())
}
