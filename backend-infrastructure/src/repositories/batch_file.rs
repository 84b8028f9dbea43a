use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;

use backend_domain::ports::BatchSource;

/// Batch file read from disk on every import.
pub struct FileBatchSource {
    path: PathBuf,
}

impl FileBatchSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BatchSource for FileBatchSource {
    async fn read_batch(&self) -> anyhow::Result<String> {
        fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
