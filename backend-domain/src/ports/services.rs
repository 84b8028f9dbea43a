use async_trait::async_trait;

/// Where the bundled batch file comes from.
#[async_trait]
pub trait BatchSource: Send + Sync {
    async fn read_batch(&self) -> anyhow::Result<String>;
    fn describe(&self) -> String;
}
