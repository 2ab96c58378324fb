use std::path::PathBuf;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::fs;

use backend_domain::{Alert, AlertRepository};

use crate::utils::{ensure_parent_dir, write_atomic};

/// Alert set persisted as one pretty-printed JSON array.
pub struct AlertFileRepository {
    path: PathBuf,
}

impl AlertFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl AlertRepository for AlertFileRepository {
    async fn load_alerts(&self) -> anyhow::Result<Vec<Alert>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|err| anyhow!("corrupt alert file {}: {}", self.path.display(), err))
    }

    async fn save_alerts(&self, alerts: &[Alert]) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(alerts)?;
        write_atomic(&self.path, &content).await
    }

    async fn ping(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.path).await?;
        if self.path.exists() {
            fs::metadata(&self.path).await?;
        }
        Ok(())
    }
}
