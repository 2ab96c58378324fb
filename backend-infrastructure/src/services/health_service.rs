use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::{AlertRepository, HealthCheckService};

/// Cheap reachability check for whichever record sources are configured.
#[async_trait]
pub trait SourceProbe: Send + Sync {
    async fn probe(&self) -> anyhow::Result<()>;
}

pub struct DefaultHealthService {
    alert_repo: Arc<dyn AlertRepository>,
    sources: Arc<dyn SourceProbe>,
}

impl DefaultHealthService {
    pub fn new(alert_repo: Arc<dyn AlertRepository>, sources: Arc<dyn SourceProbe>) -> Self {
        Self {
            alert_repo,
            sources,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_alert_store(&self) -> anyhow::Result<bool> {
        self.alert_repo.ping().await.map(|_| true)
    }

    async fn check_sources(&self) -> anyhow::Result<bool> {
        self.sources.probe().await.map(|_| true)
    }
}
