use async_trait::async_trait;

use crate::entities::{Alert, RuntimeConfig};

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Fire-and-forget delivery of newly created alerts.
    fn spawn_alerts(&self, config: RuntimeConfig, alerts: Vec<Alert>);
    /// Delivers in the caller's task; used when the process is about to exit.
    async fn deliver_alerts(&self, config: &RuntimeConfig, alerts: &[Alert]) -> anyhow::Result<()>;
    async fn check_alert_target(&self, config: &RuntimeConfig) -> anyhow::Result<()>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_alert_store(&self) -> anyhow::Result<bool>;
    async fn check_sources(&self) -> anyhow::Result<bool>;
}
