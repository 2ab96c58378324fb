use async_trait::async_trait;

use crate::entities::{
    Alert,
    DetectionConfig,
    IdentityRecord,
    ScanWindow,
    SupportMessageRecord,
    TransactionRecord,
};
use crate::value_objects::IdentityRole;

#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn list_transactions(&self, window: &ScanWindow) -> anyhow::Result<Vec<TransactionRecord>>;
}

#[async_trait]
pub trait SupportMessageSource: Send + Sync {
    async fn list_support_messages(
        &self,
        window: &ScanWindow,
    ) -> anyhow::Result<Vec<SupportMessageRecord>>;
}

#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn list_identities(&self, role: Option<IdentityRole>) -> anyhow::Result<Vec<IdentityRecord>>;
}

#[async_trait]
pub trait AlertRepository: Send + Sync {
    async fn load_alerts(&self) -> anyhow::Result<Vec<Alert>>;
    /// Replaces the persisted set with `alerts`.
    async fn save_alerts(&self, alerts: &[Alert]) -> anyhow::Result<()>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn load_detection_config(&self, path: &str) -> anyhow::Result<DetectionConfig>;
    async fn save_detection_config(&self, path: &str, config: &DetectionConfig) -> anyhow::Result<()>;
}
