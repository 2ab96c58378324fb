// In-memory port fakes shared by the command and query tests

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use backend_domain::ports::{
    AlertRepository,
    AlertSink,
    ConfigRepository,
    HealthCheckService,
    IdentitySource,
    SupportMessageSource,
    TransactionSource,
};
use backend_domain::services::{AlertStore, RuleEvaluator};
use backend_domain::{
    Alert,
    DetectionConfig,
    IdentityRecord,
    IdentityRole,
    RuntimeConfig,
    ScanStatus,
    ScanWindow,
    SupportMessageRecord,
    TransactionRecord,
};

use crate::{AppState, Metrics};

/// `None` makes every call fail as an unreachable source.
pub struct FixedSource<T> {
    records: Mutex<Option<Vec<T>>>,
}

impl<T: Clone> FixedSource<T> {
    pub fn new(records: Option<Vec<T>>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn set(&self, records: Option<Vec<T>>) {
        *self.records.lock().unwrap() = records;
    }

    fn get(&self, name: &str) -> anyhow::Result<Vec<T>> {
        self.records
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("{} source unreachable", name))
    }
}

#[async_trait]
impl TransactionSource for FixedSource<TransactionRecord> {
    async fn list_transactions(&self, _window: &ScanWindow) -> anyhow::Result<Vec<TransactionRecord>> {
        self.get("transactions")
    }
}

#[async_trait]
impl SupportMessageSource for FixedSource<SupportMessageRecord> {
    async fn list_support_messages(
        &self,
        _window: &ScanWindow,
    ) -> anyhow::Result<Vec<SupportMessageRecord>> {
        self.get("support messages")
    }
}

#[async_trait]
impl IdentitySource for FixedSource<IdentityRecord> {
    async fn list_identities(&self, _role: Option<IdentityRole>) -> anyhow::Result<Vec<IdentityRecord>> {
        self.get("identities")
    }
}

#[derive(Default)]
pub struct MemoryAlertRepo {
    pub saved: Mutex<Vec<Alert>>,
    pub saves: Mutex<usize>,
    pub fail_saves: Mutex<bool>,
}

#[async_trait]
impl AlertRepository for MemoryAlertRepo {
    async fn load_alerts(&self) -> anyhow::Result<Vec<Alert>> {
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save_alerts(&self, alerts: &[Alert]) -> anyhow::Result<()> {
        if *self.fail_saves.lock().unwrap() {
            return Err(anyhow!("disk full"));
        }
        *self.saved.lock().unwrap() = alerts.to_vec();
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryConfigRepo {
    pub saved: Mutex<Option<(String, DetectionConfig)>>,
}

#[async_trait]
impl ConfigRepository for MemoryConfigRepo {
    async fn load_detection_config(&self, _path: &str) -> anyhow::Result<DetectionConfig> {
        Ok(self
            .saved
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, config)| config.clone())
            .unwrap_or_default())
    }

    async fn save_detection_config(&self, path: &str, config: &DetectionConfig) -> anyhow::Result<()> {
        *self.saved.lock().unwrap() = Some((path.to_string(), config.clone()));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub delivered: Mutex<Vec<Alert>>,
    pub awaited: Mutex<usize>,
}

#[async_trait]
impl AlertSink for RecordingSink {
    fn spawn_alerts(&self, _config: RuntimeConfig, alerts: Vec<Alert>) {
        self.delivered.lock().unwrap().extend(alerts);
    }

    async fn deliver_alerts(&self, _config: &RuntimeConfig, alerts: &[Alert]) -> anyhow::Result<()> {
        self.delivered.lock().unwrap().extend_from_slice(alerts);
        *self.awaited.lock().unwrap() += 1;
        Ok(())
    }

    async fn check_alert_target(&self, _config: &RuntimeConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheckService for AlwaysHealthy {
    async fn check_alert_store(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn check_sources(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub struct Harness {
    pub state: AppState,
    pub transactions: Arc<FixedSource<TransactionRecord>>,
    pub messages: Arc<FixedSource<SupportMessageRecord>>,
    pub alert_repo: Arc<MemoryAlertRepo>,
    pub config_repo: Arc<MemoryConfigRepo>,
    pub sink: Arc<RecordingSink>,
}

pub fn harness(
    transactions: Option<Vec<TransactionRecord>>,
    messages: Option<Vec<SupportMessageRecord>>,
    identities: Option<Vec<IdentityRecord>>,
) -> Harness {
    let transactions = Arc::new(FixedSource::new(transactions));
    let messages = Arc::new(FixedSource::new(messages));
    let alert_repo = Arc::new(MemoryAlertRepo::default());
    let config_repo = Arc::new(MemoryConfigRepo::default());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState {
        config: RuntimeConfig::default(),
        transaction_source: transactions.clone(),
        message_source: messages.clone(),
        identity_source: Arc::new(FixedSource::new(identities)),
        alert_repo: alert_repo.clone(),
        config_repo: config_repo.clone(),
        alert_sink: sink.clone(),
        health_service: Arc::new(AlwaysHealthy),
        evaluator: Arc::new(RwLock::new(RuleEvaluator::new(DetectionConfig::default()))),
        alerts: Arc::new(RwLock::new(AlertStore::new())),
        metrics: Arc::new(Metrics::default()),
        scan_status: Arc::new(RwLock::new(ScanStatus::default())),
    };
    Harness {
        state,
        transactions,
        messages,
        alert_repo,
        config_repo,
        sink,
    }
}

pub fn tx(id: &str, user: &str, agent: Option<&str>, amount: f64, status: &str, day: u32) -> TransactionRecord {
    TransactionRecord {
        id: Some(id.to_string()),
        user_id: Some(user.to_string()),
        agent_id: agent.map(str::to_string),
        amount: Some(json!(amount)),
        service_category: Some("cash_deposit".to_string()),
        status: Some(status.to_string()),
        created_at: Some(json!(format!("2024-05-{:02}T10:00:00Z", day))),
    }
}

pub fn message(id: &str, user: Option<&str>, body: &str) -> SupportMessageRecord {
    SupportMessageRecord {
        id: Some(id.to_string()),
        user_id: user.map(str::to_string),
        body: Some(body.to_string()),
        email: Some("someone@example.com".to_string()),
        phone: None,
        created_at: Some(json!("2024-05-03T09:30:00Z")),
    }
}

pub fn identity(id: &str, name: &str, role: &str) -> IdentityRecord {
    IdentityRecord {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        role: Some(role.to_string()),
        profile: Default::default(),
    }
}
