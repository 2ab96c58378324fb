use std::sync::Arc;

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
use backend_domain::{RuntimeConfig, ScanStatus};
use tokio::sync::RwLock;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub transaction_source: Arc<dyn TransactionSource>,
    pub message_source: Arc<dyn SupportMessageSource>,
    pub identity_source: Arc<dyn IdentitySource>,
    pub alert_repo: Arc<dyn AlertRepository>,
    pub config_repo: Arc<dyn ConfigRepository>,
    pub alert_sink: Arc<dyn AlertSink>,
    pub health_service: Arc<dyn HealthCheckService>,
    pub evaluator: Arc<RwLock<RuleEvaluator>>,
    /// Single writer lock for scans and status changes.
    pub alerts: Arc<RwLock<AlertStore>>,
    pub metrics: Arc<Metrics>,
    pub scan_status: Arc<RwLock<ScanStatus>>,
}
