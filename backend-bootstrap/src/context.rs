use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_domain::services::{AlertStore, RuleEvaluator};
use backend_domain::{
    AlertRepository,
    ConfigRepository,
    IdentitySource,
    ScanStatus,
    SupportMessageSource,
    TransactionSource,
};
use backend_infrastructure::{
    AlertFileRepository,
    AppConfig,
    DefaultHealthService,
    DetectionConfigFileRepository,
    DocumentStoreSource,
    SnapshotFileSource,
    SourceMode,
    SourceProbe,
    WebhookAlertSink,
};

pub struct AppContext {
    pub state: AppState,
}

struct Sources {
    transactions: Arc<dyn TransactionSource>,
    messages: Arc<dyn SupportMessageSource>,
    identities: Arc<dyn IdentitySource>,
    probe: Arc<dyn SourceProbe>,
}

fn build_sources(config: &AppConfig) -> Result<Sources> {
    match config.source_mode {
        SourceMode::File => {
            let source = Arc::new(SnapshotFileSource::new(
                &config.transactions_path,
                &config.support_messages_path,
                &config.identities_path,
            ));
            Ok(Sources {
                transactions: source.clone(),
                messages: source.clone(),
                identities: source.clone(),
                probe: source,
            })
        }
        SourceMode::Http => {
            let base_url = config
                .document_store_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("document_store_url is required in http mode"))?;
            let source = Arc::new(DocumentStoreSource::new(
                base_url,
                config.document_store_token.clone(),
                config.source_timeout_seconds,
            )?);
            Ok(Sources {
                transactions: source.clone(),
                messages: source.clone(),
                identities: source.clone(),
                probe: source,
            })
        }
    }
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let sources = build_sources(config)?;

        let alert_repo = Arc::new(AlertFileRepository::new(&config.alerts_path));
        let stored = alert_repo.load_alerts().await?;
        let store = AlertStore::from_alerts(stored);

        let config_repo = Arc::new(DetectionConfigFileRepository::new());
        let detection = config_repo
            .load_detection_config(&runtime_config.detection_rules_path)
            .await?;
        info!(
            "loaded {} stored alerts, {} flagged keywords, source mode {:?}",
            store.len(),
            detection.flagged_keywords.len(),
            config.source_mode
        );

        let health_service = Arc::new(DefaultHealthService::new(alert_repo.clone(), sources.probe));

        let state = AppState {
            config: runtime_config,
            transaction_source: sources.transactions,
            message_source: sources.messages,
            identity_source: sources.identities,
            alert_repo,
            config_repo,
            alert_sink: Arc::new(WebhookAlertSink::new()),
            health_service,
            evaluator: Arc::new(RwLock::new(RuleEvaluator::new(detection))),
            alerts: Arc::new(RwLock::new(store)),
            metrics: Arc::new(Metrics::default()),
            scan_status: Arc::new(RwLock::new(ScanStatus::default())),
        };

        Ok(Self { state })
    }
}
