use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::util::ServiceExt;

use backend_application::{AppState, Metrics};
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
use backend_interfaces_http::build_router;

struct Records {
    transactions: Option<Vec<TransactionRecord>>,
    messages: Option<Vec<SupportMessageRecord>>,
}

#[async_trait]
impl TransactionSource for Records {
    async fn list_transactions(&self, _window: &ScanWindow) -> anyhow::Result<Vec<TransactionRecord>> {
        self.transactions
            .clone()
            .ok_or_else(|| anyhow::anyhow!("transactions down"))
    }
}

#[async_trait]
impl SupportMessageSource for Records {
    async fn list_support_messages(
        &self,
        _window: &ScanWindow,
    ) -> anyhow::Result<Vec<SupportMessageRecord>> {
        self.messages
            .clone()
            .ok_or_else(|| anyhow::anyhow!("support messages down"))
    }
}

#[async_trait]
impl IdentitySource for Records {
    async fn list_identities(&self, _role: Option<IdentityRole>) -> anyhow::Result<Vec<IdentityRecord>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct Memory {
    alerts: Mutex<Vec<Alert>>,
    rules: Mutex<Option<DetectionConfig>>,
}

#[async_trait]
impl AlertRepository for Memory {
    async fn load_alerts(&self) -> anyhow::Result<Vec<Alert>> {
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn save_alerts(&self, alerts: &[Alert]) -> anyhow::Result<()> {
        *self.alerts.lock().unwrap() = alerts.to_vec();
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for Memory {
    async fn load_detection_config(&self, _path: &str) -> anyhow::Result<DetectionConfig> {
        Ok(self.rules.lock().unwrap().clone().unwrap_or_default())
    }

    async fn save_detection_config(&self, _path: &str, config: &DetectionConfig) -> anyhow::Result<()> {
        *self.rules.lock().unwrap() = Some(config.clone());
        Ok(())
    }
}

struct QuietSink;

#[async_trait]
impl AlertSink for QuietSink {
    fn spawn_alerts(&self, _config: RuntimeConfig, _alerts: Vec<Alert>) {}

    async fn deliver_alerts(&self, _config: &RuntimeConfig, _alerts: &[Alert]) -> anyhow::Result<()> {
        Ok(())
    }

    async fn check_alert_target(&self, _config: &RuntimeConfig) -> anyhow::Result<()> {
        Ok(())
    }
}

struct Health {
    sources_ok: bool,
}

#[async_trait]
impl HealthCheckService for Health {
    async fn check_alert_store(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn check_sources(&self) -> anyhow::Result<bool> {
        if self.sources_ok {
            Ok(true)
        } else {
            Err(anyhow::anyhow!("document store unreachable"))
        }
    }
}

fn tx(id: &str, user: &str, amount: f64) -> TransactionRecord {
    TransactionRecord {
        id: Some(id.to_string()),
        user_id: Some(user.to_string()),
        agent_id: None,
        amount: Some(json!(amount)),
        service_category: Some("cash_withdrawal".to_string()),
        status: Some("requested".to_string()),
        created_at: Some(json!("2024-05-01T10:00:00Z")),
    }
}

fn router_with(records: Records, api_token: Option<&str>, sources_ok: bool) -> Router {
    let records = Arc::new(records);
    let memory = Arc::new(Memory::default());
    let state = AppState {
        config: RuntimeConfig {
            api_token: api_token.map(str::to_string),
            ..RuntimeConfig::default()
        },
        transaction_source: records.clone(),
        message_source: records.clone(),
        identity_source: records,
        alert_repo: memory.clone(),
        config_repo: memory,
        alert_sink: Arc::new(QuietSink),
        health_service: Arc::new(Health { sources_ok }),
        evaluator: Arc::new(RwLock::new(RuleEvaluator::new(DetectionConfig::default()))),
        alerts: Arc::new(RwLock::new(AlertStore::new())),
        metrics: Arc::new(Metrics::default()),
        scan_status: Arc::new(RwLock::new(ScanStatus::default())),
    };
    build_router(state)
}

fn default_router() -> Router {
    router_with(
        Records {
            transactions: Some(vec![tx("t1", "u1", 999.0), tx("t2", "u1", 4999.0)]),
            messages: Some(Vec::new()),
        },
        None,
        true,
    )
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, value)
}

#[tokio::test]
async fn scan_then_review_an_alert() {
    let router = default_router();

    let (status, scan) = send(&router, "POST", "/v1/scans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scan["alertsCreated"], 1);
    assert_eq!(scan["partial"], false);

    let (status, alerts) = send(&router, "GET", "/v1/alerts?category=suspicious_activity", None).await;
    assert_eq!(status, StatusCode::OK);
    let alerts = alerts.as_array().unwrap().clone();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["confidence"], 0.85);
    assert_eq!(alerts[0]["status"], "pending");
    let id = alerts[0]["id"].as_str().unwrap().to_string();

    let (status, alert) = send(&router, "GET", &format!("/v1/alerts/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alert["subjectId"], "u1");

    let (status, confirmed) = send(
        &router,
        "PUT",
        &format!("/v1/alerts/{}/status", id),
        Some(json!({"status": "confirmed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/v1/alerts/{}/status", id),
        Some(json!({"status": "dismissed"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("confirmed"));

    let (status, summary) = send(&router, "GET", "/v1/alerts/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total"], 1);
    assert_eq!(summary["byStatus"]["confirmed"], 1);

    let (status, last) = send(&router, "GET", "/v1/scans/last", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(last["running"], false);
    assert_eq!(last["lastResult"]["alertsCreated"], 1);
}

#[tokio::test]
async fn unknown_alert_is_404_and_bad_filter_is_400() {
    let router = default_router();
    let (status, body) = send(&router, "GET", "/v1/alerts/alr_0000000000000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&router, "GET", "/v1/alerts?status=resolved", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn total_input_failure_is_503() {
    let router = router_with(
        Records {
            transactions: None,
            messages: None,
        },
        None,
        true,
    );
    let (status, body) = send(&router, "POST", "/v1/scans", Some(json!({}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("no usable input"));
}

#[tokio::test]
async fn malformed_scan_window_is_400() {
    let router = default_router();
    let (status, _) = send(&router, "POST", "/v1/scans", Some(json!({"since": "yesterday"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rules_can_be_read_and_replaced() {
    let router = default_router();
    let (status, rules) = send(&router, "GET", "/v1/detect/rules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rules["large_amount_threshold"], 8000.0);

    let mut replacement = rules.clone();
    replacement["large_repeat_min"] = json!(5);
    let (status, saved) = send(&router, "PUT", "/v1/detect/rules", Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["large_repeat_min"], 5);

    let (status, _) = send(
        &router,
        "PUT",
        "/v1/detect/rules",
        Some(json!({"agent_approval_rate": 2.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_guards_everything_but_liveness() {
    let router = router_with(
        Records {
            transactions: Some(Vec::new()),
            messages: Some(Vec::new()),
        },
        Some("s3cret"),
        true,
    );
    let (status, _) = send(&router, "GET", "/v1/alerts", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&router, "GET", "/v1/ops/health/live", None).await;
    assert_eq!(status, StatusCode::OK);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/alerts")
                .header("Authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_reflects_source_health() {
    let ready = default_router();
    let (status, body) = send(&ready, "GET", "/v1/ops/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alertStore"], "ok");

    let degraded = router_with(
        Records {
            transactions: Some(Vec::new()),
            messages: Some(Vec::new()),
        },
        None,
        false,
    );
    let (status, body) = send(&degraded, "GET", "/v1/ops/health/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["sources"], "error");
}

#[tokio::test]
async fn metrics_count_scans() {
    let router = default_router();
    send(&router, "POST", "/v1/scans", None).await;
    let (status, body) = send(&router, "GET", "/v1/ops/metrics/prometheus", None).await;
    assert_eq!(status, StatusCode::OK);
    let text = body.as_str().unwrap();
    assert!(text.contains("doorguard_scans_total 1"));
    assert!(text.contains("doorguard_alerts_created_total 1"));
}
