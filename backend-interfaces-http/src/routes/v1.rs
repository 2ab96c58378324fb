use axum::routing::{get, post, put};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{alert_handlers, ops_handlers, rules_handlers, scan_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/alerts", get(alert_handlers::list_alerts))
        .route("/v1/alerts/summary", get(alert_handlers::alert_summary))
        .route("/v1/alerts/:id", get(alert_handlers::get_alert))
        .route(
            "/v1/alerts/:id/status",
            put(alert_handlers::update_alert_status),
        )
        .route("/v1/scans", post(scan_handlers::trigger_scan))
        .route("/v1/scans/last", get(scan_handlers::last_scan))
        .route(
            "/v1/detect/rules",
            get(rules_handlers::get_rules).put(rules_handlers::update_rules),
        )
        .route(
            "/v1/ops/alert-target/check",
            get(ops_handlers::alert_target_check),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
