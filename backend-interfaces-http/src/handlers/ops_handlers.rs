use std::future::Future;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio::time::{timeout, Duration};
use tracing::error;

use backend_application::AppState;

#[derive(Serialize)]
struct CheckStatus {
    status: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyStatus {
    alert_store: &'static str,
    sources: &'static str,
}

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !crate::middleware::authorize(&state.config, &headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let (alert_store, sources) = tokio::join!(
        run_check("alert store", timeout_secs, state.health_service.check_alert_store()),
        run_check("sources", timeout_secs, state.health_service.check_sources()),
    );
    let status = if alert_store == "ok" && sources == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadyStatus { alert_store, sources })).into_response()
}

async fn run_check<F>(name: &str, timeout_secs: u64, check: F) -> &'static str
where
    F: Future<Output = anyhow::Result<bool>>,
{
    match timeout(Duration::from_secs(timeout_secs), check).await {
        Ok(Ok(true)) => "ok",
        Ok(Ok(false)) => "error",
        Ok(Err(err)) => {
            error!("{} check failed: {}", name, err);
            "error"
        }
        Err(_) => {
            error!("{} check timeout after {}s", name, timeout_secs);
            "timeout"
        }
    }
}

pub async fn alert_target_check(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !crate::middleware::authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, Json(CheckStatus { status: "unauthorized" })).into_response();
    }
    if state.config.alert_webhook_url.is_none() {
        return (StatusCode::OK, Json(CheckStatus { status: "unset" })).into_response();
    }
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let check = async {
        state
            .alert_sink
            .check_alert_target(&state.config)
            .await
            .map(|_| true)
    };
    let status = run_check("alert target", timeout_secs, check).await;
    let code = if status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(CheckStatus { status })).into_response()
}

pub async fn metrics_prometheus(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if !crate::middleware::authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}
