use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::scan_commands;
use backend_application::queries::scan_status_queries;
use backend_application::AppState;
use backend_domain::{ScanResult, ScanStatus, ScanWindow};

use crate::error::HttpError;
use crate::middleware::authorize;

/// An empty body scans everything.
pub async fn trigger_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ScanResult>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let window = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        let window: ScanWindow = serde_json::from_slice(&body)
            .map_err(|err| HttpError::BadRequest(format!("invalid scan window: {}", err)))?;
        Some(window)
    };
    let result = scan_commands::run_scan(&state, window).await?;
    Ok(Json(result))
}

pub async fn last_scan(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ScanStatus>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(scan_status_queries::get_scan_status(&state).await))
}
