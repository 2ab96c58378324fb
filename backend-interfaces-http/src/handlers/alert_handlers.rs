use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::alert_commands;
use backend_application::queries::alert_queries;
use backend_application::AppState;
use backend_domain::{Alert, AlertQuery, AlertStatusUpdate, AlertSummary};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<AlertQuery>,
) -> Result<Json<Vec<Alert>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alerts = alert_queries::list_alerts(&state, query).await?;
    Ok(Json(alerts))
}

pub async fn alert_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AlertSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(alert_queries::alert_summary(&state).await))
}

pub async fn get_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Alert>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alert = alert_queries::get_alert(&state, &id).await?;
    Ok(Json(alert))
}

pub async fn update_alert_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(payload): Json<AlertStatusUpdate>,
) -> Result<Json<Alert>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let alert = alert_commands::set_alert_status(&state, &id, payload).await?;
    Ok(Json(alert))
}
