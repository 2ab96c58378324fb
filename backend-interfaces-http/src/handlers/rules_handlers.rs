use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use backend_application::commands::detection_config_commands;
use backend_application::queries::detection_config_queries;
use backend_application::AppState;
use backend_domain::DetectionConfig;

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn get_rules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DetectionConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(detection_config_queries::get_detection_config(&state).await))
}

pub async fn update_rules(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DetectionConfig>,
) -> Result<Json<DetectionConfig>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let config = detection_config_commands::update_detection_config(&state, payload).await?;
    Ok(Json(config))
}
