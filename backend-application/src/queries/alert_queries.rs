use backend_domain::{
    normalize_optional_text,
    Alert,
    AlertCategory,
    AlertFilter,
    AlertQuery,
    AlertStatus,
    AlertSummary,
    SubjectRole,
};

use crate::{AppError, AppState};

pub async fn list_alerts(state: &AppState, query: AlertQuery) -> Result<Vec<Alert>, AppError> {
    let filter = parse_filter(query)?;
    let store = state.alerts.read().await;
    Ok(store.list(&filter))
}

pub async fn get_alert(state: &AppState, id: &str) -> Result<Alert, AppError> {
    let store = state.alerts.read().await;
    store
        .get(id.trim())
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("alert '{}'", id.trim())))
}

pub async fn alert_summary(state: &AppState) -> AlertSummary {
    state.alerts.read().await.summary()
}

/// Blank parameters mean "any"; unknown values are rejected.
pub fn parse_filter(query: AlertQuery) -> Result<AlertFilter, AppError> {
    let category = match normalize_optional_text(query.category) {
        Some(raw) => Some(
            AlertCategory::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown category '{}'", raw)))?,
        ),
        None => None,
    };
    let status = match normalize_optional_text(query.status) {
        Some(raw) => Some(
            AlertStatus::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown status '{}'", raw)))?,
        ),
        None => None,
    };
    let role = match normalize_optional_text(query.role) {
        Some(raw) => Some(
            SubjectRole::parse(&raw)
                .ok_or_else(|| AppError::BadRequest(format!("unknown role '{}'", raw)))?,
        ),
        None => None,
    };
    Ok(AlertFilter {
        category,
        search: normalize_optional_text(query.search).map(|term| term.to_lowercase()),
        status,
        role,
    })
}
