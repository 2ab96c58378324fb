use chrono::Utc;
use tracing::{error, info};

use backend_domain::{Alert, AlertStatus, AlertStatusUpdate};

use crate::{AppError, AppState};

pub async fn set_alert_status(
    state: &AppState,
    id: &str,
    payload: AlertStatusUpdate,
) -> Result<Alert, AppError> {
    let next_status = AlertStatus::parse(&payload.status).ok_or_else(|| {
        AppError::BadRequest(format!("unknown status '{}'", payload.status.trim()))
    })?;

    let mut store = state.alerts.write().await;
    let mut next = store.clone();
    let updated = next.set_status(id.trim(), next_status, Utc::now())?;
    state
        .alert_repo
        .save_alerts(&next.to_vec())
        .await
        .map_err(|err| {
            error!("failed to persist status change for {}: {}", updated.id, err);
            AppError::Internal(err)
        })?;
    *store = next;
    drop(store);

    state.metrics.record_status_change();
    info!("alert {} moved to {}", updated.id, updated.status);
    Ok(updated)
}
