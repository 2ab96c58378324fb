use tracing::info;

use backend_domain::services::RuleEvaluator;
use backend_domain::DetectionConfig;

use crate::{AppError, AppState};

/// Validates, persists and swaps in a new rule configuration. The next
/// scan picks it up; scans already running keep the previous one.
pub async fn update_detection_config(
    state: &AppState,
    payload: DetectionConfig,
) -> Result<DetectionConfig, AppError> {
    let config = payload.normalized();
    config.validate()?;
    state
        .config_repo
        .save_detection_config(&state.config.detection_rules_path, &config)
        .await
        .map_err(AppError::Internal)?;
    {
        let mut evaluator = state.evaluator.write().await;
        *evaluator = RuleEvaluator::new(config.clone());
    }
    info!(
        "detection rules updated: {} keywords, large threshold {}",
        config.flagged_keywords.len(),
        config.large_amount_threshold
    );
    Ok(config)
}
