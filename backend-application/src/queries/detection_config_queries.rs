use crate::AppState;
use backend_domain::DetectionConfig;

pub async fn get_detection_config(state: &AppState) -> DetectionConfig {
    state.evaluator.read().await.config().clone()
}
