use crate::AppState;
use backend_domain::ScanStatus;

pub async fn get_scan_status(state: &AppState) -> ScanStatus {
    state.scan_status.read().await.clone()
}
