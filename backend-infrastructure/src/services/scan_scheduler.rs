use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use backend_application::commands::scan_commands;
use backend_application::AppState;

/// Runs a full scan every `scan_interval_minutes`; returns at once when
/// the interval is 0.
pub async fn schedule_scans(state: AppState) {
    let minutes = state.config.scan_interval_minutes;
    if minutes == 0 {
        info!("periodic scans disabled");
        return;
    }
    info!("periodic scans every {} minutes", minutes);
    let mut ticker = interval(Duration::from_secs(minutes.saturating_mul(60)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        if let Err(err) = scan_commands::run_scan(&state, None).await {
            error!("scheduled scan failed: {}", err);
        }
    }
}
