use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use backend_domain::{
    DomainError,
    Identity,
    IdentityDirectory,
    ScanResult,
    ScanWindow,
    SourceName,
    SupportMessage,
    Transaction,
};

use crate::{AppError, AppState};

/// How newly created alerts reach the alert sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Spawned; the scan returns without waiting.
    Background,
    /// Awaited before the scan returns.
    Await,
}

/// Runs one detection pass over `window` (everything when `None`) and
/// merges the candidates into the alert store.
pub async fn run_scan(state: &AppState, window: Option<ScanWindow>) -> Result<ScanResult, AppError> {
    run_scan_with(state, window, Delivery::Background).await
}

pub async fn run_scan_with(
    state: &AppState,
    window: Option<ScanWindow>,
    delivery: Delivery,
) -> Result<ScanResult, AppError> {
    let window = window.unwrap_or_default();
    if !window.is_valid() {
        return Err(AppError::BadRequest(
            "since must be earlier than until".to_string(),
        ));
    }

    begin_scan(state).await;
    let outcome = execute_scan(state, window, delivery).await;
    finish_scan(state, &outcome).await;
    match &outcome {
        Ok(result) => state.metrics.record_scan(result),
        Err(_) => state.metrics.record_scan_failure(),
    }
    outcome
}

async fn begin_scan(state: &AppState) {
    let mut status = state.scan_status.write().await;
    status.active_scans += 1;
    status.running = true;
    status.updated_at = Utc::now().timestamp_millis();
}

async fn finish_scan(state: &AppState, outcome: &Result<ScanResult, AppError>) {
    let mut status = state.scan_status.write().await;
    status.active_scans = status.active_scans.saturating_sub(1);
    status.running = status.active_scans > 0;
    status.updated_at = Utc::now().timestamp_millis();
    match outcome {
        Ok(result) => {
            status.last_result = Some(result.clone());
            status.last_error = None;
        }
        Err(err) => status.last_error = Some(err.to_string()),
    }
}

async fn execute_scan(
    state: &AppState,
    window: ScanWindow,
    delivery: Delivery,
) -> Result<ScanResult, AppError> {
    let scan_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let limit = Duration::from_secs(state.config.source_timeout_seconds.max(1));

    let (transaction_records, message_records, identity_records) = tokio::join!(
        fetch_source(
            SourceName::Transactions,
            limit,
            state.transaction_source.list_transactions(&window),
        ),
        fetch_source(
            SourceName::SupportMessages,
            limit,
            state.message_source.list_support_messages(&window),
        ),
        fetch_source(
            SourceName::Identities,
            limit,
            state.identity_source.list_identities(None),
        ),
    );

    let mut failed_sources = Vec::new();
    for (name, failed) in [
        (SourceName::Transactions, transaction_records.is_none()),
        (SourceName::SupportMessages, message_records.is_none()),
        (SourceName::Identities, identity_records.is_none()),
    ] {
        if failed {
            failed_sources.push(name.as_str().to_string());
        }
    }
    if transaction_records.is_none() && message_records.is_none() {
        let err = DomainError::NoUsableInput(failed_sources.join(", "));
        error!("scan {} aborted: {}", scan_id, err);
        return Err(err.into());
    }

    let mut skipped_records = 0;
    let mut transactions =
        normalize::<_, Transaction>(transaction_records.unwrap_or_default(), &mut skipped_records);
    transactions.retain(|tx| window.contains(tx.created_at));
    let mut messages =
        normalize::<_, SupportMessage>(message_records.unwrap_or_default(), &mut skipped_records);
    messages.retain(|message| window.contains(message.created_at));
    let identities =
        normalize::<_, Identity>(identity_records.unwrap_or_default(), &mut skipped_records);
    let directory = IdentityDirectory::new(identities);

    let candidates = {
        let evaluator = state.evaluator.read().await;
        evaluator.evaluate_scan(&transactions, &messages, &directory)
    };
    for candidate in &candidates {
        debug!(
            "rule fired: subject={} category={} reason={}",
            candidate.subject_id, candidate.category, candidate.reason
        );
    }
    let candidate_count = candidates.len();

    let finished_at = Utc::now();
    let outcome = {
        let mut store = state.alerts.write().await;
        let mut next = store.clone();
        let outcome = next.merge(candidates, finished_at);
        if !outcome.created.is_empty() || outcome.updated > 0 {
            if let Err(err) = state.alert_repo.save_alerts(&next.to_vec()).await {
                error!("scan {} failed to persist alerts: {}", scan_id, err);
                return Err(AppError::Internal(err));
            }
            *store = next;
        }
        outcome
    };

    let result = ScanResult {
        scan_id,
        started_at,
        finished_at,
        alerts_created: outcome.created.len(),
        alerts_updated: outcome.updated,
        candidates: candidate_count,
        transactions_scanned: transactions.len(),
        messages_scanned: messages.len(),
        identities_loaded: directory.len(),
        skipped_records,
        partial: !failed_sources.is_empty(),
        failed_sources,
    };
    info!(
        "scan {} finished: created={} updated={} candidates={} transactions={} messages={} skipped={} partial={}",
        result.scan_id,
        result.alerts_created,
        result.alerts_updated,
        result.candidates,
        result.transactions_scanned,
        result.messages_scanned,
        result.skipped_records,
        result.partial
    );

    if !outcome.created.is_empty() {
        match delivery {
            Delivery::Background => state
                .alert_sink
                .spawn_alerts(state.config.clone(), outcome.created),
            Delivery::Await => {
                if let Err(err) = state
                    .alert_sink
                    .deliver_alerts(&state.config, &outcome.created)
                    .await
                {
                    warn!("scan {} alert delivery failed: {}", result.scan_id, err);
                }
            }
        }
    }
    Ok(result)
}

/// `None` when the source failed or timed out.
async fn fetch_source<T, F>(name: SourceName, limit: Duration, fut: F) -> Option<Vec<T>>
where
    F: Future<Output = anyhow::Result<Vec<T>>>,
{
    match timeout(limit, fut).await {
        Ok(Ok(records)) => Some(records),
        Ok(Err(err)) => {
            warn!("source {} unavailable: {}", name.as_str(), err);
            None
        }
        Err(_) => {
            warn!("source {} timed out after {}s", name.as_str(), limit.as_secs());
            None
        }
    }
}

fn normalize<R, T>(records: Vec<R>, skipped: &mut usize) -> Vec<T>
where
    T: TryFrom<R, Error = DomainError>,
{
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        match T::try_from(record) {
            Ok(item) => out.push(item),
            Err(err) => {
                warn!("skipping record: {}", err);
                *skipped += 1;
            }
        }
    }
    out
}
