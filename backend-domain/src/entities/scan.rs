// Scan window, result and status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<Utc>>,
}

impl ScanWindow {
    pub fn all() -> Self {
        Self::default()
    }

    /// `since` is inclusive, `until` exclusive.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            if at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if at >= until {
                return false;
            }
        }
        true
    }

    pub fn is_valid(&self) -> bool {
        match (self.since, self.until) {
            (Some(since), Some(until)) => since < until,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceName {
    Transactions,
    SupportMessages,
    Identities,
}

impl SourceName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceName::Transactions => "transactions",
            SourceName::SupportMessages => "supportMessages",
            SourceName::Identities => "identities",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub alerts_created: usize,
    pub alerts_updated: usize,
    pub candidates: usize,
    pub transactions_scanned: usize,
    pub messages_scanned: usize,
    pub identities_loaded: usize,
    pub skipped_records: usize,
    pub partial: bool,
    pub failed_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    pub running: bool,
    /// Scans currently in flight; `running` mirrors `active_scans > 0`.
    #[serde(skip)]
    pub active_scans: usize,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ScanResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
