// Alert entity
// Entity-level risk alert derived from aggregated behaviour

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Evidence;
use crate::value_objects::{AlertCategory, AlertId, AlertKey, AlertStatus, RiskLevel, SubjectRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: AlertId,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_role: SubjectRole,
    pub category: AlertCategory,
    pub reason: String,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub detected_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: AlertStatus,
    pub evidence: Evidence,
}

impl Alert {
    pub fn key(&self) -> AlertKey {
        AlertKey::new(self.subject_id.clone(), self.category)
    }

    /// Case-insensitive substring match over subject name, subject id and
    /// reason. `needle` must already be lower-cased.
    pub fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.subject_name.to_lowercase().contains(needle)
            || self.subject_id.to_lowercase().contains(needle)
            || self.reason.to_lowercase().contains(needle)
    }
}

/// Output of a single rule firing, before it is reconciled with the store.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateAlert {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_role: SubjectRole,
    pub category: AlertCategory,
    pub reason: String,
    pub confidence: f64,
    pub evidence: Evidence,
}

impl CandidateAlert {
    pub fn key(&self) -> AlertKey {
        AlertKey::new(self.subject_id.clone(), self.category)
    }

    pub fn into_alert(self, now: DateTime<Utc>) -> Alert {
        Alert {
            id: AlertId::derive(&self.subject_id, self.category),
            subject_id: self.subject_id,
            subject_name: self.subject_name,
            subject_role: self.subject_role,
            category: self.category,
            reason: self.reason,
            confidence: self.confidence,
            risk_level: RiskLevel::from_confidence(self.confidence),
            detected_at: now,
            updated_at: now,
            status: AlertStatus::Pending,
            evidence: self.evidence,
        }
    }
}
