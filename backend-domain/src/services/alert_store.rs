use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::entities::{Alert, AlertFilter, AlertSummary, CandidateAlert};
use crate::error::DomainError;
use crate::services::lifecycle;
use crate::value_objects::{AlertId, AlertKey, AlertStatus, RiskLevel};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub created: Vec<Alert>,
    pub updated: usize,
}

/// Alert set keyed by (subject id, category). Alerts are never removed.
#[derive(Debug, Clone, Default)]
pub struct AlertStore {
    alerts: HashMap<AlertKey, Alert>,
    ids: HashMap<AlertId, AlertKey>,
}

impl AlertStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the store from persisted alerts; a later duplicate of the
    /// same key replaces the earlier one.
    pub fn from_alerts(alerts: Vec<Alert>) -> Self {
        let mut store = Self::new();
        for alert in alerts {
            store.insert(alert);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Refreshes existing alerts in place and inserts new ones as pending.
    /// Status and detection time of existing alerts are preserved; keys
    /// that did not fire are left alone.
    pub fn merge(&mut self, candidates: Vec<CandidateAlert>, now: DateTime<Utc>) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        let mut created_keys = HashSet::new();
        for candidate in candidates {
            let key = candidate.key();
            match self.alerts.get_mut(&key) {
                Some(existing) => {
                    if refresh(existing, candidate, now) && !created_keys.contains(&key) {
                        outcome.updated += 1;
                    }
                }
                None => {
                    let alert = candidate.into_alert(now);
                    created_keys.insert(key);
                    outcome.created.push(alert.clone());
                    self.insert(alert);
                }
            }
        }
        if !created_keys.is_empty() {
            // Keep the reported copies in sync with any same-scan refresh.
            for alert in outcome.created.iter_mut() {
                if let Some(stored) = self.alerts.get(&alert.key()) {
                    *alert = stored.clone();
                }
            }
        }
        outcome
    }

    pub fn get(&self, id: &str) -> Option<&Alert> {
        let key = self.ids.get(&AlertId(id.to_string()))?;
        self.alerts.get(key)
    }

    pub fn set_status(
        &mut self,
        id: &str,
        status: AlertStatus,
        now: DateTime<Utc>,
    ) -> Result<Alert, DomainError> {
        let key = self
            .ids
            .get(&AlertId(id.to_string()))
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        let alert = self
            .alerts
            .get_mut(key)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        lifecycle::transition(alert, status, now)?;
        Ok(alert.clone())
    }

    /// Newest detections first.
    pub fn list(&self, filter: &AlertFilter) -> Vec<Alert> {
        let mut alerts = self
            .alerts
            .values()
            .filter(|alert| lifecycle::matches_filter(alert, filter))
            .cloned()
            .collect::<Vec<_>>();
        sort_alerts(&mut alerts);
        alerts
    }

    pub fn summary(&self) -> AlertSummary {
        lifecycle::summarize(self.alerts.values())
    }

    pub fn to_vec(&self) -> Vec<Alert> {
        let mut alerts = self.alerts.values().cloned().collect::<Vec<_>>();
        sort_alerts(&mut alerts);
        alerts
    }

    fn insert(&mut self, alert: Alert) {
        let key = alert.key();
        if let Some(previous) = self.alerts.get(&key) {
            self.ids.remove(&previous.id);
        }
        self.ids.insert(alert.id.clone(), key.clone());
        self.alerts.insert(key, alert);
    }
}

/// Returns whether anything visible changed.
fn refresh(existing: &mut Alert, candidate: CandidateAlert, now: DateTime<Utc>) -> bool {
    let changed = existing.evidence != candidate.evidence
        || existing.reason != candidate.reason
        || existing.subject_name != candidate.subject_name
        || existing.subject_role != candidate.subject_role
        || existing.confidence != candidate.confidence;
    if !changed {
        return false;
    }
    existing.evidence = candidate.evidence;
    existing.reason = candidate.reason;
    existing.subject_name = candidate.subject_name;
    existing.subject_role = candidate.subject_role;
    existing.confidence = candidate.confidence;
    existing.risk_level = RiskLevel::from_confidence(candidate.confidence);
    existing.updated_at = now;
    true
}

fn sort_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| b.detected_at.cmp(&a.detected_at).then_with(|| a.id.cmp(&b.id)));
}
