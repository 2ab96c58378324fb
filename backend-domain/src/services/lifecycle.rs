use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::entities::{Alert, AlertFilter, AlertSummary};
use crate::error::DomainError;
use crate::value_objects::{AlertCategory, AlertStatus};

/// Applies a reviewer's status change. The alert is left untouched when
/// the transition is not allowed.
pub fn transition(alert: &mut Alert, next: AlertStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
    if !alert.status.can_transition_to(next) {
        return Err(DomainError::InvalidTransition {
            id: alert.id.clone(),
            from: alert.status,
            to: next,
        });
    }
    alert.status = next;
    alert.updated_at = now;
    Ok(())
}

pub fn matches_filter(alert: &Alert, filter: &AlertFilter) -> bool {
    if let Some(category) = filter.category {
        if alert.category != category {
            return false;
        }
    }
    if let Some(status) = filter.status {
        if alert.status != status {
            return false;
        }
    }
    if let Some(role) = filter.role {
        if alert.subject_role != role {
            return false;
        }
    }
    match filter.search.as_deref() {
        Some(needle) => alert.matches_search(needle),
        None => true,
    }
}

pub fn summarize<'a>(alerts: impl Iterator<Item = &'a Alert>) -> AlertSummary {
    let mut by_status = BTreeMap::new();
    for status in [AlertStatus::Pending, AlertStatus::Confirmed, AlertStatus::Dismissed] {
        by_status.insert(status.as_str().to_string(), 0);
    }
    let mut by_category = BTreeMap::new();
    for category in AlertCategory::ALL {
        by_category.insert(category.as_str().to_string(), 0);
    }
    let mut total = 0;
    for alert in alerts {
        total += 1;
        *by_status.entry(alert.status.as_str().to_string()).or_insert(0) += 1;
        *by_category
            .entry(alert.category.as_str().to_string())
            .or_insert(0) += 1;
    }
    AlertSummary {
        total,
        by_status,
        by_category,
    }
}
