// Alert query and summary shapes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{AlertCategory, AlertStatus, SubjectRole};

/// Raw query-string form, validated by the application layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertFilter {
    pub category: Option<AlertCategory>,
    /// Lower-cased search term.
    pub search: Option<String>,
    pub status: Option<AlertStatus>,
    pub role: Option<SubjectRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
}

#[derive(Debug, Deserialize)]
pub struct AlertStatusUpdate {
    pub status: String,
}
