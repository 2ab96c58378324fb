// Alert lifecycle status value object

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    #[default]
    Pending,
    Confirmed,
    Dismissed,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Confirmed => "confirmed",
            AlertStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" => Some(AlertStatus::Pending),
            "confirmed" => Some(AlertStatus::Confirmed),
            "dismissed" => Some(AlertStatus::Dismissed),
            _ => None,
        }
    }

    /// Reviewed alerts must be reset to pending before they can be reviewed
    /// the other way.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Pending, AlertStatus::Confirmed)
                | (AlertStatus::Pending, AlertStatus::Dismissed)
                | (AlertStatus::Confirmed, AlertStatus::Pending)
                | (AlertStatus::Dismissed, AlertStatus::Pending)
        )
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
