// Transaction lifecycle status value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Requested,
    Approved,
    Rejected,
    Completed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Requested => "requested",
            TransactionStatus::Approved => "approved",
            TransactionStatus::Rejected => "rejected",
            TransactionStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "requested" | "pending" => Some(TransactionStatus::Requested),
            "approved" => Some(TransactionStatus::Approved),
            "rejected" => Some(TransactionStatus::Rejected),
            "completed" => Some(TransactionStatus::Completed),
            _ => None,
        }
    }

    /// A completed request went through approval first.
    pub fn counts_as_approved(&self) -> bool {
        matches!(self, TransactionStatus::Approved | TransactionStatus::Completed)
    }
}
