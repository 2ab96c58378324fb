// Transaction entity
// One doorstep service request as exported by the portal's document store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;
use crate::utils::{normalize_optional_text, parse_amount, parse_timestamp};
use crate::value_objects::{ServiceCategory, TransactionStatus};

/// Wire shape of a service request. Every field is optional here; the
/// required ones are enforced by [`Transaction::try_from`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(alias = "_id", alias = "requestId")]
    pub id: Option<String>,
    #[serde(alias = "customerId", alias = "uid")]
    pub user_id: Option<String>,
    #[serde(alias = "assignedAgent", alias = "assignedAgentId")]
    pub agent_id: Option<String>,
    pub amount: Option<Value>,
    #[serde(alias = "serviceType", alias = "service")]
    pub service_category: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "timestamp")]
    pub created_at: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub agent_id: Option<String>,
    pub amount: f64,
    pub service_category: ServiceCategory,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = DomainError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let id = normalize_optional_text(record.id)
            .ok_or_else(|| DomainError::malformed("transaction", "missing id"))?;
        let user_id = normalize_optional_text(record.user_id)
            .ok_or_else(|| DomainError::malformed("transaction", format!("{} has no subject id", id)))?;
        let amount = record
            .amount
            .as_ref()
            .and_then(parse_amount)
            .ok_or_else(|| DomainError::malformed("transaction", format!("{} has an invalid amount", id)))?;
        let status = record
            .status
            .as_deref()
            .and_then(TransactionStatus::parse)
            .ok_or_else(|| DomainError::malformed("transaction", format!("{} has an unknown status", id)))?;
        let created_at = record
            .created_at
            .as_ref()
            .and_then(parse_timestamp)
            .ok_or_else(|| DomainError::malformed("transaction", format!("{} has no creation time", id)))?;
        let service_category = record
            .service_category
            .as_deref()
            .map(ServiceCategory::from)
            .unwrap_or(ServiceCategory::Other);

        Ok(Transaction {
            id,
            user_id,
            agent_id: normalize_optional_text(record.agent_id),
            amount,
            service_category,
            status,
            created_at,
        })
    }
}

/// Compact reference to a transaction carried inside alert evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRef {
    pub id: String,
    pub amount: f64,
    pub date: DateTime<Utc>,
    pub service_category: ServiceCategory,
    pub status: TransactionStatus,
}

impl From<&Transaction> for TransactionRef {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            amount: tx.amount,
            date: tx.created_at,
            service_category: tx.service_category,
            status: tx.status,
        }
    }
}
