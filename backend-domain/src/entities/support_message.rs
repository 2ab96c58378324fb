// Support message entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DomainError;
use crate::utils::{normalize_optional_text, parse_timestamp};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SupportMessageRecord {
    #[serde(alias = "_id", alias = "ticketId")]
    pub id: Option<String>,
    #[serde(alias = "uid", alias = "customerId")]
    pub user_id: Option<String>,
    #[serde(alias = "message", alias = "description")]
    pub body: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phoneNumber", alias = "mobile")]
    pub phone: Option<String>,
    #[serde(alias = "timestamp")]
    pub created_at: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportMessage {
    pub id: String,
    /// `None` for tickets submitted without signing in.
    pub user_id: Option<String>,
    pub body: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<SupportMessageRecord> for SupportMessage {
    type Error = DomainError;

    fn try_from(record: SupportMessageRecord) -> Result<Self, Self::Error> {
        let id = normalize_optional_text(record.id)
            .ok_or_else(|| DomainError::malformed("support message", "missing id"))?;
        let body = record
            .body
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| DomainError::malformed("support message", format!("{} has no body", id)))?;
        let created_at = record
            .created_at
            .as_ref()
            .and_then(parse_timestamp)
            .ok_or_else(|| {
                DomainError::malformed("support message", format!("{} has no creation time", id))
            })?;

        Ok(SupportMessage {
            id,
            user_id: normalize_optional_text(record.user_id),
            body,
            email: normalize_optional_text(record.email),
            phone: normalize_optional_text(record.phone),
            created_at,
        })
    }
}
