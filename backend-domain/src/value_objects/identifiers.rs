// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::AlertCategory;

/// Subject id used for support messages without an author.
pub const ANONYMOUS_SUBJECT: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    /// Same subject and category always map to the same id, so repeated
    /// scans address the same stored alert.
    pub fn derive(subject_id: &str, category: AlertCategory) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(subject_id.as_bytes());
        hasher.update(b"|");
        hasher.update(category.as_str().as_bytes());
        let digest = hasher.finalize();
        let hex = digest
            .iter()
            .take(8)
            .map(|byte| format!("{:02x}", byte))
            .collect::<String>();
        AlertId(format!("alr_{}", hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key the alert store deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertKey {
    pub subject_id: String,
    pub category: AlertCategory,
}

impl AlertKey {
    pub fn new(subject_id: impl Into<String>, category: AlertCategory) -> Self {
        Self {
            subject_id: subject_id.into(),
            category,
        }
    }

    pub fn alert_id(&self) -> AlertId {
        AlertId::derive(&self.subject_id, self.category)
    }
}
