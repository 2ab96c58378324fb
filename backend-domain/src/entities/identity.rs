// Identity entity
// A registered customer or field agent

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use crate::utils::normalize_optional_text;
use crate::value_objects::IdentityRole;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityRecord {
    #[serde(default, alias = "_id", alias = "uid")]
    pub id: Option<String>,
    #[serde(default, alias = "displayName", alias = "fullName")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub role: IdentityRole,
    /// Remaining profile fields, carried through untouched.
    #[serde(default)]
    pub profile: Map<String, Value>,
}

impl TryFrom<IdentityRecord> for Identity {
    type Error = DomainError;

    fn try_from(record: IdentityRecord) -> Result<Self, Self::Error> {
        let id = normalize_optional_text(record.id)
            .ok_or_else(|| DomainError::malformed("identity", "missing id"))?;
        let role = record
            .role
            .as_deref()
            .and_then(IdentityRole::parse)
            .ok_or_else(|| DomainError::malformed("identity", format!("{} has an unknown role", id)))?;
        let name = normalize_optional_text(record.name).unwrap_or_else(|| id.clone());
        Ok(Identity {
            id,
            name,
            role,
            profile: record.profile,
        })
    }
}

/// Lookup table from identity id to identity, built once per scan.
#[derive(Debug, Clone, Default)]
pub struct IdentityDirectory {
    entries: HashMap<String, Identity>,
}

impl IdentityDirectory {
    pub fn new(identities: Vec<Identity>) -> Self {
        let entries = identities
            .into_iter()
            .map(|identity| (identity.id.clone(), identity))
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &str) -> Option<&Identity> {
        self.entries.get(id)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|identity| identity.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
