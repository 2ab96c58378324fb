// Role value objects

use serde::{Deserialize, Serialize};

/// Role of an identity in the portal's user registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityRole {
    Customer,
    Agent,
}

impl IdentityRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentityRole::Customer => "customer",
            IdentityRole::Agent => "agent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "customer" | "user" => Some(IdentityRole::Customer),
            "agent" => Some(IdentityRole::Agent),
            _ => None,
        }
    }
}

/// Role an alert's subject plays in the activity that fired it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectRole {
    User,
    Agent,
}

impl SubjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectRole::User => "user",
            SubjectRole::Agent => "agent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" | "customer" => Some(SubjectRole::User),
            "agent" => Some(SubjectRole::Agent),
            _ => None,
        }
    }
}
