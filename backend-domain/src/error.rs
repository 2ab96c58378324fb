use thiserror::Error;

use crate::value_objects::{AlertId, AlertStatus};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("alert '{0}' not found")]
    NotFound(String),
    #[error("alert '{id}' cannot move from {from} to {to}")]
    InvalidTransition {
        id: AlertId,
        from: AlertStatus,
        to: AlertStatus,
    },
    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },
    #[error("no usable input: {0}")]
    NoUsableInput(String),
    #[error("invalid detection config: {0}")]
    InvalidConfig(String),
}

impl DomainError {
    pub fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        DomainError::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }
}
