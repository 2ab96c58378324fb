use backend_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound(id) => AppError::NotFound(format!("alert '{}'", id)),
            err @ DomainError::InvalidTransition { .. } => AppError::Conflict(err.to_string()),
            err @ DomainError::MalformedRecord { .. } => AppError::BadRequest(err.to_string()),
            DomainError::InvalidConfig(msg) => AppError::BadRequest(msg),
            err @ DomainError::NoUsableInput(_) => AppError::Unavailable(err.to_string()),
        }
    }
}
