//! Error types for the Fairground system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FairgroundError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FairgroundError {
    /// HTTP-equivalent status code for transport layers.
    ///
    /// Conflicts (duplicate enrollment, invite-code collision) map to
    /// 400 rather than 409, matching the platform's public error
    /// contract.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::AlreadyExists { .. } => 400,
            Self::AuthenticationFailed { .. } => 401,
            Self::AuthorizationDenied { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}

pub type FairgroundResult<T> = Result<T, FairgroundError>;
