//! Database-specific error types and conversions.

use fairground_core::error::FairgroundError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Unique index violation: {entity}")]
    Duplicate { entity: String },
}

impl DbError {
    /// Classify a write error: unique-index violations become
    /// [`DbError::Duplicate`] for the given entity, everything else
    /// stays a raw store error.
    pub fn from_write(err: surrealdb::Error, entity: &str) -> Self {
        if err.to_string().contains("already contains") {
            Self::Duplicate {
                entity: entity.into(),
            }
        } else {
            Self::Surreal(err)
        }
    }
}

impl From<DbError> for FairgroundError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FairgroundError::NotFound { entity, id },
            DbError::Duplicate { entity } => FairgroundError::AlreadyExists { entity },
            other => FairgroundError::Database(other.to_string()),
        }
    }
}
