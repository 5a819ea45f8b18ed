//! Database-specific error types and conversions.

use tollgate_core::error::TollgateError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Credential hashing failed: {0}")]
    Hash(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Stale write rejected: {entity} with id {id}")]
    VersionConflict { entity: String, id: String },
}

impl From<DbError> for TollgateError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TollgateError::NotFound { entity, id },
            DbError::VersionConflict { entity, id } => {
                TollgateError::VersionConflict { entity, id }
            }
            DbError::Hash(msg) => TollgateError::Crypto(msg),
            other => TollgateError::Database(other.to_string()),
        }
    }
}
