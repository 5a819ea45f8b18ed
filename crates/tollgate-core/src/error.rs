//! Error types for the Tollgate system.
//!
//! These are infrastructure failures: store unavailable, bad key
//! material, cancelled work. Expected, client-actionable failures
//! travel as [`Outcome`](crate::outcome::Outcome) values instead and
//! never appear here.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TollgateError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Stale write rejected: {entity} with id {id}")]
    VersionConflict { entity: String, id: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TollgateResult<T> = Result<T, TollgateError>;
