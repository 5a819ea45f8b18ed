//! Authentication error types.

use thiserror::Error;
use tollgate_core::error::TollgateError;

/// Failures raised inside the auth layer.
///
/// Token decode failures are translated into domain outcomes by the
/// service before they can escape; everything else is infrastructure
/// and converts into [`TollgateError`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for TollgateError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                TollgateError::Internal(err.to_string())
            }
            AuthError::Crypto(msg) => TollgateError::Crypto(msg),
        }
    }
}
