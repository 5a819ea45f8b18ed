//! Frozen table of named domain errors.
//!
//! Entries are `const` items grouped by the entity they concern, so
//! the table is compile-time frozen and append-only by construction.
//! Every entry carries a non-empty code that is unique across the
//! catalog.

use crate::outcome::Error;

pub mod user {
    use super::Error;

    /// Returned for both an unknown email and a wrong password, so a
    /// caller cannot tell which check failed.
    pub const INVALID_CREDENTIALS: Error =
        Error::new("User.InvalidCredentials", "Invalid Email or Password");

    /// Returned when a presented refresh token is unknown, expired,
    /// already consumed, or tied to an unverifiable access token.
    pub const INVALID_REFRESH_TOKEN: Error = Error::new(
        "User.InvalidRefreshToken",
        "Invalid or expired refresh token",
    );
}

/// Every registered domain error.
pub const CATALOG: &[Error] = &[user::INVALID_CREDENTIALS, user::INVALID_REFRESH_TOKEN];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn invalid_credentials_names_neither_field() {
        // The description must not hint whether email or password was
        // wrong.
        assert_eq!(user::INVALID_CREDENTIALS.code(), "User.InvalidCredentials");
        assert_eq!(
            user::INVALID_CREDENTIALS.description(),
            "Invalid Email or Password"
        );
    }

    #[test]
    fn codes_are_non_empty_and_unique() {
        let mut seen = HashSet::new();
        for error in CATALOG {
            assert!(!error.is_none(), "registry entry with empty code");
            assert!(
                seen.insert(error.code()),
                "duplicate code: {}",
                error.code()
            );
        }
    }
}
