//! Refresh token domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque, single-use credential for obtaining a new access token
/// without re-presenting a password.
///
/// Owned by exactly one user record. Created on each successful
/// issuance and never mutated afterwards; rotation and revocation
/// remove it from the owning collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub expires_on: DateTime<Utc>,
}

impl RefreshToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_on <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_is_a_strict_deadline() {
        let now = Utc::now();
        let token = RefreshToken {
            token: "abc".into(),
            expires_on: now,
        };
        assert!(token.is_expired(now));
        assert!(!token.is_expired(now - Duration::seconds(1)));
        assert!(token.is_expired(now + Duration::seconds(1)));
    }
}
