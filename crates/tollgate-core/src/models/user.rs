//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::refresh_token::RefreshToken;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    /// Refresh tokens issued to this user, keyed by token value.
    /// Appended on issuance, removed on rotation or revocation; never
    /// evicted by expiry alone.
    pub refresh_tokens: Vec<RefreshToken>,
    /// Optimistic-concurrency stamp, bumped on every persisted write.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Look up a refresh token by value.
    pub fn refresh_token(&self, token: &str) -> Option<&RefreshToken> {
        self.refresh_tokens.iter().find(|t| t.token == token)
    }

    /// Remove and return the named refresh token if it is present and
    /// unexpired at `now`.
    ///
    /// Expired entries stay in place — expiry is only checked against
    /// a presented token, never swept.
    pub fn take_active_refresh_token(
        &mut self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Option<RefreshToken> {
        let idx = self
            .refresh_tokens
            .iter()
            .position(|t| t.token == token && !t.is_expired(now))?;
        Some(self.refresh_tokens.remove(idx))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_tokens(tokens: Vec<RefreshToken>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "alice@example.com".into(),
            first_name: "Alice".into(),
            last_name: "Anderson".into(),
            password_hash: "$argon2id$stub".into(),
            refresh_tokens: tokens,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn take_removes_only_the_named_token() {
        let now = Utc::now();
        let keep = RefreshToken {
            token: "keep".into(),
            expires_on: now + Duration::days(14),
        };
        let take = RefreshToken {
            token: "take".into(),
            expires_on: now + Duration::days(14),
        };
        let mut user = user_with_tokens(vec![keep.clone(), take.clone()]);

        assert_eq!(user.take_active_refresh_token("take", now), Some(take));
        assert_eq!(user.refresh_tokens, vec![keep]);
    }

    #[test]
    fn take_ignores_expired_tokens() {
        let now = Utc::now();
        let stale = RefreshToken {
            token: "stale".into(),
            expires_on: now - Duration::days(1),
        };
        let mut user = user_with_tokens(vec![stale.clone()]);

        assert_eq!(user.take_active_refresh_token("stale", now), None);
        // The expired entry is not swept.
        assert_eq!(user.refresh_tokens, vec![stale]);
    }
}
