//! Authentication service — token issuance, renewal, and revocation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use tollgate_core::error::{TollgateError, TollgateResult};
use tollgate_core::models::refresh_token::RefreshToken;
use tollgate_core::models::user::User;
use tollgate_core::outcome::Outcome;
use tollgate_core::registry;
use tollgate_core::repository::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token::{self, IssuedToken, TokenIssuer};

/// Immutable snapshot of a successful issuance.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Signed access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_in: u64,
    /// Raw opaque refresh token; its twin lives on the user record.
    pub refresh_token: String,
    pub refresh_token_expires_on: DateTime<Utc>,
}

/// Authentication service.
///
/// Generic over the repository and token issuer so the auth layer has
/// no dependency on the database crate or the signing backend.
///
/// Every operation is two-channel: domain failures (bad credentials,
/// unusable refresh tokens) come back inside the [`Outcome`], while
/// infrastructure failures and cancellation use the error position of
/// the outer `Result`.
pub struct AuthService<R: UserRepository, I: TokenIssuer> {
    users: R,
    issuer: I,
    config: AuthConfig,
}

impl<R: UserRepository, I: TokenIssuer> AuthService<R, I> {
    pub fn new(users: R, issuer: I, config: AuthConfig) -> Self {
        Self {
            users,
            issuer,
            config,
        }
    }

    /// Verify credentials and issue an access token plus a fresh
    /// refresh token, appended to the user's collection.
    ///
    /// An unknown email and a wrong password return the same error
    /// value, so a caller cannot tell which check failed.
    pub async fn issue_token(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> TollgateResult<Outcome<AuthResponse>> {
        ensure_not_cancelled(cancel)?;

        // 1. Look up the user by email.
        let user = match self.users.get_by_email(email).await {
            Ok(user) => user,
            Err(TollgateError::NotFound { .. }) => {
                return Ok(Outcome::failure(registry::user::INVALID_CREDENTIALS));
            }
            Err(e) => return Err(e),
        };

        // 2. Verify the presented password.
        ensure_not_cancelled(cancel)?;
        let valid = password::verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Ok(Outcome::failure(registry::user::INVALID_CREDENTIALS));
        }

        // 3. Issue the access token.
        let issued = self.issuer.generate_token(&user)?;

        // 4–5. Mint a refresh token and persist the append.
        let refresh = self.mint_refresh_token();
        let user = self
            .append_refresh_token(user, refresh.clone(), cancel)
            .await?;

        Ok(Outcome::success(Self::response(&user, issued, refresh)))
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The access token may be expired — signature and issuer are
    /// still enforced and identify the user. The presented refresh
    /// token must exist on that user and be unexpired; it is consumed
    /// in the same write that appends its replacement (rotation, not
    /// reuse).
    pub async fn renew_token(
        &self,
        access_token: &str,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> TollgateResult<Outcome<AuthResponse>> {
        ensure_not_cancelled(cancel)?;

        let Some(user_id) = self.user_id_from_token(access_token)? else {
            return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
        };

        for _ in 0..=self.config.persist_retry_limit {
            ensure_not_cancelled(cancel)?;
            let mut user = match self.users.get_by_id(user_id).await {
                Ok(user) => user,
                Err(TollgateError::NotFound { .. }) => {
                    return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
                }
                Err(e) => return Err(e),
            };

            // Consume the presented token. Unknown, expired, and
            // already-rotated all look the same to the caller.
            if user
                .take_active_refresh_token(refresh_token, Utc::now())
                .is_none()
            {
                return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
            }

            let replacement = self.mint_refresh_token();
            user.refresh_tokens.push(replacement.clone());

            match self.users.update(&user).await {
                Ok(updated) => {
                    let issued = self.issuer.generate_token(&updated)?;
                    return Ok(Outcome::success(Self::response(
                        &updated,
                        issued,
                        replacement,
                    )));
                }
                Err(TollgateError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TollgateError::Internal(
            "refresh token rotation kept losing the version race".into(),
        ))
    }

    /// Remove the named refresh token from its user's collection.
    ///
    /// Fails (as a domain outcome) when the token is unknown, expired,
    /// or already gone.
    pub async fn revoke_token(
        &self,
        access_token: &str,
        refresh_token: &str,
        cancel: &CancellationToken,
    ) -> TollgateResult<Outcome> {
        ensure_not_cancelled(cancel)?;

        let Some(user_id) = self.user_id_from_token(access_token)? else {
            return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
        };

        for _ in 0..=self.config.persist_retry_limit {
            ensure_not_cancelled(cancel)?;
            let mut user = match self.users.get_by_id(user_id).await {
                Ok(user) => user,
                Err(TollgateError::NotFound { .. }) => {
                    return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
                }
                Err(e) => return Err(e),
            };

            if user
                .take_active_refresh_token(refresh_token, Utc::now())
                .is_none()
            {
                return Ok(Outcome::failure(registry::user::INVALID_REFRESH_TOKEN));
            }

            match self.users.update(&user).await {
                Ok(_) => return Ok(Outcome::success(())),
                Err(TollgateError::VersionConflict { .. }) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(TollgateError::Internal(
            "refresh token revocation kept losing the version race".into(),
        ))
    }

    /// Identify the user behind an access token presented for renewal
    /// or revocation. `Ok(None)` means the token does not check out —
    /// a domain failure, not an infrastructure one.
    fn user_id_from_token(&self, access_token: &str) -> TollgateResult<Option<Uuid>> {
        let claims = match token::decode_access_token_ignoring_expiry(access_token, &self.config) {
            Ok(claims) => claims,
            Err(AuthError::TokenInvalid(_) | AuthError::TokenExpired) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(claims.sub.parse::<Uuid>().ok())
    }

    fn mint_refresh_token(&self) -> RefreshToken {
        RefreshToken {
            token: token::generate_refresh_token(),
            expires_on: Utc::now() + Duration::days(self.config.refresh_token_retention_days),
        }
    }

    /// Append `refresh` to the user's collection, retrying the
    /// read-modify-write when a concurrent issuance won the version
    /// race. Once `update` has been issued the write is not
    /// interrupted; cancellation is only honored between attempts.
    async fn append_refresh_token(
        &self,
        mut user: User,
        refresh: RefreshToken,
        cancel: &CancellationToken,
    ) -> TollgateResult<User> {
        for _ in 0..=self.config.persist_retry_limit {
            ensure_not_cancelled(cancel)?;
            user.refresh_tokens.push(refresh.clone());
            match self.users.update(&user).await {
                Ok(updated) => return Ok(updated),
                Err(TollgateError::VersionConflict { .. }) => {
                    user = self.users.get_by_id(user.id).await?;
                }
                Err(e) => return Err(e),
            }
        }

        Err(TollgateError::Internal(
            "refresh token append kept losing the version race".into(),
        ))
    }

    fn response(user: &User, issued: IssuedToken, refresh: RefreshToken) -> AuthResponse {
        AuthResponse {
            user_id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            access_token: issued.token,
            access_token_expires_in: issued.expires_in,
            refresh_token: refresh.token,
            refresh_token_expires_on: refresh.expires_on,
        }
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> TollgateResult<()> {
    if cancel.is_cancelled() {
        return Err(TollgateError::Cancelled);
    }
    Ok(())
}
