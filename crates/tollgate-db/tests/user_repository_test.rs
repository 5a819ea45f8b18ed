//! Integration tests for the User repository using in-memory SurrealDB.

use chrono::{Duration, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

use tollgate_core::error::TollgateError;
use tollgate_core::models::refresh_token::RefreshToken;
use tollgate_core::models::user::CreateUser;
use tollgate_core::repository::UserRepository;
use tollgate_db::repository::SurrealUserRepository;

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tollgate_db::run_migrations(&db).await.unwrap();
    db
}

fn alice() -> CreateUser {
    CreateUser {
        email: "alice@example.com".into(),
        first_name: "Alice".into(),
        last_name: "Anderson".into(),
        password: "correct-horse-battery".into(),
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo.create(alice()).await.unwrap();

    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.first_name, "Alice");
    assert_eq!(user.last_name, "Anderson");
    assert_eq!(user.version, 0);
    assert!(user.refresh_tokens.is_empty());

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "correct-horse-battery");
    assert!(user.password_hash.starts_with("$argon2id$"));

    // Both lookups should return the same record.
    let by_id = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(by_id.id, user.id);

    let by_email = repo.get_by_email("alice@example.com").await.unwrap();
    assert_eq!(by_email.id, user.id);
}

#[tokio::test]
async fn unknown_email_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let err = repo.get_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, TollgateError::NotFound { .. }));
}

#[tokio::test]
async fn pepper_changes_the_hash_input() {
    let db = setup().await;
    let repo = SurrealUserRepository::with_pepper(db, "server-secret".into());

    let user = repo.create(alice()).await.unwrap();
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn update_persists_refresh_tokens_and_bumps_version() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let mut user = repo.create(alice()).await.unwrap();
    user.refresh_tokens.push(RefreshToken {
        token: "opaque-token".into(),
        expires_on: Utc::now() + Duration::days(14),
    });

    let updated = repo.update(&user).await.unwrap();
    assert_eq!(updated.version, 1);
    assert_eq!(updated.refresh_tokens.len(), 1);
    assert_eq!(updated.refresh_tokens[0].token, "opaque-token");

    // The write is visible to a fresh read.
    let fetched = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fetched.version, 1);
    assert_eq!(fetched.refresh_tokens, updated.refresh_tokens);
}

#[tokio::test]
async fn stale_update_is_rejected() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db);

    let created = repo.create(alice()).await.unwrap();

    // Two readers pick up version 0.
    let mut first = repo.get_by_id(created.id).await.unwrap();
    let mut second = repo.get_by_id(created.id).await.unwrap();

    first.refresh_tokens.push(RefreshToken {
        token: "winner".into(),
        expires_on: Utc::now() + Duration::days(14),
    });
    repo.update(&first).await.unwrap();

    // The second writer still carries version 0 and must lose.
    second.refresh_tokens.push(RefreshToken {
        token: "loser".into(),
        expires_on: Utc::now() + Duration::days(14),
    });
    let err = repo.update(&second).await.unwrap_err();
    assert!(matches!(err, TollgateError::VersionConflict { .. }));

    // The first write survives untouched.
    let fetched = repo.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.refresh_tokens.len(), 1);
    assert_eq!(fetched.refresh_tokens[0].token, "winner");
}

#[tokio::test]
async fn update_of_missing_user_is_not_found() {
    let db = setup().await;
    let repo = SurrealUserRepository::new(db.clone());

    let mut user = repo.create(alice()).await.unwrap();
    db.query("DELETE user").await.unwrap();

    user.refresh_tokens.push(RefreshToken {
        token: "orphan".into(),
        expires_on: Utc::now() + Duration::days(14),
    });
    let err = repo.update(&user).await.unwrap_err();
    assert!(matches!(err, TollgateError::NotFound { .. }));
}
