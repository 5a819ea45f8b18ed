//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Concurrent writers are
//! expected: [`UserRepository::update`] is a compare-and-swap on the
//! record's version stamp, and callers retry the read-modify-write on
//! [`TollgateError::VersionConflict`](crate::error::TollgateError).

use uuid::Uuid;

use crate::error::TollgateResult;
use crate::models::user::{CreateUser, User};

pub trait UserRepository: Send + Sync {
    /// Create a user. The raw password is hashed before storage and
    /// the version stamp starts at zero.
    fn create(&self, input: CreateUser) -> impl Future<Output = TollgateResult<User>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = TollgateResult<User>> + Send;

    fn get_by_email(&self, email: &str) -> impl Future<Output = TollgateResult<User>> + Send;

    /// Persist `user` if the stored version stamp still matches
    /// `user.version`; returns the record with the stamp bumped. A
    /// concurrent write in between yields a `VersionConflict`.
    fn update(&self, user: &User) -> impl Future<Output = TollgateResult<User>> + Send;
}
