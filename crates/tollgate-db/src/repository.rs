//! Repository implementations for `tollgate-core` traits.

mod user;

pub use user::SurrealUserRepository;
