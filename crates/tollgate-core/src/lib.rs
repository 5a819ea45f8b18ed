//! Tollgate Core — domain models, the success/failure outcome
//! abstraction, the domain error registry, and repository traits.

pub mod error;
pub mod models;
pub mod outcome;
pub mod registry;
pub mod repository;

pub use error::{TollgateError, TollgateResult};
pub use outcome::{Error, Outcome};
