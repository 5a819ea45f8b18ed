//! Success/failure outcome abstraction for expected domain failures.
//!
//! Service boundaries return an [`Outcome`] instead of a null value or
//! an error type for failures a client can act on. Two variants make
//! the `success ⇔ no error` invariant structural: a success can never
//! carry an error and a failure always carries exactly one.

use serde::Serialize;

/// An immutable `(code, description)` pair naming a domain failure.
///
/// The well-known [`Error::NONE`] value (empty code and description)
/// denotes absence of failure. Every other instance lives in the
/// [`registry`](crate::registry) and carries a non-empty code.
/// Equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Error {
    code: &'static str,
    description: &'static str,
}

impl Error {
    /// Absence of failure.
    pub const NONE: Error = Error {
        code: "",
        description: "",
    };

    pub const fn new(code: &'static str, description: &'static str) -> Self {
        Self { code, description }
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Whether this is the no-failure sentinel.
    pub const fn is_none(&self) -> bool {
        self.code.is_empty()
    }
}

/// The result of a domain operation: success with a payload, or
/// failure with a single [`Error`].
///
/// The non-generic `Outcome` of payload-free operations is the
/// `T = ()` default. Outcomes are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Success(T),
    Failure(Error),
}

impl<T> Outcome<T> {
    /// A successful outcome carrying `value`.
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    /// A failed outcome carrying `error`.
    ///
    /// Panics if `error` is [`Error::NONE`] — a failure without a
    /// reason is a programming error, not a domain state.
    pub fn failure(error: Error) -> Self {
        assert!(
            !error.is_none(),
            "Outcome::failure requires a non-NONE error"
        );
        Outcome::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The failure reason, or [`Error::NONE`] for a success.
    pub fn error(&self) -> Error {
        match self {
            Outcome::Success(_) => Error::NONE,
            Outcome::Failure(error) => *error,
        }
    }

    /// The success payload.
    ///
    /// Panics on a failed outcome: reading the payload of a failure is
    /// a contract violation and is never answered with a default.
    pub fn value(&self) -> &T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => {
                panic!("accessed value of a failed Outcome ({})", error.code())
            }
        }
    }

    /// Consumes the outcome and returns the success payload.
    ///
    /// Panics on a failed outcome, like [`Outcome::value`].
    pub fn into_value(self) -> T {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(error) => {
                panic!("accessed value of a failed Outcome ({})", error.code())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn success_round_trips_value() {
        let outcome = Outcome::success(42);
        assert!(outcome.is_success());
        assert!(!outcome.is_failure());
        assert_eq!(*outcome.value(), 42);
        assert_eq!(outcome.into_value(), 42);
    }

    #[test]
    fn success_has_no_error() {
        let outcome: Outcome<&str> = Outcome::success("payload");
        assert_eq!(outcome.error(), Error::NONE);
        assert!(outcome.error().is_none());
    }

    #[test]
    fn failure_carries_its_error() {
        let outcome: Outcome<u32> = Outcome::failure(registry::user::INVALID_CREDENTIALS);
        assert!(outcome.is_failure());
        assert_eq!(outcome.error(), registry::user::INVALID_CREDENTIALS);
        assert!(!outcome.error().code().is_empty());
    }

    #[test]
    #[should_panic(expected = "non-NONE error")]
    fn failure_rejects_the_none_sentinel() {
        let _ = Outcome::<()>::failure(Error::NONE);
    }

    #[test]
    #[should_panic(expected = "accessed value of a failed Outcome")]
    fn value_of_failure_panics() {
        let outcome: Outcome<u32> = Outcome::failure(registry::user::INVALID_CREDENTIALS);
        let _ = outcome.value();
    }

    #[test]
    #[should_panic(expected = "accessed value of a failed Outcome")]
    fn into_value_of_failure_panics() {
        let outcome: Outcome<u32> = Outcome::failure(registry::user::INVALID_CREDENTIALS);
        let _ = outcome.into_value();
    }

    #[test]
    fn unit_outcome_works_without_payload() {
        let outcome = Outcome::success(());
        assert!(outcome.is_success());
        assert_eq!(outcome.error(), Error::NONE);
    }

    #[test]
    fn error_equality_is_by_value() {
        let a = Error::new("User.Test", "test");
        let b = Error::new("User.Test", "test");
        assert_eq!(a, b);
        assert_ne!(a, Error::new("User.Other", "test"));
    }
}
