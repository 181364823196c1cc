//! User-facing failure taxonomy.
//!
//! Screens convert every validation or collaborator error into a [`Failure`]
//! before anything reaches the user. Raw collaborator detail is logged at the
//! call site and never copied into the failure message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable machine-readable category of a [`Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A form field failed a local syntactic check. Never reaches the network.
    Validation,
    /// The session service rejected the credentials with a recognised reason.
    Auth,
    /// The item store refused or failed a mutation.
    Store,
    /// Any remote failure without a dedicated mapping.
    Unknown,
}

/// Failure surfaced to the user, always recoverable by re-trying the action.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use grocery_app::domain::{Failure, FailureKind};
///
/// let failure = Failure::store("Could not save item");
/// assert_eq!(failure.kind(), FailureKind::Store);
/// assert_eq!(failure.message(), "Could not save item");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    kind: FailureKind,
    message: String,
}

/// Validation errors emitted by [`Failure::try_new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureValidationError {
    EmptyMessage,
}

impl fmt::Display for FailureValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "failure message must not be empty"),
        }
    }
}

impl std::error::Error for FailureValidationError {}

impl Failure {
    /// Create a new failure, panicking if validation fails.
    ///
    /// Messages in this crate are compile-time constants, so the panic marks
    /// a programming error rather than a runtime condition.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        match Self::try_new(kind, message) {
            Ok(value) => value,
            Err(err) => panic!("failure messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Result<Self, FailureValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(FailureValidationError::EmptyMessage);
        }
        Ok(Self { kind, message })
    }

    /// Stable machine-readable category.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Human-readable message shown to the user.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Convenience constructor for [`FailureKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    /// Convenience constructor for [`FailureKind::Auth`].
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Auth, message)
    }

    /// Convenience constructor for [`FailureKind::Store`].
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Store, message)
    }

    /// Convenience constructor for [`FailureKind::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unknown, message)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Failure {}
