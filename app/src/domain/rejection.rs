//! Mapping from session service failures to the messages each screen shows.
//!
//! Login and registration recognise different subsets of failure kinds and
//! fall back to different generic messages, so each screen has its own
//! normalised reason type.

use super::Failure;
use super::ports::SessionServiceError;

/// Normalised reasons a sign-in attempt can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInRejection {
    /// No account exists for the email.
    NoAccount,
    /// The password does not match the account.
    WrongPassword,
    /// The provider rejected the email's format.
    InvalidEmailFormat,
    /// Any other failure.
    Generic,
}

impl SignInRejection {
    /// Classify a session service failure.
    pub fn from_service_error(error: &SessionServiceError) -> Self {
        match error {
            SessionServiceError::UserNotFound => Self::NoAccount,
            SessionServiceError::WrongPassword => Self::WrongPassword,
            SessionServiceError::InvalidEmail => Self::InvalidEmailFormat,
            SessionServiceError::WeakPassword
            | SessionServiceError::EmailAlreadyInUse
            | SessionServiceError::Unavailable { .. }
            | SessionServiceError::Unknown { .. } => Self::Generic,
        }
    }

    /// Machine-readable rejection code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoAccount => "no_account",
            Self::WrongPassword => "wrong_password",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::Generic => "generic",
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::NoAccount => "No account found for this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::InvalidEmailFormat => "Invalid email format.",
            Self::Generic => "Account does not exist.",
        }
    }

    /// User-facing failure for this rejection.
    pub fn to_failure(self) -> Failure {
        match self {
            Self::Generic => Failure::unknown(self.message()),
            _ => Failure::auth(self.message()),
        }
    }
}

/// Normalised reasons a sign-up attempt can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignUpRejection {
    /// The provider rejected the email's format.
    InvalidEmailFormat,
    /// The provider's password policy rejected the password.
    WeakPassword,
    /// An account already exists for the email.
    EmailInUse,
    /// Any other failure.
    Generic,
}

impl SignUpRejection {
    /// Classify a session service failure.
    pub fn from_service_error(error: &SessionServiceError) -> Self {
        match error {
            SessionServiceError::InvalidEmail => Self::InvalidEmailFormat,
            SessionServiceError::WeakPassword => Self::WeakPassword,
            SessionServiceError::EmailAlreadyInUse => Self::EmailInUse,
            SessionServiceError::UserNotFound
            | SessionServiceError::WrongPassword
            | SessionServiceError::Unavailable { .. }
            | SessionServiceError::Unknown { .. } => Self::Generic,
        }
    }

    /// Machine-readable rejection code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::WeakPassword => "weak_password",
            Self::EmailInUse => "email_in_use",
            Self::Generic => "generic",
        }
    }

    /// Message shown to the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::InvalidEmailFormat => "Invalid email format.",
            Self::WeakPassword => "Password is too weak.",
            Self::EmailInUse => "This account already exists.",
            Self::Generic => "An error occurred.",
        }
    }

    /// User-facing failure for this rejection.
    pub fn to_failure(self) -> Failure {
        match self {
            Self::Generic => Failure::unknown(self.message()),
            _ => Failure::auth(self.message()),
        }
    }
}
