//! Driven port for the hosted authentication provider.
//!
//! Adapters translate the provider's error codes into
//! [`SessionServiceError`] variants so screens match on a closed set instead
//! of inspecting raw strings.

use async_trait::async_trait;

use crate::domain::{Credentials, Identity};

use super::define_port_error;

define_port_error! {
    /// Failures reported by session service adapters.
    pub enum SessionServiceError {
        /// No account exists for the email.
        UserNotFound => "no account exists for this email",
        /// The account exists but the password does not match.
        WrongPassword => "password does not match the account",
        /// The provider considers the email malformed.
        InvalidEmail => "email address is malformed",
        /// The provider's own password policy rejected the password.
        WeakPassword => "password rejected by provider policy",
        /// An account already exists for the email.
        EmailAlreadyInUse => "an account already exists for this email",
        /// The provider could not be reached.
        Unavailable { message: String } => "session service unavailable: {message}",
        /// Any provider code without a dedicated variant.
        Unknown { code: String } => "session service failed with code {code}",
    }
}

/// Port for account sign-in, sign-up and sign-out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Authenticate an existing account.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError>;

    /// Create an account and sign it in.
    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError>;

    /// End the current session. Succeeds when no session is active.
    async fn sign_out(&self) -> Result<(), SessionServiceError>;
}
