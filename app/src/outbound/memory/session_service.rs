//! In-memory session service.
//!
//! Applies the hosted provider's own account rules, which are looser than
//! the register form's: any well-formed address is accepted and passwords
//! need only six characters.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{SessionService, SessionServiceError};
use crate::domain::{Credentials, Identity, SessionToken};

/// Shortest password the provider accepts.
pub const PROVIDER_PASSWORD_MIN: usize = 6;
const TOKEN_LENGTH: usize = 32;

/// Session service holding accounts in a map keyed by email.
#[derive(Default)]
pub struct InMemorySessionService {
    accounts: Mutex<HashMap<String, Zeroizing<String>>>,
    current: Mutex<Option<Identity>>,
}

impl InMemorySessionService {
    /// Empty account registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without going through sign-up rules.
    #[must_use]
    pub fn with_account(self, email: &str, password: &str) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(email.to_owned(), Zeroizing::new(password.to_owned()));
        }
        self
    }

    /// Identity of the signed-in account, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn accounts(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<String, Zeroizing<String>>>, SessionServiceError> {
        self.accounts
            .lock()
            .map_err(|_| SessionServiceError::unavailable("account registry lock poisoned"))
    }

    fn start_session(&self, email: &str) -> Result<Identity, SessionServiceError> {
        let identity = Identity::new(email, SessionToken::new(random_token()));
        let mut current = self
            .current
            .lock()
            .map_err(|_| SessionServiceError::unavailable("session lock poisoned"))?;
        *current = Some(identity.clone());
        Ok(identity)
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        if !looks_like_email(credentials.email()) {
            return Err(SessionServiceError::invalid_email());
        }
        {
            let accounts = self.accounts()?;
            let stored = accounts
                .get(credentials.email())
                .ok_or_else(SessionServiceError::user_not_found)?;
            if stored.as_str() != credentials.password() {
                return Err(SessionServiceError::wrong_password());
            }
        }
        debug!("in-memory sign-in accepted");
        self.start_session(credentials.email())
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        if !looks_like_email(credentials.email()) {
            return Err(SessionServiceError::invalid_email());
        }
        if credentials.password().chars().count() < PROVIDER_PASSWORD_MIN {
            return Err(SessionServiceError::weak_password());
        }
        {
            let mut accounts = self.accounts()?;
            if accounts.contains_key(credentials.email()) {
                return Err(SessionServiceError::email_already_in_use());
            }
            accounts.insert(
                credentials.email().to_owned(),
                Zeroizing::new(credentials.password().to_owned()),
            );
        }
        debug!("in-memory account created");
        self.start_session(credentials.email())
    }

    async fn sign_out(&self) -> Result<(), SessionServiceError> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| SessionServiceError::unavailable("session lock poisoned"))?;
        *current = None;
        Ok(())
    }
}

/// One `@`, a non-empty local part, and a dotted domain; no whitespace.
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::try_from_parts(email, password).expect("non-empty credentials")
    }

    #[rstest]
    #[case("ada@gmail.com", true)]
    #[case("ada@mail.example.org", true)]
    #[case("ada@", false)]
    #[case("@gmail.com", false)]
    #[case("ada@gmail", false)]
    #[case("ada lovelace@gmail.com", false)]
    #[case("ada@@gmail.com", false)]
    fn email_shape(#[case] email: &str, #[case] expected: bool) {
        assert_eq!(looks_like_email(email), expected);
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_round_trips() {
        let service = InMemorySessionService::new();
        let created = service
            .sign_up(&credentials("ada@gmail.com", "Secret1!"))
            .await
            .expect("account created");
        assert_eq!(created.email(), "ada@gmail.com");

        service.sign_out().await.expect("signed out");
        assert!(service.current_identity().is_none());

        let identity = service
            .sign_in(&credentials("ada@gmail.com", "Secret1!"))
            .await
            .expect("signed in");
        assert_eq!(identity.token().expose().len(), TOKEN_LENGTH);
        assert_eq!(service.current_identity(), Some(identity));
    }

    #[rstest]
    #[case("nobody@gmail.com", "Secret1!", SessionServiceError::user_not_found())]
    #[case("ada@gmail.com", "wrong", SessionServiceError::wrong_password())]
    #[case("not-an-email", "Secret1!", SessionServiceError::invalid_email())]
    #[tokio::test]
    async fn sign_in_rejections(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: SessionServiceError,
    ) {
        let service = InMemorySessionService::new().with_account("ada@gmail.com", "Secret1!");
        let error = service
            .sign_in(&credentials(email, password))
            .await
            .expect_err("sign-in rejected");
        assert_eq!(error, expected);
        assert!(service.current_identity().is_none());
    }

    #[rstest]
    #[case("ada@gmail.com", "Secret1!", SessionServiceError::email_already_in_use())]
    #[case("new@gmail.com", "12345", SessionServiceError::weak_password())]
    #[case("new@", "Secret1!", SessionServiceError::invalid_email())]
    #[tokio::test]
    async fn sign_up_rejections(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: SessionServiceError,
    ) {
        let service = InMemorySessionService::new().with_account("ada@gmail.com", "Secret1!");
        let error = service
            .sign_up(&credentials(email, password))
            .await
            .expect_err("sign-up rejected");
        assert_eq!(error, expected);
    }

    #[tokio::test]
    async fn sign_out_without_session_succeeds() {
        let service = InMemorySessionService::new();
        service.sign_out().await.expect("no-op sign-out");
    }
}
