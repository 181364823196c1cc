//! Login screen controller.
//!
//! Validates on submit only. A successful sign-in greets the user and
//! replaces navigation history with the home route so back-navigation cannot
//! return to the form.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::SessionService;
use crate::domain::validation::{FieldCheck, validate_email, validate_login_password};
use crate::domain::{Credentials, Failure, Notice, Route, SignInRejection, Transition};

use super::{Backend, Outcome, Shell};

/// Render state of the login form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    /// Email field text.
    pub email: String,
    /// Password field text.
    pub password: Zeroizing<String>,
    /// Whether the password is shown unmasked.
    pub show_password: bool,
    /// Set while sign-in is in flight.
    pub loading: bool,
    /// Message under the email field after a blocked submit.
    pub email_error: Option<&'static str>,
    /// Message under the password field after a blocked submit.
    pub password_error: Option<&'static str>,
}

impl fmt::Debug for LoginView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginView")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("show_password", &self.show_password)
            .field("loading", &self.loading)
            .field("email_error", &self.email_error)
            .field("password_error", &self.password_error)
            .finish()
    }
}

/// Controller behind the `/login` route.
pub struct LoginScreen {
    session: Arc<dyn SessionService>,
    shell: Shell,
    state: watch::Sender<LoginView>,
}

impl LoginScreen {
    /// Build the controller with an empty form.
    pub fn new(backend: &Backend, shell: &Shell) -> Self {
        let (state, _) = watch::channel(LoginView::default());
        Self {
            session: Arc::clone(&backend.session),
            shell: shell.clone(),
            state,
        }
    }

    /// Subscribe to render state.
    pub fn view(&self) -> watch::Receiver<LoginView> {
        self.state.subscribe()
    }

    /// Copy of the current render state.
    pub fn current(&self) -> LoginView {
        self.state.borrow().clone()
    }

    /// Replace the email field.
    pub fn set_email(&mut self, email: impl Into<String>) {
        let email = email.into();
        self.state.send_modify(|view| view.email = email);
    }

    /// Replace the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        let password = Zeroizing::new(password.into());
        self.state.send_modify(|view| view.password = password);
    }

    /// Flip password masking. Touches nothing else.
    pub fn toggle_password_visibility(&mut self) {
        self.state
            .send_modify(|view| view.show_password = !view.show_password);
    }

    /// Move to the registration form.
    pub fn open_register(&mut self) {
        self.shell
            .navigator
            .navigate(Route::Register, Transition::Push);
    }

    /// Validate the form and, when it passes, sign in.
    pub async fn submit(&mut self) -> Outcome {
        let (email, password) = {
            let view = self.state.borrow();
            (view.email.clone(), view.password.clone())
        };

        let email_check = validate_email(&email);
        let password_check = validate_login_password(&password);
        self.state.send_modify(|view| {
            view.email_error = email_check.message();
            view.password_error = password_check.message();
        });

        let blocked: Vec<Failure> = [email_check, password_check]
            .into_iter()
            .filter_map(FieldCheck::message)
            .map(Failure::validation)
            .collect();
        if !blocked.is_empty() {
            debug!(failed_checks = blocked.len(), "login blocked by validation");
            return Outcome::Blocked(blocked);
        }

        let credentials = match Credentials::try_from_parts(&email, &password) {
            Ok(credentials) => credentials,
            Err(err) => return Outcome::Blocked(vec![Failure::validation(err.to_string())]),
        };

        self.state.send_modify(|view| view.loading = true);
        let result = self.session.sign_in(&credentials).await;
        self.state.send_modify(|view| view.loading = false);

        match result {
            Ok(identity) => {
                info!("sign-in succeeded");
                self.shell.notifier.notify(Notice::success(format!(
                    "Welcome back, {}!",
                    identity.email()
                )));
                self.shell
                    .navigator
                    .navigate(Route::Home, Transition::Replace);
                Outcome::Completed
            }
            Err(err) => {
                let rejection = SignInRejection::from_service_error(&err);
                warn!(
                    error = %err,
                    code = err.code(),
                    rejection = rejection.code(),
                    "sign-in failed"
                );
                let failure = rejection.to_failure();
                self.shell.notifier.notify(Notice::from(&failure));
                Outcome::Failed(failure)
            }
        }
    }
}

#[cfg(test)]
#[path = "login_tests.rs"]
mod tests;
