//! Registration screen controller.
//!
//! Unlike login, the email field is validated on every edit so the form can
//! show a live validity indicator. The error text stays blank while the field
//! is empty.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::SessionService;
use crate::domain::validation::{
    FieldCheck, validate_confirmation, validate_email, validate_register_password,
};
use crate::domain::{Credentials, Failure, Notice, Route, SignUpRejection, Transition};

use super::{Backend, Outcome, Shell};

/// Pause between the welcome notice and the redirect to `/login`.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(500);

/// Render state of the registration form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegisterView {
    /// Email field text.
    pub email: String,
    /// Password field text.
    pub password: Zeroizing<String>,
    /// Confirmation field text.
    pub confirm: Zeroizing<String>,
    /// Whether the password is shown unmasked.
    pub show_password: bool,
    /// Whether the confirmation is shown unmasked.
    pub show_confirm: bool,
    /// Set while sign-up is in flight.
    pub loading: bool,
    /// Drives the "Email is Valid" indicator.
    pub email_valid: bool,
    /// Email message; blank while the field is empty.
    pub email_error: Option<&'static str>,
    /// Password strength message.
    pub password_error: Option<&'static str>,
    /// Confirmation mismatch message.
    pub confirm_error: Option<&'static str>,
}

impl fmt::Debug for RegisterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterView")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm", &"<redacted>")
            .field("show_password", &self.show_password)
            .field("show_confirm", &self.show_confirm)
            .field("loading", &self.loading)
            .field("email_valid", &self.email_valid)
            .field("email_error", &self.email_error)
            .field("password_error", &self.password_error)
            .field("confirm_error", &self.confirm_error)
            .finish()
    }
}

/// Controller behind the `/register` route.
pub struct RegisterScreen {
    session: Arc<dyn SessionService>,
    shell: Shell,
    state: watch::Sender<RegisterView>,
    redirect_delay: Duration,
    pending_redirect: Option<JoinHandle<()>>,
}

impl RegisterScreen {
    /// Build the controller with an empty form and the default redirect
    /// delay.
    pub fn new(backend: &Backend, shell: &Shell) -> Self {
        let (state, _) = watch::channel(RegisterView::default());
        Self {
            session: Arc::clone(&backend.session),
            shell: shell.clone(),
            state,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            pending_redirect: None,
        }
    }

    /// Override the pause before redirecting after a successful sign-up.
    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Subscribe to render state.
    pub fn view(&self) -> watch::Receiver<RegisterView> {
        self.state.subscribe()
    }

    /// Copy of the current render state.
    pub fn current(&self) -> RegisterView {
        self.state.borrow().clone()
    }

    /// Replace the email field and re-run email validation.
    pub fn set_email(&mut self, email: impl Into<String>) {
        let email = email.into();
        let check = validate_email(&email);
        self.state.send_modify(|view| {
            view.email_valid = check.is_valid();
            view.email_error = if email.is_empty() {
                None
            } else {
                check.message()
            };
            view.email = email;
        });
    }

    /// Replace the password field.
    pub fn set_password(&mut self, password: impl Into<String>) {
        let password = Zeroizing::new(password.into());
        self.state.send_modify(|view| view.password = password);
    }

    /// Replace the confirmation field.
    pub fn set_confirm(&mut self, confirm: impl Into<String>) {
        let confirm = Zeroizing::new(confirm.into());
        self.state.send_modify(|view| view.confirm = confirm);
    }

    /// Flip masking of the password field.
    pub fn toggle_password_visibility(&mut self) {
        self.state
            .send_modify(|view| view.show_password = !view.show_password);
    }

    /// Flip masking of the confirmation field.
    pub fn toggle_confirm_visibility(&mut self) {
        self.state
            .send_modify(|view| view.show_confirm = !view.show_confirm);
    }

    /// Move to the login form.
    pub fn open_login(&mut self) {
        self.shell.navigator.navigate(Route::Login, Transition::Push);
    }

    /// Validate the form and, when it passes, create the account.
    ///
    /// On success the welcome notice is raised immediately and this returns;
    /// the redirect to `/login` is scheduled to follow after the configured
    /// delay without holding up the caller.
    ///
    /// # Panics
    /// Panics when a successful sign-up happens outside a Tokio runtime.
    pub async fn submit(&mut self) -> Outcome {
        let (email, password, confirm) = {
            let view = self.state.borrow();
            (view.email.clone(), view.password.clone(), view.confirm.clone())
        };

        let email_check = validate_email(&email);
        let password_check = validate_register_password(&password);
        let confirm_check = validate_confirmation(&password, &confirm);
        self.state.send_modify(|view| {
            view.email_valid = email_check.is_valid();
            view.email_error = email_check.message();
            view.password_error = password_check.message();
            view.confirm_error = confirm_check.message();
        });

        let blocked: Vec<Failure> = [email_check, password_check, confirm_check]
            .into_iter()
            .filter_map(FieldCheck::message)
            .map(Failure::validation)
            .collect();
        if !blocked.is_empty() {
            debug!(failed_checks = blocked.len(), "registration blocked by validation");
            return Outcome::Blocked(blocked);
        }

        let credentials = match Credentials::try_from_parts(&email, &password) {
            Ok(credentials) => credentials,
            Err(err) => return Outcome::Blocked(vec![Failure::validation(err.to_string())]),
        };

        self.state.send_modify(|view| view.loading = true);
        let result = self.session.sign_up(&credentials).await;
        self.state.send_modify(|view| view.loading = false);

        match result {
            Ok(identity) => {
                info!("sign-up succeeded");
                self.shell
                    .notifier
                    .notify(Notice::success(format!("Welcome {}!", identity.email())));
                self.schedule_redirect();
                Outcome::Completed
            }
            Err(err) => {
                let rejection = SignUpRejection::from_service_error(&err);
                warn!(
                    error = %err,
                    code = err.code(),
                    rejection = rejection.code(),
                    "sign-up failed"
                );
                let failure = rejection.to_failure();
                self.shell.notifier.notify(Notice::from(&failure));
                Outcome::Failed(failure)
            }
        }
    }

    /// Whether a post-sign-up redirect is still waiting on its delay.
    pub fn redirect_pending(&self) -> bool {
        self.pending_redirect
            .as_ref()
            .is_some_and(|redirect| !redirect.is_finished())
    }

    fn schedule_redirect(&mut self) {
        let navigator = Arc::clone(&self.shell.navigator);
        let delay = self.redirect_delay;
        if let Some(previous) = self.pending_redirect.take() {
            previous.abort();
        }
        self.pending_redirect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigator.navigate(Route::Login, Transition::Push);
        }));
    }
}

impl Drop for RegisterScreen {
    fn drop(&mut self) {
        if let Some(redirect) = self.pending_redirect.take() {
            redirect.abort();
        }
    }
}

#[cfg(test)]
#[path = "register_tests.rs"]
mod tests;
