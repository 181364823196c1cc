//! Screen controllers: the driving side of the hexagon.
//!
//! Each controller owns its form state, runs the validation layer before any
//! remote call, and reports results through the [`Navigator`] and
//! [`Notifier`] ports. State is published on a `tokio::sync::watch` channel
//! so renderers observe it without sharing mutable access.

use std::sync::Arc;

use crate::domain::Failure;
use crate::domain::ports::{ItemStore, Navigator, Notifier, SessionService};

mod grocery_list;
mod login;
mod register;

pub use grocery_list::{GroceryListScreen, GroceryListView};
pub use login::{LoginScreen, LoginView};
pub use register::{DEFAULT_REDIRECT_DELAY, RegisterScreen, RegisterView};

/// Backend handles built once at start-up and shared by every screen.
#[derive(Clone)]
pub struct Backend {
    /// Authentication provider.
    pub session: Arc<dyn SessionService>,
    /// Grocery document collection.
    pub items: Arc<dyn ItemStore>,
}

impl Backend {
    /// Bundle the two collaborators.
    pub fn new(session: Arc<dyn SessionService>, items: Arc<dyn ItemStore>) -> Self {
        Self { session, items }
    }
}

/// UI surfaces the screens drive.
#[derive(Clone)]
pub struct Shell {
    /// Router.
    pub navigator: Arc<dyn Navigator>,
    /// Alert surface.
    pub notifier: Arc<dyn Notifier>,
}

impl Shell {
    /// Bundle the two surfaces.
    pub fn new(navigator: Arc<dyn Navigator>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            navigator,
            notifier,
        }
    }
}

/// Result of a submit-style handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Local checks failed; no collaborator was contacted.
    Blocked(Vec<Failure>),
    /// Input was not actionable; nothing happened and nothing was shown.
    Ignored,
    /// The remote call succeeded.
    Completed,
    /// The remote call failed; the failure was shown to the user.
    Failed(Failure),
}

impl Outcome {
    /// Whether a remote call completed successfully.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}
