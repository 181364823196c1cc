//! Driving-side port through which screens request route changes.

use crate::domain::{Route, Transition};

/// Port implemented by the UI collaborator's router.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Move to `route`, keeping or discarding history per `transition`.
    fn navigate(&self, route: Route, transition: Transition);
}
