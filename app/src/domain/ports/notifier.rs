//! Port through which screens raise alerts.

use crate::domain::Notice;

/// Port implemented by the UI collaborator's alert surface.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    /// Show `notice` to the user. Must not block.
    fn notify(&self, notice: Notice);
}
