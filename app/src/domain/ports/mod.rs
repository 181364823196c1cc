//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`SessionService`], [`ItemStore`]) front the hosted backend;
//! UI ports ([`Navigator`], [`Notifier`]) front the rendering framework. Each
//! trait exposes strongly typed errors so adapters map their failures into
//! predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod item_store;
mod navigator;
mod notifier;
mod session_service;

#[cfg(test)]
pub use item_store::MockItemStore;
pub use item_store::{ItemStore, ItemStoreError, ItemSubscription, SnapshotStream};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::Notifier;
#[cfg(test)]
pub use session_service::MockSessionService;
pub use session_service::{SessionService, SessionServiceError};
