//! Start-up wiring: turn settings into backend handles.
//!
//! Handles are built once here and injected into every screen; nothing is
//! reconnected mid-session.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::config::{AppSettings, BackendKind, ConfigError};
use crate::domain::ports::{ItemStoreError, SessionServiceError};
use crate::outbound::firebase::{FirebaseSessionService, FirestoreItemStore, SessionSlot};
use crate::outbound::memory::{InMemoryItemStore, InMemorySessionService};
use crate::screens::Backend;

/// Failures raised while wiring the backend.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Settings were invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The session adapter could not be built.
    #[error("failed to build session service: {0}")]
    Session(#[from] SessionServiceError),
    /// The item store adapter could not be built.
    #[error("failed to build item store: {0}")]
    Store(#[from] ItemStoreError),
}

/// Build the backend selected by `settings`.
///
/// # Errors
/// Returns [`BootstrapError`] when settings are invalid or an adapter cannot
/// be constructed.
pub fn build_backend(settings: &AppSettings) -> Result<Backend, BootstrapError> {
    match settings.backend()? {
        BackendKind::Memory => {
            info!(backend = "memory", "wiring in-memory backend");
            Ok(Backend::new(
                Arc::new(InMemorySessionService::new()),
                Arc::new(InMemoryItemStore::new()),
            ))
        }
        BackendKind::Firebase => {
            let project_id = settings.project_id()?;
            info!(backend = "firebase", project_id, "wiring Firebase backend");
            let timeout = settings.request_timeout()?;
            let slot = SessionSlot::new();
            let session = FirebaseSessionService::new(
                &settings.auth_endpoint()?,
                settings.api_key()?,
                timeout,
                slot.clone(),
            )?;
            let items = FirestoreItemStore::new(
                &settings.firestore_endpoint()?,
                project_id,
                timeout,
                settings.poll_interval()?,
                slot,
            )?;
            Ok(Backend::new(Arc::new(session), Arc::new(items)))
        }
    }
}
