//! Firebase REST adapters.
//!
//! [`FirebaseSessionService`] talks to the Identity Toolkit API and
//! [`FirestoreItemStore`] to the Firestore document API. Both share a
//! [`SessionSlot`] so store requests carry the signed-in user's ID token.

mod dto;
mod firestore;
mod http;
mod identity_toolkit;

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::SessionToken;

pub use firestore::FirestoreItemStore;
pub use identity_toolkit::FirebaseSessionService;

/// Default Identity Toolkit origin.
pub const DEFAULT_AUTH_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";
/// Default Firestore origin.
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com";

/// ID token of the signed-in user, shared between the two adapters.
///
/// Only the ID token is kept. Identity Toolkit tokens expire after an hour
/// and the refresh token from sign-in is discarded, so Firestore requests
/// start failing with `401` until the user signs in again.
#[derive(Clone, Default)]
pub struct SessionSlot {
    token: Arc<RwLock<Option<SessionToken>>>,
}

impl SessionSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn store(&self, token: SessionToken) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current token, if signed in.
    pub fn token(&self) -> Option<SessionToken> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
