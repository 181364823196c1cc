//! Recording doubles shared by the integration suites.
//!
//! Each double wraps an in-memory adapter so behaviour stays realistic while
//! the test inspects exactly which collaborator calls were made.

#![allow(dead_code, reason = "each suite uses a different subset of the doubles")]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use grocery_app::domain::ports::{
    ItemStore, ItemStoreError, ItemSubscription, Navigator, Notifier, SessionService,
    SessionServiceError,
};
use grocery_app::domain::{
    Credentials, Identity, ItemDraft, ItemId, ItemOrder, ItemPatch, Notice, Route, Transition,
};
use grocery_app::outbound::memory::{InMemoryItemStore, InMemorySessionService};
use grocery_app::screens::{Backend, Shell};

/// Navigator recording every request.
#[derive(Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<(Route, Transition)>>,
}

impl RecordingNavigator {
    pub fn calls(&self) -> Vec<(Route, Transition)> {
        self.calls.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route, transition: Transition) {
        self.calls
            .lock()
            .expect("navigator lock")
            .push((route, transition));
    }
}

/// Notifier recording every notice.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notifier lock").push(notice);
    }
}

/// Session service call made through [`RecordingSessionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCall {
    SignIn { email: String },
    SignUp { email: String },
    SignOut,
}

/// In-memory session service that records calls.
pub struct RecordingSessionService {
    inner: InMemorySessionService,
    calls: Mutex<Vec<SessionCall>>,
}

impl RecordingSessionService {
    pub fn new(inner: InMemorySessionService) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.calls.lock().expect("session calls lock").clone()
    }

    fn record(&self, call: SessionCall) {
        self.calls.lock().expect("session calls lock").push(call);
    }
}

#[async_trait]
impl SessionService for RecordingSessionService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        self.record(SessionCall::SignIn {
            email: credentials.email().to_owned(),
        });
        self.inner.sign_in(credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        self.record(SessionCall::SignUp {
            email: credentials.email().to_owned(),
        });
        self.inner.sign_up(credentials).await
    }

    async fn sign_out(&self) -> Result<(), SessionServiceError> {
        self.record(SessionCall::SignOut);
        self.inner.sign_out().await
    }
}

/// Item store call made through [`RecordingItemStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Insert(ItemDraft),
    Update(ItemId, ItemPatch),
    Delete(ItemId),
}

/// In-memory item store that records mutations and can be told to fail them.
pub struct RecordingItemStore {
    inner: Arc<InMemoryItemStore>,
    calls: Mutex<Vec<StoreCall>>,
    fail_writes: AtomicBool,
}

impl RecordingItemStore {
    pub fn new(inner: Arc<InMemoryItemStore>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("store calls lock").clone()
    }

    /// Make every subsequent mutation fail without touching the documents.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: StoreCall) -> Result<(), ItemStoreError> {
        self.calls.lock().expect("store calls lock").push(call);
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(ItemStoreError::unavailable("injected failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ItemStore for RecordingItemStore {
    fn subscribe(&self, order: ItemOrder) -> ItemSubscription {
        self.inner.subscribe(order)
    }

    async fn insert(&self, draft: &ItemDraft) -> Result<ItemId, ItemStoreError> {
        self.record(StoreCall::Insert(draft.clone()))?;
        self.inner.insert(draft).await
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), ItemStoreError> {
        self.record(StoreCall::Update(id.clone(), patch.clone()))?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &ItemId) -> Result<(), ItemStoreError> {
        self.record(StoreCall::Delete(id.clone()))?;
        self.inner.delete(id).await
    }
}

/// Fully wired collaborators for one scenario.
pub struct World {
    pub backend: Backend,
    pub shell: Shell,
    pub session: Arc<RecordingSessionService>,
    pub documents: Arc<InMemoryItemStore>,
    pub store: Arc<RecordingItemStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
}

impl World {
    pub fn new(accounts: InMemorySessionService) -> Self {
        let session = Arc::new(RecordingSessionService::new(accounts));
        let documents = Arc::new(InMemoryItemStore::new());
        let store = Arc::new(RecordingItemStore::new(documents.clone()));
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        Self {
            backend: Backend::new(session.clone(), store.clone()),
            shell: Shell::new(navigator.clone(), notifier.clone()),
            session,
            documents,
            store,
            navigator,
            notifier,
        }
    }

    pub fn notice_texts(&self) -> Vec<String> {
        self.notifier
            .notices()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
