//! Driven port for the hosted grocery document collection.
//!
//! The store owns the authoritative list. Screens observe it only through an
//! [`ItemSubscription`], a lazy stream of full ordered snapshots, and mutate
//! it only through round-trips.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_util::Stream;
use futures_util::stream::{AbortHandle, Abortable, BoxStream};

use crate::domain::{ItemDraft, ItemId, ItemOrder, ItemPatch, Snapshot};

use super::define_port_error;

define_port_error! {
    /// Failures reported by item store adapters.
    pub enum ItemStoreError {
        /// Transport or backend outage.
        Unavailable { message: String } => "item store unavailable: {message}",
        /// The store refused the request (permissions, validation, quota).
        Rejected { message: String } => "item store rejected the request: {message}",
        /// The addressed document does not exist.
        NotFound { id: String } => "grocery item {id} does not exist",
        /// A response could not be decoded into domain types.
        Decode { message: String } => "item store response could not be decoded: {message}",
    }
}

/// Stream type adapters hand to [`ItemSubscription::new`].
pub type SnapshotStream = BoxStream<'static, Result<Snapshot, ItemStoreError>>;

/// Cancellable handle on a live query.
///
/// Yields one snapshot per store change, starting with the current contents.
/// Closing (explicitly or by dropping the handle) ends the stream; no further
/// snapshots are delivered afterwards.
pub struct ItemSubscription {
    stream: Abortable<SnapshotStream>,
    handle: AbortHandle,
}

impl ItemSubscription {
    /// Wrap an adapter stream.
    pub fn new(stream: SnapshotStream) -> Self {
        let (handle, registration) = AbortHandle::new_pair();
        Self {
            stream: Abortable::new(stream, registration),
            handle,
        }
    }

    /// Handle that closes this subscription from elsewhere.
    pub fn closer(&self) -> AbortHandle {
        self.handle.clone()
    }

    /// Stop delivering snapshots.
    pub fn close(&self) {
        self.handle.abort();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.handle.is_aborted()
    }
}

impl Stream for ItemSubscription {
    type Item = Result<Snapshot, ItemStoreError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.stream).poll_next(cx)
    }
}

impl Drop for ItemSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Port for the `groceries` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Open a live query. Nothing is fetched until the stream is polled.
    fn subscribe(&self, order: ItemOrder) -> ItemSubscription;

    /// Create a document and return its store-assigned id.
    async fn insert(&self, draft: &ItemDraft) -> Result<ItemId, ItemStoreError>;

    /// Update fields of an existing document.
    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), ItemStoreError>;

    /// Remove a document. Removing a missing document succeeds.
    async fn delete(&self, id: &ItemId) -> Result<(), ItemStoreError>;
}
