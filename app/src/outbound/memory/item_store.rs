//! In-memory grocery collection with push notifications.
//!
//! Every successful mutation publishes the full document set on a
//! `tokio::sync::watch` channel. Subscribers sort each published set into the
//! order they asked for, so every notification is a complete ordered
//! snapshot.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::sync::watch;
use tracing::debug;

use crate::domain::ports::{ItemStore, ItemStoreError, ItemSubscription};
use crate::domain::{GroceryItem, ItemDraft, ItemId, ItemOrder, ItemPatch, Snapshot};

/// Length of generated document ids.
pub const DOCUMENT_ID_LENGTH: usize = 20;

/// Item store backed by a map and a watch channel.
pub struct InMemoryItemStore {
    documents: Mutex<HashMap<ItemId, ItemDraft>>,
    published: watch::Sender<Vec<GroceryItem>>,
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryItemStore {
    /// Empty collection.
    pub fn new() -> Self {
        let (published, _) = watch::channel(Vec::new());
        Self {
            documents: Mutex::new(HashMap::new()),
            published,
        }
    }

    /// Current contents in the requested order.
    ///
    /// # Errors
    /// Returns [`ItemStoreError::Unavailable`] when the document lock is
    /// poisoned.
    pub fn snapshot(&self, order: ItemOrder) -> Result<Snapshot, ItemStoreError> {
        let documents = self.documents()?;
        let mut items = collect_items(&documents);
        order.sort(&mut items);
        Ok(Snapshot::new(items))
    }

    fn documents(&self) -> Result<MutexGuard<'_, HashMap<ItemId, ItemDraft>>, ItemStoreError> {
        self.documents
            .lock()
            .map_err(|_| ItemStoreError::unavailable("document lock poisoned"))
    }

    fn publish(&self, documents: &HashMap<ItemId, ItemDraft>) {
        self.published.send_replace(collect_items(documents));
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    fn subscribe(&self, order: ItemOrder) -> ItemSubscription {
        let receiver = self.published.subscribe();
        let snapshots = stream::unfold((receiver, true), move |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let mut items = receiver.borrow_and_update().clone();
            order.sort(&mut items);
            Some((Ok(Snapshot::new(items)), (receiver, false)))
        });
        ItemSubscription::new(snapshots.boxed())
    }

    async fn insert(&self, draft: &ItemDraft) -> Result<ItemId, ItemStoreError> {
        let mut documents = self.documents()?;
        let id = loop {
            let candidate = ItemId::new(random_document_id())
                .map_err(|err| ItemStoreError::rejected(err.to_string()))?;
            if !documents.contains_key(&candidate) {
                break candidate;
            }
        };
        documents.insert(id.clone(), draft.clone());
        self.publish(&documents);
        debug!(item_id = %id, "in-memory item inserted");
        Ok(id)
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), ItemStoreError> {
        let mut documents = self.documents()?;
        let Some(document) = documents.get_mut(id) else {
            return Err(ItemStoreError::not_found(id.as_str()));
        };
        patch.apply_to(document);
        self.publish(&documents);
        Ok(())
    }

    async fn delete(&self, id: &ItemId) -> Result<(), ItemStoreError> {
        let mut documents = self.documents()?;
        if documents.remove(id).is_some() {
            self.publish(&documents);
        }
        Ok(())
    }
}

fn collect_items(documents: &HashMap<ItemId, ItemDraft>) -> Vec<GroceryItem> {
    documents
        .iter()
        .map(|(id, draft)| GroceryItem {
            id: id.clone(),
            name: draft.name.clone(),
            quantity: draft.quantity,
        })
        .collect()
}

fn random_document_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(DOCUMENT_ID_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn next_names(subscription: &mut ItemSubscription) -> Vec<String> {
        let snapshot = tokio::time::timeout(Duration::from_secs(1), subscription.next())
            .await
            .expect("snapshot in time")
            .expect("stream open")
            .expect("snapshot ok");
        snapshot
            .into_items()
            .into_iter()
            .map(|item| item.name)
            .collect()
    }

    #[tokio::test]
    async fn first_notification_carries_current_contents() {
        let store = InMemoryItemStore::new();
        store
            .insert(&ItemDraft::new("Milk", 2))
            .await
            .expect("insert");

        let mut subscription = store.subscribe(ItemOrder::NameAscending);
        assert_eq!(next_names(&mut subscription).await, vec!["Milk"]);
    }

    #[tokio::test]
    async fn notifications_follow_mutations_in_name_order() {
        let store = InMemoryItemStore::new();
        let mut subscription = store.subscribe(ItemOrder::NameAscending);
        assert!(next_names(&mut subscription).await.is_empty());

        let milk = store
            .insert(&ItemDraft::new("Milk", 2))
            .await
            .expect("insert");
        assert_eq!(next_names(&mut subscription).await, vec!["Milk"]);

        store
            .insert(&ItemDraft::new("Bread", 1))
            .await
            .expect("insert");
        assert_eq!(next_names(&mut subscription).await, vec!["Bread", "Milk"]);

        store
            .update(
                &milk,
                &ItemPatch {
                    name: Some("Apples".to_owned()),
                    quantity: None,
                },
            )
            .await
            .expect("update");
        assert_eq!(next_names(&mut subscription).await, vec!["Apples", "Bread"]);

        store.delete(&milk).await.expect("delete");
        assert_eq!(next_names(&mut subscription).await, vec!["Bread"]);
    }

    #[tokio::test]
    async fn generated_ids_are_alphanumeric() {
        let store = InMemoryItemStore::new();
        let id = store
            .insert(&ItemDraft::new("Tea", 1))
            .await
            .expect("insert");
        assert_eq!(id.as_str().len(), DOCUMENT_ID_LENGTH);
        assert!(id.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn updating_a_missing_item_is_not_found() {
        let store = InMemoryItemStore::new();
        let missing = ItemId::new("missing").expect("valid id");
        let error = store
            .update(&missing, &ItemPatch::from(ItemDraft::new("Tea", 1)))
            .await
            .expect_err("missing document");
        assert_eq!(error, ItemStoreError::not_found("missing"));
    }

    #[tokio::test]
    async fn deleting_a_missing_item_succeeds() {
        let store = InMemoryItemStore::new();
        let missing = ItemId::new("missing").expect("valid id");
        store.delete(&missing).await.expect("idempotent delete");
        assert!(
            store
                .snapshot(ItemOrder::NameAscending)
                .expect("snapshot")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn closed_subscription_stops_delivering() {
        let store = InMemoryItemStore::new();
        let mut subscription = store.subscribe(ItemOrder::NameAscending);
        next_names(&mut subscription).await;

        subscription.close();
        store
            .insert(&ItemDraft::new("Milk", 2))
            .await
            .expect("insert");
        assert!(subscription.next().await.is_none());
    }
}
