//! Grocery list screen controller.
//!
//! The displayed list is a read-only projection of the item store: a
//! background pump copies every snapshot from the live query into the view,
//! and mutations only ever round-trip through the store. The controller never
//! reorders, filters or optimistically edits `items`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use futures_util::stream::AbortHandle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::ports::{ItemStore, ItemSubscription, SessionService};
use crate::domain::{
    Failure, GroceryItem, ItemDraft, ItemId, ItemOrder, ItemPatch, Notice, Route, Transition,
    parse_quantity,
};

use super::{Backend, Outcome, Shell};

const SAVE_FAILED_MESSAGE: &str = "Could not save item";
const DELETE_FAILED_MESSAGE: &str = "Could not delete item";
const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";
const LOGOUT_FAILED_MESSAGE: &str = "Failed to log out. Please try again.";

/// Render state of the grocery list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroceryListView {
    /// Latest snapshot from the store, in store order.
    pub items: Vec<GroceryItem>,
    /// Name field text.
    pub name: String,
    /// Raw quantity text; parsed only on submit.
    pub quantity: String,
    /// Item being edited, if any.
    pub edit_id: Option<ItemId>,
}

impl GroceryListView {
    /// Whether the form is editing an existing item.
    pub fn is_editing(&self) -> bool {
        self.edit_id.is_some()
    }

    /// Caption of the form's submit button.
    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Update Item"
        } else {
            "Add Item"
        }
    }
}

struct LiveQuery {
    closer: AbortHandle,
    pump: JoinHandle<()>,
    /// Set under the view lock; the pump checks it under the same lock.
    closed: Arc<AtomicBool>,
}

/// Controller behind the `/home` route.
pub struct GroceryListScreen {
    session: Arc<dyn SessionService>,
    items: Arc<dyn ItemStore>,
    shell: Shell,
    state: Arc<watch::Sender<GroceryListView>>,
    live: Option<LiveQuery>,
}

impl GroceryListScreen {
    /// Build the controller. No query is opened until [`activate`](Self::activate).
    pub fn new(backend: &Backend, shell: &Shell) -> Self {
        let (state, _) = watch::channel(GroceryListView::default());
        Self {
            session: Arc::clone(&backend.session),
            items: Arc::clone(&backend.items),
            shell: shell.clone(),
            state: Arc::new(state),
            live: None,
        }
    }

    /// Subscribe to render state.
    pub fn view(&self) -> watch::Receiver<GroceryListView> {
        self.state.subscribe()
    }

    /// Copy of the current render state.
    pub fn current(&self) -> GroceryListView {
        self.state.borrow().clone()
    }

    /// Whether a live query is open.
    pub fn is_active(&self) -> bool {
        self.live.is_some()
    }

    /// Open the live query ordered by name and start applying snapshots.
    ///
    /// Calling this while already active does nothing.
    ///
    /// # Panics
    /// Panics when called outside a Tokio runtime.
    pub fn activate(&mut self) {
        if self.live.is_some() {
            return;
        }
        let subscription = self.items.subscribe(ItemOrder::NameAscending);
        let closer = subscription.closer();
        let closed = Arc::new(AtomicBool::new(false));
        let pump = tokio::spawn(apply_snapshots(
            subscription,
            Arc::clone(&self.state),
            Arc::clone(&closed),
        ));
        debug!("grocery subscription opened");
        self.live = Some(LiveQuery {
            closer,
            pump,
            closed,
        });
    }

    /// Close the live query. No snapshot is applied once this returns, even
    /// when the pump is mid-poll on another worker.
    pub fn deactivate(&mut self) {
        if let Some(live) = self.live.take() {
            self.state.send_if_modified(|_| {
                live.closed.store(true, Ordering::Release);
                false
            });
            live.closer.abort();
            live.pump.abort();
            debug!("grocery subscription closed");
        }
    }

    /// Replace the name field.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.state.send_modify(|view| view.name = name);
    }

    /// Replace the quantity field.
    pub fn set_quantity(&mut self, quantity: impl Into<String>) {
        let quantity = quantity.into();
        self.state.send_modify(|view| view.quantity = quantity);
    }

    /// Insert a new item, or update the one being edited.
    ///
    /// An empty name or a quantity that is not a non-negative integer makes
    /// this a silent no-op. The form is cleared only when the store accepts
    /// the write.
    pub async fn submit_item(&mut self) -> Outcome {
        let (name, quantity_text, edit_id) = {
            let view = self.state.borrow();
            (view.name.clone(), view.quantity.clone(), view.edit_id.clone())
        };
        if name.is_empty() {
            return Outcome::Ignored;
        }
        let Some(quantity) = parse_quantity(&quantity_text) else {
            return Outcome::Ignored;
        };

        let draft = ItemDraft::new(name, quantity);
        let result = match &edit_id {
            Some(id) => self.items.update(id, &ItemPatch::from(draft)).await,
            None => self.items.insert(&draft).await.map(|id| {
                debug!(item_id = %id, "grocery item inserted");
            }),
        };

        match result {
            Ok(()) => {
                self.state.send_modify(|view| {
                    view.name.clear();
                    view.quantity.clear();
                    view.edit_id = None;
                });
                Outcome::Completed
            }
            Err(err) => {
                warn!(
                    error = %err,
                    code = err.code(),
                    editing = edit_id.is_some(),
                    "saving grocery item failed"
                );
                self.fail(SAVE_FAILED_MESSAGE)
            }
        }
    }

    /// Load `item` into the form for editing. No store call is made.
    pub fn edit_item(&mut self, item: &GroceryItem) {
        let item = item.clone();
        self.state.send_modify(|view| {
            view.name = item.name;
            view.quantity = item.quantity.to_string();
            view.edit_id = Some(item.id);
        });
    }

    /// Abandon an edit and clear the form. No store call is made.
    pub fn cancel_edit(&mut self) {
        self.state.send_modify(|view| {
            view.name.clear();
            view.quantity.clear();
            view.edit_id = None;
        });
    }

    /// Delete an item. The list changes only when the store notifies.
    pub async fn delete_item(&mut self, id: &ItemId) -> Outcome {
        match self.items.delete(id).await {
            Ok(()) => {
                debug!(item_id = %id, "grocery item deleted");
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), item_id = %id, "deleting grocery item failed");
                self.fail(DELETE_FAILED_MESSAGE)
            }
        }
    }

    /// Sign out and return to `/login`, discarding history.
    pub async fn logout(&mut self) -> Outcome {
        match self.session.sign_out().await {
            Ok(()) => {
                info!("signed out");
                self.deactivate();
                self.shell.notifier.notify(Notice::success(LOGGED_OUT_MESSAGE));
                self.shell
                    .navigator
                    .navigate(Route::Login, Transition::Replace);
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "sign-out failed");
                let failure = Failure::auth(LOGOUT_FAILED_MESSAGE);
                self.shell.notifier.notify(Notice::from(&failure));
                Outcome::Failed(failure)
            }
        }
    }

    fn fail(&self, message: &'static str) -> Outcome {
        let failure = Failure::store(message);
        self.shell.notifier.notify(Notice::from(&failure));
        Outcome::Failed(failure)
    }
}

impl Drop for GroceryListScreen {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn apply_snapshots(
    mut subscription: ItemSubscription,
    state: Arc<watch::Sender<GroceryListView>>,
    closed: Arc<AtomicBool>,
) {
    while let Some(next) = subscription.next().await {
        match next {
            Ok(snapshot) => {
                debug!(count = snapshot.len(), "applying grocery snapshot");
                let applied = state.send_if_modified(|view| {
                    if closed.load(Ordering::Acquire) {
                        return false;
                    }
                    view.items = snapshot.into_items();
                    true
                });
                if !applied {
                    break;
                }
            }
            Err(err) => {
                warn!(error = %err, code = err.code(), "grocery subscription reported an error");
            }
        }
    }
    debug!("grocery subscription ended");
}

#[cfg(test)]
#[path = "grocery_list_tests.rs"]
mod tests;
