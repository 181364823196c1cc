//! Reqwest-backed item store for the Firestore REST API.
//!
//! Mutations map onto the document endpoints. The REST surface has no push
//! channel, so subscriptions re-run an ordered `runQuery` on a fixed interval
//! and emit only when the result set differs from the last one delivered.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{debug, warn};

use super::SessionSlot;
use super::dto::{DocumentDto, ErrorEnvelopeDto, RunQueryRequestDto, RunQueryResponseDto};
use super::http::{body_preview, endpoint_url};
use crate::domain::ports::{ItemStore, ItemStoreError, ItemSubscription};
use crate::domain::{
    GROCERIES_COLLECTION, GroceryItem, ItemDraft, ItemId, ItemOrder, ItemPatch, Snapshot,
};

/// Item store calling the hosted Firestore document API.
#[derive(Clone)]
pub struct FirestoreItemStore {
    inner: Arc<Inner>,
}

struct Inner {
    client: Client,
    collection: Url,
    query_url: Url,
    poll_interval: Duration,
    session: SessionSlot,
}

impl FirestoreItemStore {
    /// Build the adapter for `project_id` at `endpoint`.
    ///
    /// # Errors
    /// Returns an error when the document URLs cannot be formed or the
    /// reqwest client cannot be constructed.
    pub fn new(
        endpoint: &Url,
        project_id: &str,
        timeout: Duration,
        poll_interval: Duration,
        session: SessionSlot,
    ) -> Result<Self, ItemStoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ItemStoreError::unavailable(err.to_string()))?;
        let documents_path = format!("v1/projects/{project_id}/databases/(default)/documents");
        let collection = endpoint_url(endpoint, &format!("{documents_path}/{GROCERIES_COLLECTION}"))
            .map_err(invalid_endpoint)?;
        let query_url = endpoint_url(endpoint, &format!("{documents_path}:runQuery"))
            .map_err(invalid_endpoint)?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                collection,
                query_url,
                poll_interval,
                session,
            }),
        })
    }
}

impl Inner {
    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    fn document_url(&self, id: &ItemId) -> Result<Url, ItemStoreError> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|()| ItemStoreError::rejected("collection URL cannot carry a document id"))?
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ItemStoreError> {
        let response = self
            .authorised(request)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }

    async fn run_query(&self, order: ItemOrder) -> Result<Snapshot, ItemStoreError> {
        let request = self
            .client
            .post(self.query_url.clone())
            .json(&RunQueryRequestDto::ordered_ascending(
                GROCERIES_COLLECTION,
                order.field(),
            ));
        let body = self.send(request).await?;
        parse_query_results(&body)
    }
}

#[async_trait]
impl ItemStore for FirestoreItemStore {
    fn subscribe(&self, order: ItemOrder) -> ItemSubscription {
        let state = PollState {
            inner: Arc::clone(&self.inner),
            order,
            last: None,
            failing: false,
            first: true,
        };
        ItemSubscription::new(stream::unfold(state, PollState::next).boxed())
    }

    async fn insert(&self, draft: &ItemDraft) -> Result<ItemId, ItemStoreError> {
        let request = self
            .inner
            .client
            .post(self.inner.collection.clone())
            .json(&DocumentDto::from_draft(draft));
        let body = self.inner.send(request).await?;
        let created: DocumentDto = serde_json::from_slice(&body).map_err(|err| {
            ItemStoreError::decode(format!("invalid Firestore document payload: {err}"))
        })?;
        let id = created.id().map_err(ItemStoreError::decode)?;
        debug!(item_id = %id, "firestore document created");
        Ok(id)
    }

    async fn update(&self, id: &ItemId, patch: &ItemPatch) -> Result<(), ItemStoreError> {
        let (body, mask) = DocumentDto::from_patch(patch);
        if mask.is_empty() {
            return Ok(());
        }
        let mut url = self.inner.document_url(id)?;
        {
            let mut query = url.query_pairs_mut();
            for field in &mask {
                query.append_pair("updateMask.fieldPaths", field);
            }
            query.append_pair("currentDocument.exists", "true");
        }
        let request = self.inner.client.patch(url).json(&body);
        match self.inner.send(request).await {
            Err(ItemStoreError::NotFound { .. }) => Err(ItemStoreError::not_found(id.as_str())),
            other => other.map(|_| ()),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<(), ItemStoreError> {
        let request = self.inner.client.delete(self.inner.document_url(id)?);
        match self.inner.send(request).await {
            Ok(_) | Err(ItemStoreError::NotFound { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }
}

struct PollState {
    inner: Arc<Inner>,
    order: ItemOrder,
    last: Option<Snapshot>,
    failing: bool,
    first: bool,
}

type PollItem = Result<Snapshot, ItemStoreError>;

impl PollState {
    async fn next(mut self) -> Option<(PollItem, Self)> {
        loop {
            if self.first {
                self.first = false;
            } else {
                tokio::time::sleep(self.inner.poll_interval).await;
            }
            match self.inner.run_query(self.order).await {
                Ok(snapshot) => {
                    self.failing = false;
                    if self.last.as_ref() != Some(&snapshot) {
                        self.last = Some(snapshot.clone());
                        return Some((Ok(snapshot), self));
                    }
                }
                Err(err) if !self.failing => {
                    self.failing = true;
                    return Some((Err(err), self));
                }
                Err(err) => {
                    debug!(error = %err, "firestore poll still failing");
                }
            }
        }
    }
}

fn parse_query_results(body: &[u8]) -> Result<Snapshot, ItemStoreError> {
    let rows: Vec<RunQueryResponseDto> = serde_json::from_slice(body).map_err(|err| {
        ItemStoreError::decode(format!("invalid Firestore query payload: {err}"))
    })?;
    let items: Vec<GroceryItem> = rows
        .into_iter()
        .filter_map(|row| row.document)
        .filter_map(|document| match document.into_item() {
            Ok(item) => Some(item),
            Err(reason) => {
                warn!(reason = %reason, "skipping undecodable grocery document");
                None
            }
        })
        .collect();
    Ok(Snapshot::new(items))
}

fn invalid_endpoint(error: url::ParseError) -> ItemStoreError {
    ItemStoreError::rejected(format!("invalid Firestore endpoint: {error}"))
}

fn map_transport_error(error: reqwest::Error) -> ItemStoreError {
    ItemStoreError::unavailable(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ItemStoreError {
    let detail = match serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{code}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body_preview(body),
    };
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {detail}", status.as_u16())
    };

    match status {
        StatusCode::NOT_FOUND => ItemStoreError::not_found(message),
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::GATEWAY_TIMEOUT => ItemStoreError::unavailable(message),
        _ if status.is_client_error() => ItemStoreError::rejected(message),
        _ => ItemStoreError::unavailable(message),
    }
}
