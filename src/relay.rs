//! The request translator: one inbound message becomes one remote file write.

use std::sync::Arc;

use axum::body::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::content::ContentId;
use crate::error::{RelayError, RelayResult};
use crate::github::ContentStore;
use crate::payload::{InboundRequest, OutboundPayload};

/// Returned to the caller once the remote accepted the write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub status: u16,
}

pub struct Relay {
    store: Arc<dyn ContentStore>,
}

impl Relay {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Run [`Relay::forward`] on its own task and wait for it.
    ///
    /// Dropping the returned future (the caller hung up) does not cancel the
    /// task, so a write that has started always runs to completion.
    pub async fn forward_detached(self: &Arc<Self>, body: Bytes) -> RelayResult<Receipt> {
        let relay = Arc::clone(self);
        tokio::spawn(async move { relay.forward(&body).await }).await?
    }

    /// Decode, validate, hash and forward one request body.
    ///
    /// Nothing is sent unless the body decodes and carries a non-empty
    /// message. The remote is called exactly once; failures are returned,
    /// never retried.
    pub async fn forward(&self, body: &[u8]) -> RelayResult<Receipt> {
        let request = InboundRequest::from_json(body)?;
        if request.message.is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let id = ContentId::of(&request.message);
        tracing::info!(sha = %id, len = request.message.len(), "relaying message");
        tracing::debug!(sha = %id, message = %request.message, "message body");

        let payload = OutboundPayload::new(&request.message, Utc::now());
        let response = self.store.put(&id, &payload).await?;

        tracing::info!(
            sha = %id,
            status = response.status,
            response = %response.body,
            "remote answered"
        );

        if !response.is_success() {
            return Err(RelayError::Rejected {
                status: response.status,
                body: response.body,
            });
        }

        Ok(Receipt {
            id: id.to_hex(),
            status: response.status,
        })
    }
}
