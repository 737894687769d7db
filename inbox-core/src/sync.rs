//! Shared handle for hosts that receive events from several tasks at once.
//!
//! The watermark and dedup checks assume one event is fully applied before
//! the next is evaluated, so every call goes through a single mutex.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::{Conversation, Event};
use crate::reducer::{BlockList, Inbox, Outcome};

/// Cloneable handle to one [`Inbox`] behind an async mutex.
#[derive(Debug, Clone, Default)]
pub struct SharedInbox {
    inner: Arc<Mutex<Inbox>>,
}

impl SharedInbox {
    /// Wraps `inbox`.
    #[must_use]
    pub fn new(inbox: Inbox) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inbox)),
        }
    }

    /// See [`Inbox::apply_event`].
    pub async fn apply_event(&self, event: &Event) -> Outcome {
        self.inner.lock().await.apply_event(event)
    }

    /// Applies `events` in order under one lock acquisition.
    pub async fn apply_batch<'a>(
        &self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Vec<Outcome> {
        let mut inbox = self.inner.lock().await;
        events
            .into_iter()
            .map(|event| inbox.apply_event(event))
            .collect()
    }

    /// Owned copy of the current read view.
    pub async fn list_conversations(&self) -> Vec<Conversation> {
        self.inner
            .lock()
            .await
            .list_conversations()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Owned copy of one conversation, ignoring the block-list.
    pub async fn conversation(&self, conversation_id: &str) -> Option<Conversation> {
        self.inner.lock().await.conversation(conversation_id).cloned()
    }

    /// See [`Inbox::set_block_list`].
    pub async fn set_block_list(&self, block_list: BlockList) {
        self.inner.lock().await.set_block_list(block_list);
    }

    /// See [`Inbox::reset`].
    pub async fn reset(&self) {
        self.inner.lock().await.reset();
    }
}
