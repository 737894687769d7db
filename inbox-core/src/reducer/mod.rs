//! # Event reducer
//!
//! Folds unordered, possibly duplicated conversation events into per-conversation
//! state. An event is validated, checked against the conversation watermark, then
//! against the dedup guard, and only then dispatched on its kind.

pub mod dedup;
pub mod registry;
pub mod typing;
pub mod view;

use metrics::{counter, gauge};
use thiserror::Error;
use tracing::{info, instrument, trace, warn};

use crate::config::Config;
use crate::models::{Conversation, Event, EventKind, excerpt};

pub use dedup::{DedupGuard, DedupKey};
pub use registry::ConversationRegistry;
pub use typing::{TypingTracker, typing_phrase};
pub use view::BlockList;

/// Structural problems that make an event unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The timestamp was absent or zero.
    #[error("missing timestamp")]
    MissingTimestamp,
    /// The conversation id was absent or empty.
    #[error("missing conversationId")]
    MissingConversationId,
}

/// Which admission path an event took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The event was dispatched and advanced the watermark.
    Applied,
    /// The event was structurally incomplete.
    Rejected(Rejection),
    /// The event was older than the conversation watermark.
    Stale,
    /// An event with the same dedup key was already applied.
    Duplicate,
    /// The kind was not recognised; the dedup registration was rolled back.
    UnknownKind,
}

impl Outcome {
    /// Metric label for this outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Rejected(Rejection::MissingTimestamp) => "missing_timestamp",
            Self::Rejected(Rejection::MissingConversationId) => "missing_conversation_id",
            Self::Stale => "stale",
            Self::Duplicate => "duplicate",
            Self::UnknownKind => "unknown_kind",
        }
    }
}

/// Owns every piece of inbox state and applies events to it.
///
/// All methods run to completion synchronously. Callers with several event
/// sources must serialize access, for instance through
/// [`SharedInbox`](crate::sync::SharedInbox).
#[derive(Debug)]
pub struct Inbox {
    registry: ConversationRegistry,
    dedup: DedupGuard,
    typing: TypingTracker,
    block_list: BlockList,
    compact_dedup: bool,
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new(BlockList::new())
    }
}

impl Inbox {
    /// Creates an inbox that hides conversations assigned to `block_list`.
    #[must_use]
    pub fn new(block_list: BlockList) -> Self {
        Self {
            registry: ConversationRegistry::new(),
            dedup: DedupGuard::new(),
            typing: TypingTracker::new(),
            block_list,
            compact_dedup: true,
        }
    }

    /// Creates an inbox from the block-list and dedup settings in `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.blocked_assignees.iter().cloned().collect())
            .with_dedup_compaction(config.dedup.compact_below_watermark)
    }

    /// Turns watermark-based dedup key eviction on or off.
    #[must_use]
    pub fn with_dedup_compaction(mut self, enabled: bool) -> Self {
        self.compact_dedup = enabled;
        self
    }

    /// Applies one event.
    ///
    /// Incomplete events are dropped with a warning, events older than the
    /// conversation watermark are dropped silently, and events whose
    /// `(conversation, timestamp)` pair was already applied are no-ops.
    #[instrument(name = "inbox.apply_event", level = "debug", skip_all, fields(kind = %event.kind))]
    pub fn apply_event(&mut self, event: &Event) -> Outcome {
        let outcome = self.fold(event);
        counter!("inbox_events_total", "outcome" => outcome.as_str()).increment(1);
        #[allow(clippy::cast_precision_loss)]
        let keys = self.dedup.len() as f64;
        gauge!("inbox_dedup_keys").set(keys);
        outcome
    }

    fn fold(&mut self, event: &Event) -> Outcome {
        let data = &event.data;
        let (timestamp, conversation_id) = match data.validate() {
            Ok(admitted) => admitted,
            Err(rejection) => {
                warn!(kind = %event.kind, "{rejection}");
                return Outcome::Rejected(rejection);
            }
        };

        if self
            .registry
            .get(conversation_id)
            .is_some_and(|conversation| conversation.last_updated_timestamp > timestamp)
        {
            trace!(conversation_id, timestamp, "stale event dropped");
            return Outcome::Stale;
        }

        let key = DedupKey::new(conversation_id, timestamp);
        if !self.dedup.record(key) {
            info!(%key, "already processed {key}");
            return Outcome::Duplicate;
        }

        let conversation = self.registry.get_or_create(conversation_id);
        match &event.kind {
            EventKind::MessageReceived => {
                if let Some(subject) = &data.subject {
                    conversation.subject.clone_from(subject);
                }
                conversation.message_count += 1;
                if let Some(body) = &data.body {
                    if self.typing.is_typing(conversation_id) {
                        self.typing.stash_pending(conversation_id, excerpt(body));
                    } else {
                        conversation.blurb = excerpt(body);
                    }
                }
            }
            EventKind::Assigned => conversation.assigned_user.clone_from(&data.user),
            EventKind::Unassigned => conversation.assigned_user = None,
            EventKind::TypingStarted => {
                conversation.blurb = self
                    .typing
                    .start_typing(conversation_id, data.user.as_deref());
            }
            EventKind::TypingStopped => {
                conversation.blurb = self
                    .typing
                    .stop_typing(conversation_id, data.user.as_deref());
            }
            EventKind::Unknown(kind) => {
                warn!(%kind, conversation_id, "unknown event type {kind}");
                self.dedup.forget(key);
                self.registry.prune_if_empty(conversation_id);
                return Outcome::UnknownKind;
            }
        }
        conversation.last_updated_timestamp = timestamp;

        if self.compact_dedup {
            self.dedup.compact_below(conversation_id, timestamp);
        }
        Outcome::Applied
    }

    /// Visible conversations, most recently updated first.
    #[must_use]
    pub fn list_conversations(&self) -> Vec<&Conversation> {
        view::visible(self.registry.iter(), &self.block_list)
    }

    /// Looks a conversation up regardless of the block-list.
    #[must_use]
    pub fn conversation(&self, conversation_id: &str) -> Option<&Conversation> {
        self.registry.get(conversation_id)
    }

    /// Whether a conversation exists, blocked or not.
    #[must_use]
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.registry.contains(conversation_id)
    }

    /// Whether an event for `conversation_id` at `timestamp` would be a duplicate.
    #[must_use]
    pub fn is_processed(&self, conversation_id: &str, timestamp: i64) -> bool {
        self.dedup.contains(DedupKey::new(conversation_id, timestamp))
    }

    /// Users currently typing in `conversation_id`, in arrival order.
    #[must_use]
    pub fn typers(&self, conversation_id: &str) -> &[String] {
        self.typing.typers(conversation_id)
    }

    /// Message body held back until typing stops.
    #[must_use]
    pub fn pending_body(&self, conversation_id: &str) -> Option<&str> {
        self.typing.pending(conversation_id)
    }

    /// Number of retained dedup keys.
    #[must_use]
    pub const fn dedup_len(&self) -> usize {
        self.dedup.len()
    }

    /// Assignees currently hidden from [`Inbox::list_conversations`].
    #[must_use]
    pub const fn block_list(&self) -> &BlockList {
        &self.block_list
    }

    /// Replaces the block-list; takes effect on the next read.
    pub fn set_block_list(&mut self, block_list: BlockList) {
        self.block_list = block_list;
    }

    /// Drops every conversation, dedup key and typing entry.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.dedup.clear();
        self.typing.clear();
    }
}
