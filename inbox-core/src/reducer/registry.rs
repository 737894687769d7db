use std::collections::HashMap;

use crate::models::Conversation;

/// Conversation aggregates keyed by conversation id.
#[derive(Debug, Default)]
pub struct ConversationRegistry {
    conversations: HashMap<String, Conversation>,
}

impl ConversationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, conversation_id: &str) -> Option<&Conversation> {
        self.conversations.get(conversation_id)
    }

    /// Returns the conversation, creating it in the empty shape first if needed.
    pub fn get_or_create(&mut self, conversation_id: &str) -> &mut Conversation {
        self.conversations
            .entry(conversation_id.to_string())
            .or_insert_with(|| Conversation::new(conversation_id))
    }

    /// Removes the conversation if it is missing or still in its empty shape.
    ///
    /// Returns `true` when no entry remains for `conversation_id`.
    pub fn prune_if_empty(&mut self, conversation_id: &str) -> bool {
        match self.conversations.get(conversation_id) {
            None => true,
            Some(conversation) if conversation.is_empty_shape() => {
                self.conversations.remove(conversation_id);
                true
            }
            Some(_) => false,
        }
    }

    #[must_use]
    pub fn contains(&self, conversation_id: &str) -> bool {
        self.conversations.contains_key(conversation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    pub fn clear(&mut self) {
        self.conversations.clear();
    }
}
