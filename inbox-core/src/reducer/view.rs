use std::{cmp::Reverse, collections::HashSet};

use crate::models::Conversation;

/// Assignees whose conversations are hidden from the read view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    users: HashSet<String>,
}

impl BlockList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_blocked(&self, user: Option<&str>) -> bool {
        user.is_some_and(|user| self.users.contains(user))
    }

    pub fn insert(&mut self, user: impl Into<String>) -> bool {
        self.users.insert(user.into())
    }

    pub fn remove(&mut self, user: &str) -> bool {
        self.users.remove(user)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BlockList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Filters out blocked assignees and orders the rest most recent first.
pub fn visible<'a>(
    conversations: impl Iterator<Item = &'a Conversation>,
    block_list: &BlockList,
) -> Vec<&'a Conversation> {
    let mut visible: Vec<&Conversation> = conversations
        .filter(|conversation| !block_list.is_blocked(conversation.assigned_user.as_deref()))
        .collect();
    visible.sort_by_key(|conversation| Reverse(conversation.last_updated_timestamp));
    visible
}
