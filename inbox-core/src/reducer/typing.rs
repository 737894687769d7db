use std::collections::HashMap;

/// Tracks who is typing in each conversation, plus the message body that
/// arrived while they were.
#[derive(Debug, Default)]
pub struct TypingTracker {
    typing: HashMap<String, Vec<String>>,
    pending: HashMap<String, String>,
}

impl TypingTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user` to the typers of `conversation_id` and returns the
    /// indicator phrase. An absent user leaves membership unchanged.
    pub fn start_typing(&mut self, conversation_id: &str, user: Option<&str>) -> String {
        if let Some(user) = user {
            let typers = self.typing.entry(conversation_id.to_string()).or_default();
            if !typers.iter().any(|typer| typer == user) {
                typers.push(user.to_string());
            }
        }
        self.phrase(conversation_id)
    }

    /// Removes `user` from the typers of `conversation_id`.
    ///
    /// Once nobody is left typing the pending body is handed back (empty if
    /// none was stashed); otherwise the recomputed phrase is returned.
    pub fn stop_typing(&mut self, conversation_id: &str, user: Option<&str>) -> String {
        if let Some(typers) = self.typing.get_mut(conversation_id) {
            if let Some(user) = user {
                typers.retain(|typer| typer != user);
            }
            if !typers.is_empty() {
                return typing_phrase(typers);
            }
            self.typing.remove(conversation_id);
        }
        self.pending.remove(conversation_id).unwrap_or_default()
    }

    #[must_use]
    pub fn is_typing(&self, conversation_id: &str) -> bool {
        self.typing.contains_key(conversation_id)
    }

    /// Users typing in `conversation_id`, in the order they started.
    #[must_use]
    pub fn typers(&self, conversation_id: &str) -> &[String] {
        self.typing.get(conversation_id).map_or(&[], Vec::as_slice)
    }

    /// Holds `body` back until typing ends in `conversation_id`.
    pub fn stash_pending(&mut self, conversation_id: &str, body: String) {
        self.pending.insert(conversation_id.to_string(), body);
    }

    #[must_use]
    pub fn pending(&self, conversation_id: &str) -> Option<&str> {
        self.pending.get(conversation_id).map(String::as_str)
    }

    #[must_use]
    pub fn phrase(&self, conversation_id: &str) -> String {
        typing_phrase(self.typers(conversation_id))
    }

    pub fn clear(&mut self) {
        self.typing.clear();
        self.pending.clear();
    }
}

/// Renders the "who is typing" blurb for `typers`.
#[must_use]
pub fn typing_phrase(typers: &[String]) -> String {
    match typers {
        [] => String::new(),
        [user] => format!("{user} is replying..."),
        users => format!("{} are replying...", users.join(", ")),
    }
}
