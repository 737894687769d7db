use serde::{Deserialize, Serialize};

/// Maximum number of characters a message excerpt may occupy in the blurb.
pub const BLURB_MAX_CHARS: usize = 256;

/// Current state of one conversation as folded from its events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Stable identifier, set once at creation.
    pub id: String,

    /// User the conversation is assigned to, if any.
    pub assigned_user: Option<String>,

    /// Subject of the latest message that carried one.
    pub subject: String,

    /// Latest message excerpt, or the typing indicator while someone types.
    pub blurb: String,

    /// Number of accepted message events.
    pub message_count: u64,

    /// Timestamp of the latest accepted event; the ordering watermark.
    pub last_updated_timestamp: i64,
}

impl Conversation {
    /// Creates a conversation in the empty shape.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assigned_user: None,
            subject: String::new(),
            blurb: String::new(),
            message_count: 0,
            last_updated_timestamp: 0,
        }
    }

    /// Returns `true` when every field except `id` holds its default value.
    #[must_use]
    pub fn is_empty_shape(&self) -> bool {
        self.assigned_user.is_none()
            && self.subject.is_empty()
            && self.blurb.is_empty()
            && self.message_count == 0
            && self.last_updated_timestamp == 0
    }
}

/// Cuts a message body down to at most [`BLURB_MAX_CHARS`] characters.
#[must_use]
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BLURB_MAX_CHARS) {
        Some((cut, _)) => body[..cut].to_string(),
        None => body.to_string(),
    }
}
