use std::fmt;

use serde::{Deserialize, Serialize};

use crate::reducer::Rejection;

/// Kind tag of an inbound conversation event.
///
/// Producers may introduce kinds this crate does not know about yet; those
/// land in [`EventKind::Unknown`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A customer or agent message was posted to the conversation.
    MessageReceived,
    /// The conversation was assigned to a user.
    Assigned,
    /// The conversation assignment was cleared.
    Unassigned,
    /// A user started typing.
    TypingStarted,
    /// A user stopped typing.
    TypingStopped,
    /// Any kind string not listed above, kept verbatim for diagnostics.
    Unknown(String),
}

impl EventKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MessageReceived => "MessageReceived",
            Self::Assigned => "Assigned",
            Self::Unassigned => "Unassigned",
            Self::TypingStarted => "TypingStarted",
            Self::TypingStopped => "TypingStopped",
            Self::Unknown(kind) => kind,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "MessageReceived" => Self::MessageReceived,
            "Assigned" => Self::Assigned,
            "Unassigned" => Self::Unassigned,
            "TypingStarted" => Self::TypingStarted,
            "TypingStopped" => Self::TypingStopped,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Unknown(_) => Self::Unknown(value),
            known => known,
        }
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Unknown(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by every event. Every field is optional on the wire;
/// presence drives behavior, so an empty string is not the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventData {
    /// Event time; `0` is treated as missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Target conversation; an empty string is treated as missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,

    /// Assignee or typing user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Replaces the conversation subject when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Message text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl EventData {
    /// Returns the timestamp and conversation id, or the first structural
    /// problem found.
    ///
    /// # Errors
    /// Returns [`Rejection::MissingTimestamp`] when the timestamp is absent or
    /// zero, then [`Rejection::MissingConversationId`] when the conversation id
    /// is absent or empty.
    pub fn validate(&self) -> Result<(i64, &str), Rejection> {
        let timestamp = self
            .timestamp
            .filter(|ts| *ts != 0)
            .ok_or(Rejection::MissingTimestamp)?;
        let conversation_id = self
            .conversation_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(Rejection::MissingConversationId)?;
        Ok((timestamp, conversation_id))
    }
}

/// A tagged conversation event as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Which state transition this event requests.
    pub kind: EventKind,

    /// Kind-specific payload.
    #[serde(default)]
    pub data: EventData,
}

impl Event {
    /// Creates an event with an empty payload stamped with `timestamp` for
    /// `conversation_id`.
    #[must_use]
    pub fn new(
        kind: impl Into<EventKind>,
        timestamp: i64,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            data: EventData {
                timestamp: Some(timestamp),
                conversation_id: Some(conversation_id.into()),
                ..EventData::default()
            },
        }
    }

    /// Shorthand for a `MessageReceived` event carrying `body`.
    #[must_use]
    pub fn message(
        timestamp: i64,
        conversation_id: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(EventKind::MessageReceived, timestamp, conversation_id).with_body(body)
    }

    /// Sets `data.user`.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.data.user = Some(user.into());
        self
    }

    /// Sets `data.subject`.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.data.subject = Some(subject.into());
        self
    }

    /// Sets `data.body`.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.data.body = Some(body.into());
        self
    }
}
