pub mod conversation;
pub mod event;

pub use conversation::{BLURB_MAX_CHARS, Conversation, excerpt};
pub use event::{Event, EventData, EventKind};
