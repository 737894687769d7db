#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)] // TODO(deps-001): remove once transitive dependencies converge.

//! Folds an unordered, possibly duplicated stream of conversation events into
//! the current state of a support inbox.

pub mod config;
pub mod models;
pub mod reducer;
#[cfg(feature = "tokio")]
pub mod sync;

pub use models::{Conversation, Event, EventData, EventKind};
pub use reducer::{BlockList, Inbox, Outcome, Rejection};
#[cfg(feature = "tokio")]
pub use sync::SharedInbox;
