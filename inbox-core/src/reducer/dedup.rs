use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

/// Identity of an applied event: the conversation it targeted and its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DedupKey<'a> {
    pub conversation_id: &'a str,
    pub timestamp: i64,
}

impl<'a> DedupKey<'a> {
    #[must_use]
    pub const fn new(conversation_id: &'a str, timestamp: i64) -> Self {
        Self {
            conversation_id,
            timestamp,
        }
    }
}

impl fmt::Display for DedupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.conversation_id, self.timestamp)
    }
}

/// Records which `(conversation, timestamp)` pairs have already been applied.
///
/// Timestamps are indexed per conversation so that everything below a
/// conversation's watermark can be released in one split.
#[derive(Debug, Default)]
pub struct DedupGuard {
    processed: HashMap<String, BTreeSet<i64>>,
    len: usize,
}

impl DedupGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as processed. Returns `false` if it already was.
    pub fn record(&mut self, key: DedupKey<'_>) -> bool {
        let inserted = if let Some(timestamps) = self.processed.get_mut(key.conversation_id) {
            timestamps.insert(key.timestamp)
        } else {
            self.processed.insert(
                key.conversation_id.to_string(),
                BTreeSet::from([key.timestamp]),
            );
            true
        };
        if inserted {
            self.len += 1;
        }
        inserted
    }

    #[must_use]
    pub fn contains(&self, key: DedupKey<'_>) -> bool {
        self.processed
            .get(key.conversation_id)
            .is_some_and(|timestamps| timestamps.contains(&key.timestamp))
    }

    /// Drops `key` so a later event with the same identity is applied again.
    pub fn forget(&mut self, key: DedupKey<'_>) -> bool {
        let Some(timestamps) = self.processed.get_mut(key.conversation_id) else {
            return false;
        };
        let removed = timestamps.remove(&key.timestamp);
        if timestamps.is_empty() {
            self.processed.remove(key.conversation_id);
        }
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Releases every key of `conversation_id` older than `watermark`.
    ///
    /// Returns the number of keys released.
    pub fn compact_below(&mut self, conversation_id: &str, watermark: i64) -> usize {
        let Some(timestamps) = self.processed.get_mut(conversation_id) else {
            return 0;
        };
        let retained = timestamps.split_off(&watermark);
        let released = timestamps.len();
        *timestamps = retained;
        if timestamps.is_empty() {
            self.processed.remove(conversation_id);
        }
        self.len -= released;
        released
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.processed.clear();
        self.len = 0;
    }
}
