//! Bounded message log.
//!
//! Holds the last `capacity` entries in insertion order. When a push
//! would exceed the capacity the oldest entry is evicted first, so
//! `len() <= capacity()` holds after every mutation.

use crate::types::LogEntry;
use std::collections::VecDeque;

/// Number of entries kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// FIFO-evicting log of the most recent exchanges.
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl MessageLog {
    /// Creates an empty log holding at most `capacity` entries.
    ///
    /// A capacity of `0` is treated as `1`; a log that can hold nothing
    /// would silently swallow every error.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends an entry, evicting from the front until it fits.
    pub fn push(&mut self, entry: LogEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates oldest-first, the order entries are displayed in.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
