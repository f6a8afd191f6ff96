// ── Bounded search history ──
//
// Newest first, de-duplicated, capped. Re-adding an entry moves it to
// the front instead of growing the list.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entries that can tell whether they describe the same search.
pub trait HistoryEntry {
    fn same_as(&self, other: &Self) -> bool;
}

/// One past search: what was typed and what it was searched as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub value: String,
    pub kind: String,
    pub timestamp: DateTime<Utc>,
}

impl SearchHistoryEntry {
    pub fn new(value: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: kind.into(),
            timestamp: Utc::now(),
        }
    }
}

impl HistoryEntry for SearchHistoryEntry {
    fn same_as(&self, other: &Self) -> bool {
        self.value == other.value && self.kind == other.kind
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T: HistoryEntry> BoundedHistory<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, dropping any older duplicate and any
    /// overflow at the back.
    pub fn push(&mut self, entry: T) {
        self.entries.retain(|e| !e.same_as(&entry));
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Change the cap, trimming the oldest entries if needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&T> {
        self.entries.front()
    }
}

impl<T: HistoryEntry + Clone> BoundedHistory<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }

    /// Replace the contents, keeping the order given (newest first).
    pub fn restore(&mut self, entries: impl IntoIterator<Item = T>) {
        self.entries.clear();
        for entry in entries {
            if self.entries.len() == self.capacity {
                break;
            }
            if !self.entries.iter().any(|e| e.same_as(&entry)) {
                self.entries.push_back(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(history: &BoundedHistory<SearchHistoryEntry>) -> Vec<&str> {
        history.iter().map(|e| e.value.as_str()).collect()
    }

    #[test]
    fn newest_first_and_capped() {
        let mut h = BoundedHistory::new(3);
        for q in ["a", "b", "c", "d"] {
            h.push(SearchHistoryEntry::new(q, "all"));
        }
        assert_eq!(values(&h), vec!["d", "c", "b"]);
    }

    #[test]
    fn duplicate_moves_to_front() {
        let mut h = BoundedHistory::new(10);
        h.push(SearchHistoryEntry::new("madrid", "office"));
        h.push(SearchHistoryEntry::new("lisboa", "office"));
        h.push(SearchHistoryEntry::new("madrid", "office"));
        assert_eq!(values(&h), vec!["madrid", "lisboa"]);
    }

    #[test]
    fn same_value_different_kind_is_distinct() {
        let mut h = BoundedHistory::new(10);
        h.push(SearchHistoryEntry::new("1234567", "agent"));
        h.push(SearchHistoryEntry::new("1234567", "ticket"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn restore_respects_cap_and_dedup() {
        let mut h = BoundedHistory::new(2);
        h.restore([
            SearchHistoryEntry::new("x", "all"),
            SearchHistoryEntry::new("x", "all"),
            SearchHistoryEntry::new("y", "all"),
            SearchHistoryEntry::new("z", "all"),
        ]);
        assert_eq!(values(&h), vec!["x", "y"]);
    }
}
