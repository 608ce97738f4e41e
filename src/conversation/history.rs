//! Bounded in-memory conversation history store.

use super::{ConversationKey, Turn};

use std::collections::HashMap;
use std::sync::Mutex;

/// Per-key ordered log of role-tagged turns, FIFO-bounded.
///
/// Constructed once at startup and shared between handlers; entries are
/// created lazily on first append and live for the process lifetime unless
/// cleared. Two handlers for the same key can interleave their
/// read-append-read sequence at await points, which is accepted last-write-wins
/// behavior rather than a serialized queue.
#[derive(Debug)]
pub struct HistoryStore {
    max_history: usize,
    inner: Mutex<HashMap<ConversationKey, Vec<Turn>>>,
}

impl HistoryStore {
    /// Create a store that retains at most `max_history` turns per key.
    pub fn new(max_history: usize) -> Self {
        Self {
            max_history,
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Append a turn, evicting oldest-first so the stored length stays within
    /// the bound after insertion.
    pub fn append(&self, key: ConversationKey, turn: Turn) {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        let turns = inner.entry(key).or_default();

        if turns.len() >= self.max_history {
            let excess = turns.len() - (self.max_history - 1);
            turns.drain(..excess);
        }

        turns.push(turn);
    }

    /// Current sequence for a key, oldest first. Empty for unknown keys.
    pub fn read(&self, key: ConversationKey) -> Vec<Turn> {
        let inner = self.inner.lock().expect("history lock poisoned");
        inner.get(&key).cloned().unwrap_or_default()
    }

    /// Remove all turns for a key. Returns false when there was nothing to
    /// clear, which callers surface to the user rather than treat as an error.
    pub fn clear(&self, key: ConversationKey) -> bool {
        let mut inner = self.inner.lock().expect("history lock poisoned");
        match inner.get_mut(&key) {
            Some(turns) if !turns.is_empty() => {
                turns.clear();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ConversationKey {
        ConversationKey::new(1, 2)
    }

    #[test]
    fn test_read_unknown_key_is_empty() {
        let store = HistoryStore::new(3);
        assert!(store.read(key()).is_empty());
    }

    #[test]
    fn test_append_keeps_arrival_order() {
        let store = HistoryStore::new(5);
        store.append(key(), Turn::user("a"));
        store.append(key(), Turn::assistant("Muse", "b"));

        let turns = store.read(key());
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "a");
        assert_eq!(turns[1].content, "b");
    }

    #[test]
    fn test_fifo_eviction_at_bound() {
        let store = HistoryStore::new(3);
        for content in ["A", "B", "C", "D"] {
            store.append(key(), Turn::user(content));
        }

        let turns = store.read(key());
        let contents: Vec<&str> = turns.iter().map(|turn| turn.content.as_str()).collect();
        assert_eq!(contents, vec!["B", "C", "D"]);
    }

    #[test]
    fn test_length_never_exceeds_bound() {
        let store = HistoryStore::new(4);
        for index in 0..20 {
            store.append(key(), Turn::user(format!("turn {index}")));
            assert!(store.read(key()).len() <= 4);
        }

        let turns = store.read(key());
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].content, "turn 16");
        assert_eq!(turns[3].content, "turn 19");
    }

    #[test]
    fn test_clear_then_read_empty() {
        let store = HistoryStore::new(3);
        store.append(key(), Turn::user("A"));
        store.append(key(), Turn::user("B"));

        assert!(store.clear(key()));
        assert!(store.read(key()).is_empty());
    }

    #[test]
    fn test_clear_unknown_key_reports_nothing_to_clear() {
        let store = HistoryStore::new(3);
        assert!(!store.clear(key()));

        // Clearing an already-empty history is the same no-op.
        store.append(key(), Turn::user("A"));
        assert!(store.clear(key()));
        assert!(!store.clear(key()));
    }

    #[test]
    fn test_keys_are_independent() {
        let store = HistoryStore::new(2);
        let other = ConversationKey::new(1, 3);

        store.append(key(), Turn::user("here"));
        store.append(other, Turn::user("there"));

        assert_eq!(store.read(key()).len(), 1);
        assert_eq!(store.read(other).len(), 1);
        store.clear(key());
        assert_eq!(store.read(other).len(), 1);
    }
}
