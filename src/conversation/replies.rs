//! Bounded tracking of the bot's own replies for cascade deletion.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Maximum number of tracked replies.
const MAX_TRACKED: usize = 5;

/// Handle to a sent bot reply, enough to delete it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHandle {
    pub channel_id: u64,
    pub message_id: u64,
}

/// Maps a user message id to the bot reply sent for it, so deleting the user
/// message cascades to the reply.
///
/// Bounded to [`MAX_TRACKED`] entries. Message ids are snowflakes and grow
/// monotonically, so evicting the smallest key drops the structurally oldest
/// link.
#[derive(Debug, Default)]
pub struct ReplyTracker {
    inner: Mutex<BTreeMap<u64, ReplyHandle>>,
}

impl ReplyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the bot reply sent for `replied_to`, overwriting any previous
    /// link for the same message and evicting the oldest entry past the bound.
    pub fn link(&self, replied_to: u64, handle: ReplyHandle) {
        let mut inner = self.inner.lock().expect("reply tracker lock poisoned");
        inner.insert(replied_to, handle);

        while inner.len() > MAX_TRACKED {
            inner.pop_first();
        }
    }

    /// Called when a message is deleted. Removes and returns the linked bot
    /// reply if the deleted message had one, signaling the caller to delete it.
    pub fn on_deleted(&self, original: u64) -> Option<ReplyHandle> {
        let mut inner = self.inner.lock().expect("reply tracker lock poisoned");
        inner.remove(&original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(message_id: u64) -> ReplyHandle {
        ReplyHandle {
            channel_id: 99,
            message_id,
        }
    }

    #[test]
    fn test_on_deleted_returns_linked_reply_once() {
        let tracker = ReplyTracker::new();
        tracker.link(10, handle(100));

        assert_eq!(tracker.on_deleted(10), Some(handle(100)));
        assert_eq!(tracker.on_deleted(10), None);
    }

    #[test]
    fn test_on_deleted_unknown_id_is_none() {
        let tracker = ReplyTracker::new();
        assert_eq!(tracker.on_deleted(42), None);
    }

    #[test]
    fn test_bound_evicts_smallest_key() {
        let tracker = ReplyTracker::new();
        for id in 1..=6u64 {
            tracker.link(id, handle(id * 100));
        }

        // The oldest (smallest) key was evicted; the five newest remain.
        assert_eq!(tracker.on_deleted(1), None);
        for id in 2..=6u64 {
            assert_eq!(tracker.on_deleted(id), Some(handle(id * 100)));
        }
    }

    #[test]
    fn test_relink_overwrites_without_eviction() {
        let tracker = ReplyTracker::new();
        for id in 1..=5u64 {
            tracker.link(id, handle(id));
        }

        tracker.link(3, handle(300));

        assert_eq!(tracker.on_deleted(1), Some(handle(1)));
        assert_eq!(tracker.on_deleted(3), Some(handle(300)));
    }
}
