use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use marketdesk_application::{Notice, NoticeLevel, Notifier};
use tracing::{error, info};

/// Default time a toast stays visible.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
struct ToastEntry {
    notice: Notice,
    expires_at: Instant,
}

/// In-memory toast queue; each notice expires after a fixed time.
pub struct InMemoryToastQueue {
    entries: Mutex<VecDeque<ToastEntry>>,
    ttl: Duration,
}

impl Default for InMemoryToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}

impl InMemoryToastQueue {
    /// Creates an empty queue with the given visibility time.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            ttl,
        }
    }

    /// Returns unexpired notices, oldest first, dropping expired ones.
    #[must_use]
    pub fn visible(&self) -> Vec<Notice> {
        self.visible_at(Instant::now())
    }

    fn visible_at(&self, now: Instant) -> Vec<Notice> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|entry| entry.expires_at > now);
        entries.iter().map(|entry| entry.notice.clone()).collect()
    }

    /// Removes and returns every unexpired notice.
    #[must_use]
    pub fn drain(&self) -> Vec<Notice> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .drain(..)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.notice)
            .collect()
    }

    fn push_at(&self, notice: Notice, now: Instant) {
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|entry| entry.expires_at > now);
        entries.push_back(ToastEntry { notice, expires_at });
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Notifier for InMemoryToastQueue {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => error!(message = %notice.message, "toast"),
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(level = notice.level.as_str(), message = %notice.message, "toast");
            }
        }
        self.push_at(notice, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire_after_ttl() {
        let queue = InMemoryToastQueue::new(Duration::from_millis(3000));
        let start = Instant::now();
        queue.push_at(Notice::success("Admin created successfully"), start);
        queue.push_at(
            Notice::error("Failed to delete admin"),
            start + Duration::from_millis(2000),
        );

        let at_two_and_a_half = queue.visible_at(start + Duration::from_millis(2500));
        assert_eq!(at_two_and_a_half.len(), 2);

        let at_four = queue.visible_at(start + Duration::from_millis(4000));
        assert_eq!(at_four, vec![Notice::error("Failed to delete admin")]);

        assert!(queue
            .visible_at(start + Duration::from_millis(6000))
            .is_empty());
    }

    #[test]
    fn unread_queue_only_keeps_live_notices() {
        let queue = InMemoryToastQueue::new(Duration::from_millis(3000));
        let start = Instant::now();

        for second in 0..10 {
            queue.push_at(
                Notice::success("Category updated successfully"),
                start + Duration::from_secs(second),
            );
        }

        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = InMemoryToastQueue::default();
        queue.notify(Notice::info("Language changed"));

        assert_eq!(queue.drain(), vec![Notice::info("Language changed")]);
        assert!(queue.visible().is_empty());
    }
}
