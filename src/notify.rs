//! Transient user notifications.
//!
//! Messages are kept in arrival order and each expires on its own TTL.
//! Callers pass the current [`Instant`] so expiry is deterministic in tests.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Default time a notification stays visible.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "ok",
            Severity::Warning => "warn",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(u64);

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub expires_at: Instant,
}

impl Notification {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Ordered queue of auto-expiring messages.
#[derive(Debug)]
pub struct NotificationSink {
    queue: VecDeque<Notification>,
    ttl: Duration,
    next_id: u64,
}

impl Default for NotificationSink {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl NotificationSink {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            ttl,
            next_id: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Queue a message that expires `ttl` after `now`.
    pub fn enqueue(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let message = message.into();
        tracing::debug!(severity = severity.label(), %message, "notification queued");
        self.queue.push_back(Notification {
            id,
            message,
            severity,
            expires_at: now + self.ttl,
        });
        id
    }

    /// Unexpired messages, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = &Notification> + '_ {
        self.queue.iter().filter(move |n| !n.is_expired(now))
    }

    /// The newest unexpired message.
    pub fn latest(&self, now: Instant) -> Option<&Notification> {
        self.queue.iter().rev().find(|n| !n.is_expired(now))
    }

    /// Remove a message. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: NotificationId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    /// Remove the newest unexpired message.
    pub fn dismiss_latest(&mut self, now: Instant) -> Option<NotificationId> {
        let id = self.latest(now)?.id;
        self.dismiss(id);
        Some(id)
    }

    /// Drop expired messages, returning how many were removed.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.queue.len();
        self.queue.retain(|n| !n.is_expired(now));
        before - self.queue.len()
    }

    /// Number of queued messages, expired or not.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire_after_ttl() {
        let start = Instant::now();
        let mut sink = NotificationSink::default();
        sink.enqueue("Data refreshed", Severity::Success, start);

        assert_eq!(sink.active(start + Duration::from_millis(4999)).count(), 1);
        assert_eq!(sink.active(start + Duration::from_millis(5000)).count(), 0);
        assert_eq!(sink.prune(start + Duration::from_millis(5000)), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn concurrent_messages_have_independent_ttls() {
        let start = Instant::now();
        let mut sink = NotificationSink::new(Duration::from_secs(5));
        sink.enqueue("first", Severity::Info, start);
        sink.enqueue("second", Severity::Warning, start + Duration::from_secs(3));

        let at_4s: Vec<_> =
            sink.active(start + Duration::from_secs(4)).map(|n| n.message.as_str()).collect();
        assert_eq!(at_4s, vec!["first", "second"]);

        let at_6s: Vec<_> =
            sink.active(start + Duration::from_secs(6)).map(|n| n.message.as_str()).collect();
        assert_eq!(at_6s, vec!["second"]);
        assert_eq!(sink.latest(start + Duration::from_secs(6)).unwrap().severity, Severity::Warning);
    }

    #[test]
    fn dismiss_by_id_and_latest() {
        let now = Instant::now();
        let mut sink = NotificationSink::default();
        let a = sink.enqueue("a", Severity::Info, now);
        let b = sink.enqueue("b", Severity::Error, now);

        assert_eq!(sink.dismiss_latest(now), Some(b));
        assert!(!sink.dismiss(b));
        assert!(sink.dismiss(a));
        assert_eq!(sink.dismiss_latest(now), None);
    }
}
