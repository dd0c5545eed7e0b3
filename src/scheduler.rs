//! Refresh scheduling.
//!
//! The scheduler decides when a fetch runs and keeps at most one non-forced
//! fetch in flight. Fetches run as tokio tasks on the supplied runtime
//! handle and report back over a channel, so the owning loop never blocks
//! on I/O.
//!
//! ```text
//! poll_timer / trigger_now ──▶ tokio task ──▶ SnapshotSource::fetch
//!                                   │
//!        try_next / next ◀── mpsc ◀─┘ (Completion { seq, result })
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use pulsewatch_types::DashboardSnapshot;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::source::{FetchError, FetchOptions, SnapshotSource};

/// Default periodic refresh interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Result of a finished fetch.
#[derive(Debug)]
pub struct Completion {
    /// Sequence number assigned when the fetch started.
    pub seq: u64,
    pub forced: bool,
    pub result: Result<DashboardSnapshot, FetchError>,
}

/// What a trigger did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A fetch was spawned.
    Started { seq: u64 },
    /// A fetch was already in flight; nothing was spawned.
    Coalesced,
}

/// Drives fetches from a [`SnapshotSource`].
#[derive(Debug)]
pub struct RefreshScheduler {
    source: Arc<dyn SnapshotSource>,
    user_id: u64,
    handle: Handle,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: Arc<AtomicUsize>,
    next_seq: u64,
    interval: Duration,
    deadline: Option<Instant>,
}

impl RefreshScheduler {
    /// Create a stopped scheduler that spawns fetches on `handle`.
    pub fn new(source: Arc<dyn SnapshotSource>, user_id: u64, handle: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            user_id,
            handle,
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
            next_seq: 0,
            interval: DEFAULT_INTERVAL,
            deadline: None,
        }
    }

    pub fn source(&self) -> &Arc<dyn SnapshotSource> {
        &self.source
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Arm the periodic timer; the first tick is one interval after `now`.
    pub fn start(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        self.deadline = Some(now + interval);
        tracing::debug!(interval_ms = interval.as_millis() as u64, "refresh timer armed");
    }

    /// Disarm the timer. Fetches already in flight still complete.
    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Number of fetches that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    /// Fire the timer if its deadline has passed.
    ///
    /// Missed periods are skipped: the next deadline is the first whole
    /// interval after `now`.
    pub fn poll_timer(&mut self, now: Instant) -> Option<TriggerOutcome> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }

        let mut next = deadline;
        while next <= now {
            next += self.interval.max(Duration::from_millis(1));
        }
        self.deadline = Some(next);

        Some(self.trigger_now(false))
    }

    /// Start a fetch now.
    ///
    /// A non-forced trigger while a fetch is in flight is coalesced into it.
    /// A forced trigger always starts a new fetch and bypasses caches.
    pub fn trigger_now(&mut self, force: bool) -> TriggerOutcome {
        if !force && self.is_busy() {
            tracing::debug!(in_flight = self.in_flight(), "refresh coalesced");
            return TriggerOutcome::Coalesced;
        }

        self.next_seq += 1;
        let seq = self.next_seq;

        let source = Arc::clone(&self.source);
        let user_id = self.user_id;
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        in_flight.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(seq, force, source = source.description(), "refresh started");
        let fetch = self.handle.spawn(async move {
            source
                .fetch(user_id, FetchOptions { force_fresh: force })
                .await
        });
        self.handle.spawn(async move {
            // A panicking source still yields a completion.
            let result = fetch.await.unwrap_or_else(|e| {
                tracing::warn!(seq, error = %e, "fetch task failed");
                Err(FetchError::Aborted(e.to_string()))
            });
            in_flight.fetch_sub(1, Ordering::SeqCst);
            // Fails only once the scheduler is gone.
            let _ = tx.send(Completion {
                seq,
                forced: force,
                result,
            });
        });

        TriggerOutcome::Started { seq }
    }

    /// Take a finished fetch without waiting.
    pub fn try_next(&mut self) -> Option<Completion> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished fetch.
    pub async fn next(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SyntheticSource;

    fn scheduler() -> RefreshScheduler {
        RefreshScheduler::new(Arc::new(SyntheticSource::new()), 1, Handle::current())
    }

    #[derive(Debug)]
    struct PanickingSource;

    #[async_trait::async_trait]
    impl SnapshotSource for PanickingSource {
        async fn fetch(
            &self,
            _user_id: u64,
            _options: FetchOptions,
        ) -> Result<DashboardSnapshot, FetchError> {
            panic!("source exploded");
        }

        fn description(&self) -> &str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn timer_fires_once_per_interval() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        assert!(scheduler.poll_timer(start).is_none());

        scheduler.start(Duration::from_secs(300), start);
        assert!(scheduler.is_running());
        assert!(scheduler.poll_timer(start + Duration::from_secs(299)).is_none());

        let fired = scheduler.poll_timer(start + Duration::from_secs(300));
        assert_eq!(fired, Some(TriggerOutcome::Started { seq: 1 }));
        assert!(scheduler.poll_timer(start + Duration::from_secs(301)).is_none());

        let completion = scheduler.next().await.unwrap();
        assert_eq!(completion.seq, 1);
        assert!(!completion.forced);
        assert!(completion.result.is_ok());
    }

    #[tokio::test]
    async fn missed_periods_are_skipped() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.start(Duration::from_secs(10), start);

        // Far past several deadlines: fires once, then waits for the next boundary.
        assert!(scheduler.poll_timer(start + Duration::from_secs(35)).is_some());
        assert!(scheduler.poll_timer(start + Duration::from_secs(39)).is_none());
        let _ = scheduler.next().await;
        assert!(scheduler.poll_timer(start + Duration::from_secs(40)).is_some());
    }

    #[tokio::test]
    async fn stop_disarms_timer() {
        let mut scheduler = scheduler();
        let start = Instant::now();
        scheduler.start(Duration::from_secs(1), start);
        scheduler.stop();
        assert!(!scheduler.is_running());
        assert!(scheduler.poll_timer(start + Duration::from_secs(5)).is_none());
    }

    #[tokio::test]
    async fn panicking_fetch_completes_and_frees_the_slot() {
        let mut scheduler = RefreshScheduler::new(Arc::new(PanickingSource), 1, Handle::current());
        assert_eq!(scheduler.trigger_now(false), TriggerOutcome::Started { seq: 1 });

        let completion = scheduler.next().await.unwrap();
        assert_eq!(completion.seq, 1);
        assert!(matches!(completion.result, Err(FetchError::Aborted(_))));
        assert_eq!(scheduler.in_flight(), 0);

        // The next non-forced trigger is not stuck behind the dead fetch.
        assert_eq!(scheduler.trigger_now(false), TriggerOutcome::Started { seq: 2 });
    }

    #[tokio::test]
    async fn sequence_numbers_increase() {
        let mut scheduler = scheduler();
        assert_eq!(scheduler.trigger_now(true), TriggerOutcome::Started { seq: 1 });
        assert_eq!(scheduler.trigger_now(true), TriggerOutcome::Started { seq: 2 });

        let mut seqs = vec![
            scheduler.next().await.unwrap().seq,
            scheduler.next().await.unwrap().seq,
        ];
        seqs.sort();
        assert_eq!(seqs, vec![1, 2]);
        assert_eq!(scheduler.in_flight(), 0);
        assert!(scheduler.try_next().is_none());
    }
}
