//! The dashboard engine: refresh lifecycle plus evaluation.
//!
//! [`DashboardEngine`] is the one owner of dashboard state. It is driven by
//! the UI loop (`tick`, `pump`, key actions) and never blocks: fetches run
//! on the scheduler's runtime and come back as [`Completion`]s.
//!
//! Each completion replaces the current snapshot wholesale. A failed fetch
//! is replaced by a synthesized snapshot marked `degraded`, and a warning is
//! queued; the periodic timer keeps running either way.

use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pulsewatch_types::DashboardSnapshot;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::Deserialize;
use tokio::runtime::Handle;

use crate::clock::{Clock, SystemClock};
use crate::data::{DashboardInsights, History};
use crate::notify::{NotificationId, NotificationSink, Severity, DEFAULT_TTL};
use crate::scheduler::{Completion, RefreshScheduler, TriggerOutcome, DEFAULT_INTERVAL};
use crate::source::{synthesize, SnapshotSource};

/// What to do when fetches finish out of order.
///
/// Only forced refreshes can overlap, so this matters only when a forced
/// refresh races another fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Apply every completion in arrival order; the last to finish wins.
    #[default]
    LastCompletedWins,
    /// Drop a completion older than the last applied one.
    DropOutOfOrder,
}

impl FromStr for OverlapPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-completed-wins" => Ok(OverlapPolicy::LastCompletedWins),
            "drop-out-of-order" => Ok(OverlapPolicy::DropOutOfOrder),
            other => anyhow::bail!(
                "Unknown overlap policy '{}' (expected last-completed-wins or drop-out-of-order)",
                other
            ),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub user_id: u64,
    pub refresh_interval: Duration,
    /// Age after which returning to the foreground triggers a refresh.
    pub staleness: Duration,
    pub notification_ttl: Duration,
    pub overlap: OverlapPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            refresh_interval: DEFAULT_INTERVAL,
            staleness: Duration::from_secs(300),
            notification_ttl: DEFAULT_TTL,
            overlap: OverlapPolicy::default(),
        }
    }
}

/// Owns the scheduler, the current snapshot and everything derived from it.
pub struct DashboardEngine {
    config: EngineConfig,
    scheduler: RefreshScheduler,
    snapshot: Option<Arc<DashboardSnapshot>>,
    insights: Option<DashboardInsights>,
    history: History,
    notifications: NotificationSink,
    clock: Arc<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
    last_applied_seq: Option<u64>,
    last_applied_at: Option<Instant>,
    last_error: Option<String>,
}

impl std::fmt::Debug for DashboardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardEngine")
            .field("config", &self.config)
            .field("scheduler", &self.scheduler)
            .field("last_applied_seq", &self.last_applied_seq)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

impl DashboardEngine {
    /// Create an engine fetching from `source` on the runtime behind `handle`.
    ///
    /// Uses the system clock and an entropy-seeded random source; see
    /// [`with_clock`](Self::with_clock) and [`with_rng`](Self::with_rng).
    pub fn new(config: EngineConfig, source: Arc<dyn SnapshotSource>, handle: Handle) -> Self {
        let scheduler = RefreshScheduler::new(source, config.user_id, handle);
        Self {
            notifications: NotificationSink::new(config.notification_ttl),
            config,
            scheduler,
            snapshot: None,
            insights: None,
            history: History::new(),
            clock: Arc::new(SystemClock),
            rng: Box::new(StdRng::from_entropy()),
            last_applied_seq: None,
            last_applied_at: None,
            last_error: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_rng(mut self, rng: Box<dyn RngCore + Send>) -> Self {
        self.rng = rng;
        self
    }

    /// Fetch once and arm the periodic timer.
    pub fn start(&mut self, now: Instant) -> TriggerOutcome {
        let outcome = self.scheduler.trigger_now(false);
        self.scheduler.start(self.config.refresh_interval, now);
        outcome
    }

    /// Disarm the periodic timer.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Fire the periodic timer if due and drop expired notifications.
    pub fn tick(&mut self, now: Instant) -> Option<TriggerOutcome> {
        self.notifications.prune(now);
        self.scheduler.poll_timer(now)
    }

    /// Manual refresh. A forced refresh runs even if a fetch is in flight.
    pub fn refresh(&mut self, force: bool) -> TriggerOutcome {
        self.scheduler.trigger_now(force)
    }

    /// True when nothing was applied yet or the last apply is older than
    /// the staleness threshold.
    pub fn is_stale(&self, now: Instant) -> bool {
        match self.last_applied_at {
            Some(at) => now.saturating_duration_since(at) > self.config.staleness,
            None => true,
        }
    }

    /// Refresh if the data went stale while the dashboard was in the background.
    pub fn on_foreground(&mut self, now: Instant) -> Option<TriggerOutcome> {
        if self.is_stale(now) {
            tracing::debug!("returned to foreground with stale data");
            Some(self.refresh(false))
        } else {
            None
        }
    }

    /// Apply every finished fetch. Returns true if a snapshot was applied.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut applied = false;
        while let Some(completion) = self.scheduler.try_next() {
            applied |= self.apply(completion, now);
        }
        applied
    }

    /// Wait for the next finished fetch without applying it.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.scheduler.next().await
    }

    /// Apply one finished fetch.
    ///
    /// On success the fetched snapshot becomes current; on failure a
    /// synthesized, degraded snapshot does and a warning is queued. Returns
    /// false only when the overlap policy dropped the completion.
    pub fn apply(&mut self, completion: Completion, now: Instant) -> bool {
        let Completion { seq, forced, result } = completion;

        if self.config.overlap == OverlapPolicy::DropOutOfOrder
            && self.last_applied_seq.is_some_and(|last| seq < last)
        {
            tracing::debug!(seq, last = ?self.last_applied_seq, "dropping out-of-order completion");
            return false;
        }

        let snapshot = match result {
            Ok(snapshot) => {
                tracing::info!(seq, forced, user_id = snapshot.user_id, "snapshot applied");
                if self.last_error.take().is_some() {
                    self.notifications.enqueue("Connection restored", Severity::Success, now);
                }
                snapshot
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "fetch failed, showing synthesized data");
                let mut snapshot =
                    synthesize(self.config.user_id, self.clock.now(), &mut *self.rng);
                snapshot.degraded = true;
                self.notifications.enqueue(
                    format!("Offline, showing sample data: {}", e),
                    Severity::Warning,
                    now,
                );
                self.last_error = Some(e.to_string());
                snapshot
            }
        };

        let snapshot = Arc::new(snapshot);
        let insights = DashboardInsights::from_snapshot(
            Arc::clone(&snapshot),
            &self.history,
            self.clock.now(),
            &mut *self.rng,
        );
        self.history.record(&snapshot);

        self.snapshot = Some(snapshot);
        self.insights = Some(insights);
        self.last_applied_seq = Some(self.last_applied_seq.map_or(seq, |last| last.max(seq)));
        self.last_applied_at = Some(now);
        true
    }

    /// Queue a notification.
    pub fn notify(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> NotificationId {
        self.notifications.enqueue(message, severity, now)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Option<&Arc<DashboardSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Insights computed from the current snapshot.
    pub fn insights(&self) -> Option<&DashboardInsights> {
        self.insights.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn notifications(&self) -> &NotificationSink {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationSink {
        &mut self.notifications
    }

    /// Message of the last failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True when the current snapshot was synthesized.
    pub fn is_degraded(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.degraded)
    }

    pub fn source_description(&self) -> &str {
        self.scheduler.source().description()
    }
}
