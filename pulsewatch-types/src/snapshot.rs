//! DashboardSnapshot - everything fetched in one refresh cycle.

use chrono::{DateTime, Utc};

use crate::{DomainSummary, RawSeries};

/// A point-in-time bundle of domain summaries and raw series.
///
/// Snapshots are immutable once built. A new refresh produces a new
/// snapshot that replaces the previous one wholesale.
///
/// # Example
///
/// ```rust
/// use pulsewatch_types::{DashboardSnapshot, DomainSummary};
///
/// let snapshot = DashboardSnapshot::builder(7)
///     .summary(DomainSummary::new().with_heart_rate(72.0, 58.0, 121.0))
///     .build();
///
/// assert_eq!(snapshot.user_id, 7);
/// assert!(!snapshot.degraded);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashboardSnapshot {
    /// User the data belongs to.
    pub user_id: u64,

    /// Aggregated figures per domain.
    pub summary: DomainSummary,

    /// Raw readings behind the summary.
    pub raw_series: RawSeries,

    /// When the data was produced.
    pub fetched_at: DateTime<Utc>,

    /// True when the snapshot was synthesized locally because the data
    /// service could not be reached.
    pub degraded: bool,
}

impl DashboardSnapshot {
    /// Create a builder for the given user.
    pub fn builder(user_id: u64) -> SnapshotBuilder {
        SnapshotBuilder::new(user_id)
    }

    /// Age of the snapshot relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.fetched_at)
    }
}

/// Builder for constructing `DashboardSnapshot` instances.
#[derive(Debug)]
pub struct SnapshotBuilder {
    user_id: u64,
    summary: Option<DomainSummary>,
    raw_series: RawSeries,
    fetched_at: Option<DateTime<Utc>>,
    degraded: bool,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            summary: None,
            raw_series: RawSeries::default(),
            fetched_at: None,
            degraded: false,
        }
    }

    /// Use a precomputed summary instead of aggregating the raw series.
    pub fn summary(mut self, summary: DomainSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Set the raw series.
    pub fn raw_series(mut self, raw_series: RawSeries) -> Self {
        self.raw_series = raw_series;
        self
    }

    /// Set the fetch time (defaults to now).
    pub fn fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }

    /// Mark the snapshot as locally synthesized.
    pub fn degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }

    /// Build the snapshot.
    ///
    /// Without an explicit summary the raw series is aggregated with
    /// [`DomainSummary::aggregate`].
    pub fn build(self) -> DashboardSnapshot {
        let summary = self.summary.unwrap_or_else(|| DomainSummary::aggregate(&self.raw_series));
        DashboardSnapshot {
            user_id: self.user_id,
            summary,
            raw_series: self.raw_series,
            fetched_at: self.fetched_at.unwrap_or_else(Utc::now),
            degraded: self.degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SleepNight;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn builder_aggregates_when_no_summary_given() {
        let mut series = RawSeries::default();
        series
            .sleep
            .push(SleepNight::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 480, 91.0));

        let snapshot = DashboardSnapshot::builder(1).raw_series(series).build();
        assert_eq!(snapshot.summary.sleep_hours(), Some(8.0));
        assert!(snapshot.summary.heart_rate.is_none());
    }

    #[test]
    fn explicit_summary_wins_over_series() {
        let summary = DomainSummary::new().with_activity(12000.0, 2400.0, 45.0);
        let snapshot = DashboardSnapshot::builder(1).summary(summary).build();
        assert_eq!(snapshot.summary.avg_steps(), Some(12000.0));
    }

    #[test]
    fn age_is_measured_from_fetch_time() {
        let fetched = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let snapshot = DashboardSnapshot::builder(1).fetched_at(fetched).degraded(true).build();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap();
        assert_eq!(snapshot.age(now).num_minutes(), 5);
        assert!(snapshot.degraded);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let fetched = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let snapshot = DashboardSnapshot::builder(3)
            .summary(DomainSummary::new().with_sleep(450.0, 82.0))
            .fetched_at(fetched)
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: DashboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
