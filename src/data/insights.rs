//! Everything derived from one snapshot.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pulsewatch_types::DashboardSnapshot;
use rand::RngCore;

use super::chart::{self, ChartPoint};
use super::devices::{self, DeviceRecord};
use super::recommend::{self, Recommendation};
use super::score::{self, HealthScore};
use super::status::DomainStatuses;
use super::trend::{History, Trends};

/// Display-ready results computed from a single snapshot.
///
/// All fields are derived from `snapshot`, so consumers never mix figures
/// from two different refreshes.
#[derive(Debug, Clone)]
pub struct DashboardInsights {
    pub snapshot: Arc<DashboardSnapshot>,
    pub statuses: DomainStatuses,
    pub score: HealthScore,
    pub recommendations: Vec<Recommendation>,
    pub trends: Trends,
    pub chart: Vec<ChartPoint>,
    pub devices: Vec<DeviceRecord>,
}

impl DashboardInsights {
    /// Run every evaluator against `snapshot`.
    ///
    /// Trends compare against the latest entry of `history`, so call this
    /// before recording the snapshot.
    pub fn from_snapshot(
        snapshot: Arc<DashboardSnapshot>,
        history: &History,
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> Self {
        let summary = &snapshot.summary;
        let statuses = DomainStatuses::evaluate(summary);
        let score = score::compute(summary);
        let recommendations = recommend::recommend(summary);
        let trends = history.trends(summary);
        let chart = chart::adapt(&snapshot.raw_series.sleep);
        let devices = devices::resolve(&snapshot.raw_series, now, rng);

        Self {
            statuses,
            score,
            recommendations,
            trends,
            chart,
            devices,
            snapshot,
        }
    }
}
