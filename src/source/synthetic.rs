//! Synthetic snapshots for demos and offline fallback.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Days, Duration, Utc};
use parking_lot::Mutex;
use pulsewatch_types::{ActivityDay, DashboardSnapshot, HeartRateSample, RawSeries, SleepNight};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use super::{FetchError, FetchOptions, SnapshotSource};
use crate::clock::{Clock, SystemClock};

const DAYS: u64 = 7;
const HEART_RATE_READINGS: i64 = 24;

/// Generate a plausible week of data ending at `now`.
///
/// The summary is aggregated from the generated series. The snapshot is not
/// marked degraded; callers using it as a fallback set that themselves.
pub fn synthesize(user_id: u64, now: DateTime<Utc>, rng: &mut dyn RngCore) -> DashboardSnapshot {
    let today = now.date_naive();
    let mut series = RawSeries::default();

    for hour in 0..HEART_RATE_READINGS {
        let timestamp = (now - Duration::hours(hour)).naive_utc();
        series.heart_rate.push(HeartRateSample {
            timestamp,
            heart_rate: f64::from(rng.gen_range(55u32..=95)),
            device_id: Some("synthetic-hr".to_string()),
        });
    }

    for day in 0..DAYS {
        let Some(date) = today.checked_sub_days(Days::new(day)) else {
            break;
        };

        let steps = rng.gen_range(4_000..=12_000);
        series.activity.push(ActivityDay {
            activity_date: date,
            total_steps: steps,
            total_distance: f64::from(steps) * 0.000_75,
            very_active_minutes: rng.gen_range(5..=40),
            fairly_active_minutes: rng.gen_range(5..=30),
            lightly_active_minutes: rng.gen_range(100..=250),
            sedentary_minutes: rng.gen_range(600..=900),
            calories: rng.gen_range(1_800..=2_800),
        });

        let asleep = rng.gen_range(330..=540);
        series.sleep.push(SleepNight {
            sleep_date: date,
            total_sleep_records: 1,
            total_minutes_asleep: asleep,
            total_time_in_bed: asleep + rng.gen_range(10..=60),
            sleep_efficiency: f64::from(rng.gen_range(72u32..=96)),
        });
    }

    DashboardSnapshot::builder(user_id)
        .raw_series(series)
        .fetched_at(now)
        .build()
}

/// A source that always succeeds with synthetic data.
#[derive(Debug)]
pub struct SyntheticSource {
    rng: Mutex<StdRng>,
    clock: Arc<dyn Clock>,
}

impl SyntheticSource {
    /// Create a source seeded from entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create a reproducible source.
    pub fn seeded(seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            clock,
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotSource for SyntheticSource {
    async fn fetch(
        &self,
        user_id: u64,
        _options: FetchOptions,
    ) -> Result<DashboardSnapshot, FetchError> {
        let now = self.clock.now();
        let mut rng = self.rng.lock();
        Ok(synthesize(user_id, now, &mut *rng))
    }

    fn description(&self) -> &str {
        "demo data"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 7, 9, 30, 0).unwrap()
    }

    #[test]
    fn synthesized_week_is_complete() {
        let snapshot = synthesize(4, now(), &mut StdRng::seed_from_u64(11));

        assert_eq!(snapshot.user_id, 4);
        assert_eq!(snapshot.fetched_at, now());
        assert!(!snapshot.degraded);
        assert_eq!(snapshot.raw_series.heart_rate.len(), 24);
        assert_eq!(snapshot.raw_series.activity.len(), 7);
        assert_eq!(snapshot.raw_series.sleep.len(), 7);

        let hr = snapshot.summary.heart_rate_avg().unwrap();
        assert!((55.0..=95.0).contains(&hr));
        let hours = snapshot.summary.sleep_hours().unwrap();
        assert!((5.5..=9.0).contains(&hours));
    }

    #[test]
    fn same_seed_same_snapshot() {
        let a = synthesize(1, now(), &mut StdRng::seed_from_u64(5));
        let b = synthesize(1, now(), &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn source_uses_injected_clock() {
        let source = SyntheticSource::seeded(3, Arc::new(FixedClock::new(now())));
        let snapshot = source.fetch(2, FetchOptions::default()).await.unwrap();
        assert_eq!(snapshot.fetched_at, now());
        assert_eq!(source.description(), "demo data");
    }
}
