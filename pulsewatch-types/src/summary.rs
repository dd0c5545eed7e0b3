//! Aggregated per-domain figures.

use crate::series::RawSeries;

/// Number of most recent days averaged for activity and sleep.
pub const SUMMARY_DAYS: usize = 7;

/// Number of most recent readings averaged for heart rate.
pub const HEART_RATE_WINDOW: usize = 100;

/// Heart rate statistics over the summary window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeartRateSummary {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Daily activity averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActivitySummary {
    pub avg_steps: Option<f64>,
    pub avg_calories: Option<f64>,
    pub avg_active_minutes: Option<f64>,
}

/// Nightly sleep averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SleepSummary {
    pub avg_sleep_duration_minutes: Option<f64>,
    pub avg_sleep_efficiency_pct: Option<f64>,
}

impl SleepSummary {
    /// Average hours asleep, if the duration is known.
    pub fn avg_sleep_hours(&self) -> Option<f64> {
        self.avg_sleep_duration_minutes.map(|m| m / 60.0)
    }
}

/// Aggregated statistics for every domain.
///
/// A `None` domain had no data this period. Inside a present domain any
/// individual figure may still be missing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DomainSummary {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub heart_rate: Option<HeartRateSummary>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub activity: Option<ActivitySummary>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub sleep: Option<SleepSummary>,
}

impl DomainSummary {
    /// Create an empty summary (no domains present).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heart rate average, minimum and maximum.
    pub fn with_heart_rate(mut self, avg: f64, min: f64, max: f64) -> Self {
        self.heart_rate = Some(HeartRateSummary {
            avg: Some(avg),
            min: Some(min),
            max: Some(max),
        });
        self
    }

    /// Set the activity averages.
    pub fn with_activity(mut self, avg_steps: f64, avg_calories: f64, avg_active_minutes: f64) -> Self {
        self.activity = Some(ActivitySummary {
            avg_steps: Some(avg_steps),
            avg_calories: Some(avg_calories),
            avg_active_minutes: Some(avg_active_minutes),
        });
        self
    }

    /// Set the sleep averages.
    pub fn with_sleep(mut self, avg_duration_minutes: f64, avg_efficiency_pct: f64) -> Self {
        self.sleep = Some(SleepSummary {
            avg_sleep_duration_minutes: Some(avg_duration_minutes),
            avg_sleep_efficiency_pct: Some(avg_efficiency_pct),
        });
        self
    }

    /// Average heart rate, if present.
    pub fn heart_rate_avg(&self) -> Option<f64> {
        self.heart_rate.and_then(|h| h.avg)
    }

    /// Average daily steps, if present.
    pub fn avg_steps(&self) -> Option<f64> {
        self.activity.and_then(|a| a.avg_steps)
    }

    /// Average hours asleep, if present.
    pub fn sleep_hours(&self) -> Option<f64> {
        self.sleep.and_then(|s| s.avg_sleep_hours())
    }

    /// Average sleep efficiency percentage, if present.
    pub fn sleep_efficiency(&self) -> Option<f64> {
        self.sleep.and_then(|s| s.avg_sleep_efficiency_pct)
    }

    /// Check if no domain carries data.
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_none() && self.activity.is_none() && self.sleep.is_none()
    }

    /// Aggregate raw series the way the dashboard service does.
    ///
    /// Activity and sleep average the [`SUMMARY_DAYS`] most recent days;
    /// heart rate uses the [`HEART_RATE_WINDOW`] most recent readings.
    /// Empty series leave their domain absent.
    pub fn aggregate(series: &RawSeries) -> Self {
        let mut summary = Self::new();

        if !series.heart_rate.is_empty() {
            let mut readings: Vec<_> = series.heart_rate.iter().collect();
            readings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            let recent: Vec<f64> =
                readings.iter().take(HEART_RATE_WINDOW).map(|s| s.heart_rate).collect();
            let min = recent.iter().copied().fold(f64::INFINITY, f64::min);
            let max = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            summary = summary.with_heart_rate(mean(&recent), min, max);
        }

        if !series.activity.is_empty() {
            let mut days: Vec<_> = series.activity.iter().collect();
            days.sort_by(|a, b| b.activity_date.cmp(&a.activity_date));
            days.truncate(SUMMARY_DAYS);
            let steps: Vec<f64> = days.iter().map(|d| f64::from(d.total_steps)).collect();
            let calories: Vec<f64> = days.iter().map(|d| f64::from(d.calories)).collect();
            let active: Vec<f64> = days.iter().map(|d| f64::from(d.active_minutes())).collect();
            summary = summary.with_activity(mean(&steps), mean(&calories), mean(&active));
        }

        if !series.sleep.is_empty() {
            let mut nights: Vec<_> = series.sleep.iter().collect();
            nights.sort_by(|a, b| b.sleep_date.cmp(&a.sleep_date));
            nights.truncate(SUMMARY_DAYS);
            let minutes: Vec<f64> =
                nights.iter().map(|n| f64::from(n.total_minutes_asleep)).collect();
            let efficiency: Vec<f64> = nights.iter().map(|n| n.sleep_efficiency).collect();
            summary = summary.with_sleep(mean(&minutes), mean(&efficiency));
        }

        summary
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::{ActivityDay, HeartRateSample, SleepNight};
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn empty_series_aggregates_to_empty_summary() {
        let summary = DomainSummary::aggregate(&RawSeries::default());
        assert!(summary.is_empty());
        assert!(summary.heart_rate_avg().is_none());
    }

    #[test]
    fn activity_uses_seven_most_recent_days() {
        let mut series = RawSeries::default();
        // Ten days; the three oldest carry huge step counts that must be ignored.
        for d in 1..=10 {
            let steps = if d <= 3 { 100_000 } else { 7000 };
            series.activity.push(ActivityDay::new(date(d), steps, 2000));
        }
        let summary = DomainSummary::aggregate(&series);
        assert_eq!(summary.avg_steps(), Some(7000.0));
        assert!(summary.heart_rate.is_none());
        assert!(summary.sleep.is_none());
    }

    #[test]
    fn heart_rate_reports_avg_min_max() {
        let mut series = RawSeries::default();
        for (i, bpm) in [60.0, 70.0, 80.0].into_iter().enumerate() {
            series.heart_rate.push(HeartRateSample {
                timestamp: date(1).and_hms_opt(i as u32, 0, 0).unwrap(),
                heart_rate: bpm,
                device_id: None,
            });
        }
        let hr = DomainSummary::aggregate(&series).heart_rate.unwrap();
        assert_eq!(hr.avg, Some(70.0));
        assert_eq!(hr.min, Some(60.0));
        assert_eq!(hr.max, Some(80.0));
    }

    #[test]
    fn sleep_hours_derive_from_minutes() {
        let mut series = RawSeries::default();
        series.sleep.push(SleepNight::new(date(1), 420, 85.0));
        series.sleep.push(SleepNight::new(date(2), 480, 95.0));
        let summary = DomainSummary::aggregate(&series);
        assert_eq!(summary.sleep_hours(), Some(7.5));
        assert_eq!(summary.sleep_efficiency(), Some(90.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn absent_domains_are_not_serialized() {
        let summary = DomainSummary::new().with_sleep(450.0, 82.0);
        let json = serde_json::to_value(summary).unwrap();
        assert!(json.get("heart_rate").is_none());
        assert_eq!(json["sleep"]["avg_sleep_duration_minutes"], 450.0);
    }
}
