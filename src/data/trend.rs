//! Historical tracking for trend glyphs and sparklines.

use std::collections::VecDeque;

use pulsewatch_types::{DashboardSnapshot, DomainSummary};

/// Maximum number of historical summaries to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Changes smaller than this many percent are reported as flat.
pub const FLAT_TOLERANCE_PCT: f64 = 1.0;

/// A metric that can carry a trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HeartRate,
    Steps,
    SleepHours,
    SleepEfficiency,
}

impl Metric {
    pub const ALL: [Metric; 4] =
        [Metric::HeartRate, Metric::Steps, Metric::SleepHours, Metric::SleepEfficiency];

    /// Read this metric out of a summary.
    pub fn value(&self, summary: &DomainSummary) -> Option<f64> {
        match self {
            Metric::HeartRate => summary.heart_rate_avg(),
            Metric::Steps => summary.avg_steps(),
            Metric::SleepHours => summary.sleep_hours(),
            Metric::SleepEfficiency => summary.sleep_efficiency(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart Rate",
            Metric::Steps => "Steps",
            Metric::SleepHours => "Sleep",
            Metric::SleepEfficiency => "Efficiency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn glyph(&self) -> &'static str {
        match self {
            Direction::Up => "▲",
            Direction::Down => "▼",
            Direction::Flat => "▬",
        }
    }
}

/// Direction and size of a change between two readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub direction: Direction,
    pub percent_change: f64,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:+.1}%", self.direction.glyph(), self.percent_change)
    }
}

/// Compare a current value against the previous one.
///
/// Returns `None` when either value is missing or the previous value is
/// zero.
pub fn annotate(current: Option<f64>, previous: Option<f64>) -> Option<Trend> {
    let (current, previous) = (current?, previous?);
    if previous == 0.0 {
        return None;
    }

    let percent_change = (current - previous) / previous.abs() * 100.0;
    let direction = if percent_change.abs() < FLAT_TOLERANCE_PCT {
        Direction::Flat
    } else if percent_change > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };

    Some(Trend {
        direction,
        percent_change,
    })
}

/// Trends for every tracked metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Trends {
    pub heart_rate: Option<Trend>,
    pub steps: Option<Trend>,
    pub sleep_hours: Option<Trend>,
    pub sleep_efficiency: Option<Trend>,
}

impl Trends {
    pub fn get(&self, metric: Metric) -> Option<Trend> {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::Steps => self.steps,
            Metric::SleepHours => self.sleep_hours,
            Metric::SleepEfficiency => self.sleep_efficiency,
        }
    }
}

/// Tracks recent summaries for trending and sparklines.
///
/// Only snapshots that came from the data service are recorded; locally
/// synthesized ones never become a comparison baseline.
#[derive(Debug, Clone, Default)]
pub struct History {
    summaries: VecDeque<DomainSummary>,
}

impl History {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot. Returns false if it was degraded and skipped.
    pub fn record(&mut self, snapshot: &DashboardSnapshot) -> bool {
        if snapshot.degraded {
            return false;
        }

        self.summaries.push_back(snapshot.summary);
        if self.summaries.len() > MAX_HISTORY_SIZE {
            self.summaries.pop_front();
        }
        true
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// The most recently recorded summary.
    pub fn latest(&self) -> Option<&DomainSummary> {
        self.summaries.back()
    }

    /// Trends of `current` against the most recently recorded summary.
    pub fn trends(&self, current: &DomainSummary) -> Trends {
        let previous = self.latest();
        let trend = |metric: Metric| {
            annotate(metric.value(current), previous.and_then(|p| metric.value(p)))
        };
        Trends {
            heart_rate: trend(Metric::HeartRate),
            steps: trend(Metric::Steps),
            sleep_hours: trend(Metric::SleepHours),
            sleep_efficiency: trend(Metric::SleepEfficiency),
        }
    }

    /// Get sparkline data for a metric (normalized to 0-7 for 8 bar levels).
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, metric: Metric) -> Vec<u8> {
        let values: Vec<f64> = self.summaries.iter().filter_map(|s| metric.value(s)).collect();
        normalize_sparkline(&values)
    }
}

/// Normalize values to 0-7 range for sparkline display.
fn normalize_sparkline(values: &[f64]) -> Vec<u8> {
    if values.len() < 2 {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;

    values
        .iter()
        .map(|&v| {
            if range <= f64::EPSILON {
                return 3;
            }
            let normalized = ((v - min) / range * 7.0).round() as u8;
            normalized.min(7)
        })
        .collect()
}
