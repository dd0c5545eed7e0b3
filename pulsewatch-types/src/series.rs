//! Raw time series as recorded by the wearable backend.

use chrono::{NaiveDate, NaiveDateTime};

/// A health domain tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Domain {
    /// Heart rate readings.
    HeartRate,
    /// Daily activity (steps, calories, active minutes).
    Activity,
    /// Nightly sleep records.
    Sleep,
}

impl Domain {
    /// All domains in display priority order.
    pub const ALL: [Domain; 3] = [Domain::HeartRate, Domain::Activity, Domain::Sleep];

    /// Returns the display label for this domain.
    pub fn label(&self) -> &'static str {
        match self {
            Domain::HeartRate => "Heart Rate",
            Domain::Activity => "Activity",
            Domain::Sleep => "Sleep",
        }
    }
}

/// A single heart rate reading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeartRateSample {
    /// When the reading was taken.
    pub timestamp: NaiveDateTime,
    /// Beats per minute.
    pub heart_rate: f64,
    /// Identifier of the device that produced the reading, if known.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub device_id: Option<String>,
}

/// One day of activity totals.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActivityDay {
    pub activity_date: NaiveDate,
    pub total_steps: u32,
    pub total_distance: f64,
    pub very_active_minutes: u32,
    pub fairly_active_minutes: u32,
    pub lightly_active_minutes: u32,
    pub sedentary_minutes: u32,
    pub calories: u32,
}

impl ActivityDay {
    /// Create an activity day with steps and calories; minute buckets start at zero.
    pub fn new(activity_date: NaiveDate, total_steps: u32, calories: u32) -> Self {
        Self {
            activity_date,
            total_steps,
            calories,
            ..Default::default()
        }
    }

    /// Minutes spent very or fairly active.
    pub fn active_minutes(&self) -> u32 {
        self.very_active_minutes + self.fairly_active_minutes
    }
}

/// One night of sleep.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SleepNight {
    pub sleep_date: NaiveDate,
    pub total_sleep_records: u32,
    pub total_minutes_asleep: u32,
    pub total_time_in_bed: u32,
    /// Percentage of time in bed spent asleep (0-100).
    pub sleep_efficiency: f64,
}

impl SleepNight {
    /// Create a sleep record from minutes asleep and efficiency.
    pub fn new(sleep_date: NaiveDate, total_minutes_asleep: u32, sleep_efficiency: f64) -> Self {
        Self {
            sleep_date,
            total_sleep_records: 1,
            total_minutes_asleep,
            total_time_in_bed: total_minutes_asleep,
            sleep_efficiency,
        }
    }

    /// Hours asleep.
    pub fn hours_asleep(&self) -> f64 {
        f64::from(self.total_minutes_asleep) / 60.0
    }
}

/// A domain-tagged reading flattened out of the typed series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub domain: Domain,
}

/// Raw readings for every domain, as returned by the backend.
///
/// The backend returns each series newest first, but nothing here relies on
/// that ordering.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawSeries {
    pub heart_rate: Vec<HeartRateSample>,
    pub activity: Vec<ActivityDay>,
    pub sleep: Vec<SleepNight>,
}

impl RawSeries {
    /// Check if every series is empty.
    pub fn is_empty(&self) -> bool {
        self.heart_rate.is_empty() && self.activity.is_empty() && self.sleep.is_empty()
    }

    /// Check whether a domain has any readings.
    pub fn has(&self, domain: Domain) -> bool {
        match domain {
            Domain::HeartRate => !self.heart_rate.is_empty(),
            Domain::Activity => !self.activity.is_empty(),
            Domain::Sleep => !self.sleep.is_empty(),
        }
    }

    /// Flatten the series into domain-tagged samples.
    ///
    /// Activity days contribute their step count and sleep nights their
    /// minutes asleep, both stamped at midnight of their date.
    pub fn samples(&self) -> impl Iterator<Item = RawSample> + '_ {
        let heart_rate = self.heart_rate.iter().map(|s| RawSample {
            timestamp: s.timestamp,
            value: s.heart_rate,
            domain: Domain::HeartRate,
        });
        let activity = self.activity.iter().map(|a| RawSample {
            timestamp: a.activity_date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            value: f64::from(a.total_steps),
            domain: Domain::Activity,
        });
        let sleep = self.sleep.iter().map(|s| RawSample {
            timestamp: s.sleep_date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            value: f64::from(s.total_minutes_asleep),
            domain: Domain::Sleep,
        });
        heart_rate.chain(activity).chain(sleep)
    }

    /// The most recent sample for a domain.
    pub fn latest(&self, domain: Domain) -> Option<RawSample> {
        self.samples().filter(|s| s.domain == domain).max_by_key(|s| s.timestamp)
    }
}
