//! One-way projection of computed insights onto the presentation layer.
//!
//! [`PresentationSync`] reads a [`DashboardInsights`] and writes display
//! text into named [`Slot`]s of a [`Presentation`]. A presentation may not
//! expose every slot; unbound slots are counted in the [`SyncReport`] and
//! logged, never raised.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::data::duration::format_since;
use crate::data::{
    Assessment, ChartPoint, DashboardInsights, DeviceStatus, Metric, StatusClass, Trend,
};

/// Placeholder shown for a metric with no data.
pub const NO_DATA: &str = "--";

/// A named place the presentation can show a value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Score,
    HeartRate,
    BloodPressure,
    Steps,
    Calories,
    ActiveMinutes,
    Sleep,
    SleepEfficiency,
    LastUpdated,
    Recommendations,
    Devices,
}

impl Slot {
    pub const ALL: [Slot; 11] = [
        Slot::Score,
        Slot::HeartRate,
        Slot::BloodPressure,
        Slot::Steps,
        Slot::Calories,
        Slot::ActiveMinutes,
        Slot::Sleep,
        Slot::SleepEfficiency,
        Slot::LastUpdated,
        Slot::Recommendations,
        Slot::Devices,
    ];

    /// Metric rows shown in the overview table, in display order.
    pub const METRICS: [Slot; 7] = [
        Slot::HeartRate,
        Slot::BloodPressure,
        Slot::Steps,
        Slot::Calories,
        Slot::ActiveMinutes,
        Slot::Sleep,
        Slot::SleepEfficiency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Score => "Health Score",
            Slot::HeartRate => "Heart Rate",
            Slot::BloodPressure => "Blood Pressure",
            Slot::Steps => "Steps",
            Slot::Calories => "Calories",
            Slot::ActiveMinutes => "Active Minutes",
            Slot::Sleep => "Sleep",
            Slot::SleepEfficiency => "Sleep Efficiency",
            Slot::LastUpdated => "Last Updated",
            Slot::Recommendations => "Recommendations",
            Slot::Devices => "Devices",
        }
    }

    /// The trend metric shown next to this slot, if any.
    pub fn metric(&self) -> Option<Metric> {
        match self {
            Slot::HeartRate => Some(Metric::HeartRate),
            Slot::Steps => Some(Metric::Steps),
            Slot::Sleep => Some(Metric::SleepHours),
            Slot::SleepEfficiency => Some(Metric::SleepEfficiency),
            _ => None,
        }
    }
}

/// One row of a list slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundRow {
    pub cells: Vec<String>,
    pub status: Option<StatusClass>,
}

/// Display state of a single slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Binding {
    pub text: String,
    /// Status badge text, e.g. "Normal".
    pub badge: Option<String>,
    pub status: Option<StatusClass>,
    pub trend: Option<Trend>,
    pub rows: Vec<BoundRow>,
}

impl Binding {
    fn clear(&mut self) {
        *self = Binding::default();
    }

    fn set_value(&mut self, text: Option<String>, assessment: Option<Assessment>) {
        match text {
            Some(text) => {
                self.text = text;
                self.badge = assessment.map(|a| a.label.to_string());
                self.status = assessment.map(|a| a.status);
            }
            None => {
                self.text = NO_DATA.to_string();
                self.badge = Some("No data".to_string());
                self.status = None;
            }
        }
    }
}

/// Identifies one bound chart. Each bind returns a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChartHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("presentation has no slot for {}", .0.label())]
    MissingSlot(Slot),
}

/// The surface insights are projected onto.
pub trait Presentation {
    /// Mutable access to a slot, or `None` when the slot is not shown.
    fn slot(&mut self, slot: Slot) -> Option<&mut Binding>;

    /// Release the current chart binding. Returns false if nothing was bound.
    fn release_chart(&mut self) -> bool;

    /// Bind a new chart series.
    fn bind_chart(&mut self, points: Vec<ChartPoint>) -> ChartHandle;
}

/// Outcome of one projection.
#[derive(Debug, Default, PartialEq)]
pub struct SyncReport {
    pub bound: usize,
    pub missing: Vec<BindingError>,
    pub chart_released: bool,
    pub chart: Option<ChartHandle>,
}

/// Projects insights onto a [`Presentation`].
#[derive(Debug, Default)]
pub struct PresentationSync {
    projections: u64,
}

impl PresentationSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed projections.
    pub fn projections(&self) -> u64 {
        self.projections
    }

    /// Write every slot from `insights`, then rebind the sleep chart.
    pub fn project(
        &mut self,
        insights: &DashboardInsights,
        presentation: &mut dyn Presentation,
        now: DateTime<Utc>,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        for slot in Slot::ALL {
            let Some(binding) = presentation.slot(slot) else {
                let err = BindingError::MissingSlot(slot);
                tracing::debug!(error = %err, "slot not bound");
                report.missing.push(err);
                continue;
            };
            binding.clear();
            fill(slot, binding, insights, now);
            report.bound += 1;
        }

        report.chart_released = presentation.release_chart();
        report.chart = Some(presentation.bind_chart(insights.chart.clone()));

        self.projections += 1;
        report
    }
}

fn fill(slot: Slot, binding: &mut Binding, insights: &DashboardInsights, now: DateTime<Utc>) {
    let snapshot = &insights.snapshot;
    let summary = &snapshot.summary;
    let statuses = &insights.statuses;
    binding.trend = slot.metric().and_then(|m| insights.trends.get(m));

    match slot {
        Slot::Score => {
            let grade = insights.score.grade();
            binding.text = insights.score.value().to_string();
            binding.badge = Some(grade.label().to_string());
            binding.status = Some(grade.status());
        }
        Slot::HeartRate => binding.set_value(
            summary.heart_rate_avg().map(|v| format!("{:.0} bpm", v)),
            statuses.heart_rate,
        ),
        Slot::BloodPressure => match statuses.blood_pressure {
            Some((bp, assessment)) => binding.set_value(Some(bp.to_string()), Some(assessment)),
            None => binding.set_value(None, None),
        },
        Slot::Steps => binding.set_value(summary.avg_steps().map(|v| format!("{:.0}", v)), None),
        Slot::Calories => binding.set_value(
            summary
                .activity
                .as_ref()
                .and_then(|a| a.avg_calories)
                .map(|v| format!("{:.0} kcal", v)),
            None,
        ),
        Slot::ActiveMinutes => binding.set_value(
            summary
                .activity
                .as_ref()
                .and_then(|a| a.avg_active_minutes)
                .map(|v| format!("{:.0} min", v)),
            None,
        ),
        Slot::Sleep => binding.set_value(
            summary.sleep_hours().map(|h| format!("{:.1} h", h)),
            statuses.sleep_duration,
        ),
        Slot::SleepEfficiency => binding.set_value(
            summary.sleep_efficiency().map(|p| format!("{:.0}%", p)),
            statuses.sleep_efficiency,
        ),
        Slot::LastUpdated => {
            binding.text = format_since(snapshot.age(now));
            if snapshot.degraded {
                binding.badge = Some("sample data".to_string());
                binding.status = Some(StatusClass::Warning);
            }
        }
        Slot::Recommendations => {
            binding.rows = insights
                .recommendations
                .iter()
                .map(|r| BoundRow {
                    cells: vec![r.icon.to_string(), r.text.to_string()],
                    status: None,
                })
                .collect();
            binding.text = binding.rows.len().to_string();
        }
        Slot::Devices => {
            binding.rows = insights
                .devices
                .iter()
                .map(|d| {
                    let reading = snapshot
                        .raw_series
                        .latest(d.domain)
                        .map(|s| format!("{:.0}", s.value))
                        .unwrap_or_else(|| NO_DATA.to_string());
                    BoundRow {
                        cells: vec![
                            d.name.to_string(),
                            d.status.label().to_string(),
                            format!("{}%", d.battery_pct),
                            format_since(now - d.last_sync),
                            reading,
                        ],
                        status: Some(match d.status {
                            DeviceStatus::Connected => StatusClass::Good,
                            DeviceStatus::Disconnected => StatusClass::Warning,
                        }),
                    }
                })
                .collect();
            binding.text = binding.rows.len().to_string();
        }
    }
}
