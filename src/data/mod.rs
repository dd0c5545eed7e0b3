//! Evaluation of dashboard snapshots.
//!
//! This module turns a [`DashboardSnapshot`](pulsewatch_types::DashboardSnapshot)
//! into display-ready figures. Every evaluator is a pure function of the
//! snapshot; the only inputs from outside are the trend [`History`], the
//! current time and a random source for device placeholders.
//!
//! ## Submodules
//!
//! - [`status`]: Per-metric classification ([`StatusClass`], [`Assessment`])
//! - [`score`]: Composite [`HealthScore`]
//! - [`recommend`]: Prioritized [`Recommendation`] list
//! - [`trend`]: Trend glyphs and sparklines over recorded summaries
//! - [`chart`]: Seven-night sleep chart series
//! - [`devices`]: Device list inferred from data presence
//! - [`insights`]: [`DashboardInsights`], all of the above for one snapshot
//! - [`duration`]: Parsing and formatting of durations
//!
//! ## Data Flow
//!
//! ```text
//! DashboardSnapshot
//!        │
//!        ▼
//! DashboardInsights::from_snapshot()
//!        │
//!        ├──▶ statuses, score, recommendations (summary)
//!        ├──▶ chart, devices (raw series)
//!        └──▶ trends (summary vs History::latest)
//! ```

pub mod chart;
pub mod devices;
pub mod duration;
pub mod insights;
pub mod recommend;
pub mod score;
pub mod status;
pub mod trend;

pub use chart::ChartPoint;
pub use devices::{DeviceRecord, DeviceStatus};
pub use insights::DashboardInsights;
pub use recommend::Recommendation;
pub use score::{Grade, HealthScore};
pub use status::{Assessment, BloodPressure, DomainStatuses, HealthLevel, StatusClass};
pub use trend::{Direction, History, Metric, Trend, Trends};
