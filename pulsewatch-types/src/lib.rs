//! # pulsewatch-types
//!
//! Core data model for wearable health dashboards. These types are shared
//! between the HTTP client that fetches data and the dashboard that turns it
//! into scores, statuses and recommendations.
//!
//! ## Features
//!
//! - `serde`: JSON serialization via serde (also enables chrono's serde support)
//!
//! ## Example
//!
//! ```rust
//! use pulsewatch_types::{DashboardSnapshot, DomainSummary, RawSeries, SleepNight};
//! use chrono::NaiveDate;
//!
//! let mut series = RawSeries::default();
//! series.sleep.push(SleepNight::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), 450, 88.0));
//!
//! // No explicit summary: the raw series is aggregated.
//! let snapshot = DashboardSnapshot::builder(42).raw_series(series).build();
//!
//! assert_eq!(snapshot.summary.sleep_hours(), Some(7.5));
//! ```

mod series;
mod snapshot;
mod summary;

pub use series::*;
pub use snapshot::*;
pub use summary::*;
