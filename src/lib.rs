//! # pulsewatch
//!
//! A terminal dashboard and library for wearable health metrics.
//!
//! The crate fetches a user's dashboard snapshot (aggregated summary plus
//! raw heart-rate, activity and sleep series), evaluates it into statuses,
//! a composite health score, recommendations, trends, a sleep chart and a
//! device list, and renders the result in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          Application                          │
//! │  ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │   app    │──▶│   engine   │──▶│   data   │──▶│    ui    │  │
//! │  │ (state)  │   │ (refresh)  │   │(insights)│   │ (board)  │  │
//! │  └──────────┘   └─────┬──────┘   └──────────┘   └──────────┘  │
//! │                       │                                       │
//! │                       ▼                                       │
//! │                 ┌───────────┐                                 │
//! │                 │ scheduler │──▶ HttpSource | FileSource |    │
//! │                 │  source   │    SyntheticSource              │
//! │                 └───────────┘                                 │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`engine`]**: [`DashboardEngine`], the single owner of dashboard state
//! - **[`scheduler`]**: Periodic and on-demand fetches with coalescing
//! - **[`source`]**: The [`SnapshotSource`] trait and its implementations
//! - **[`data`]**: Pure evaluators turning a snapshot into [`DashboardInsights`]
//! - **[`notify`]**: Auto-expiring user notifications
//! - **[`ui`]**: [`PresentationSync`](ui::PresentationSync) and ratatui views
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live data from the dashboard service
//! pulsewatch --endpoint http://127.0.0.1:5000 --user 1 --email me@example.com --password ...
//!
//! # A saved dashboard payload
//! pulsewatch --file dashboard.json
//!
//! # Generated demo data
//! pulsewatch --demo
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Instant;
//! use pulsewatch::{DashboardEngine, EngineConfig, SyntheticSource};
//!
//! # tokio_test::block_on(async {
//! let source = Arc::new(SyntheticSource::new());
//! let mut engine = DashboardEngine::new(
//!     EngineConfig::default(),
//!     source,
//!     tokio::runtime::Handle::current(),
//! );
//!
//! engine.start(Instant::now());
//! let completion = engine.next_completion().await.unwrap();
//! engine.apply(completion, Instant::now());
//!
//! let insights = engine.insights().unwrap();
//! assert!(insights.score.value() <= 100);
//! assert!(!insights.recommendations.is_empty());
//! # });
//! ```

pub mod app;
pub mod clock;
pub mod config;
pub mod data;
pub mod engine;
pub mod events;
pub mod export;
pub mod logging;
pub mod notify;
pub mod scheduler;
pub mod session;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use clock::{Clock, FixedClock, SystemClock};
pub use data::{DashboardInsights, HealthScore, Recommendation, StatusClass};
pub use engine::{DashboardEngine, EngineConfig, OverlapPolicy};
pub use notify::{Notification, NotificationSink, Severity};
pub use scheduler::{Completion, RefreshScheduler, TriggerOutcome};
pub use session::Session;
pub use source::{FetchError, FileSource, HttpSource, SnapshotSource, SyntheticSource};
