//! Application state and navigation logic.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use pulsewatch_client::{HealthApiClient, UserProfile};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::engine::DashboardEngine;
use crate::export;
use crate::notify::Severity;
use crate::scheduler::TriggerOutcome;
use crate::ui::{Board, PresentationSync, Theme};

/// Projections are refreshed at least this often so relative times advance.
const REPROJECT_INTERVAL: Duration = Duration::from_secs(30);

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Metrics, score and recommendations.
    Overview,
    /// Seven-night sleep chart.
    Sleep,
    /// Inferred devices.
    Devices,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Sleep, View::Devices];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Sleep,
            View::Sleep => View::Devices,
            View::Devices => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Devices,
            View::Sleep => View::Overview,
            View::Devices => View::Sleep,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Sleep => "Sleep",
            View::Devices => "Devices",
        }
    }
}

/// Result of a background account or export action.
#[derive(Debug)]
pub enum ActionResult {
    Exported(Result<PathBuf, String>),
    Scanned(Result<(), String>),
    Profile(Result<UserProfile, String>),
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    pub engine: DashboardEngine,
    pub board: Board,
    sync: PresentationSync,
    last_projection: Option<Instant>,

    client: Option<HealthApiClient>,
    pub profile: Option<UserProfile>,
    export_dir: PathBuf,
    handle: Handle,
    actions_tx: mpsc::UnboundedSender<ActionResult>,
    actions_rx: mpsc::UnboundedReceiver<ActionResult>,

    pub theme: Theme,
}

impl App {
    /// Create a new App around `engine`.
    ///
    /// `client` enables account actions and server-side export; without it
    /// exports are rendered locally and scans are unavailable.
    pub fn new(
        engine: DashboardEngine,
        client: Option<HealthApiClient>,
        export_dir: PathBuf,
        handle: Handle,
    ) -> Self {
        let (actions_tx, actions_rx) = mpsc::unbounded_channel();
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            engine,
            board: Board::new(),
            sync: PresentationSync::new(),
            last_projection: None,
            client,
            profile: None,
            export_dir,
            handle,
            actions_tx,
            actions_rx,
            theme: Theme::dark(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.engine.source_description()
    }

    /// Kick off the first fetch and, when signed in, the profile lookup.
    pub fn start(&mut self, now: Instant) {
        self.engine.start(now);

        if let Some(client) = self.client.clone() {
            let tx = self.actions_tx.clone();
            self.handle.spawn(async move {
                let result = client.profile().await.map_err(|e| e.to_string());
                let _ = tx.send(ActionResult::Profile(result));
            });
        }
    }

    /// One pass of the event loop's housekeeping.
    ///
    /// Returns true when the board was re-projected.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.engine.tick(now);
        let applied = self.engine.pump(now);
        self.poll_actions(now);

        let due = self
            .last_projection
            .map_or(true, |at| now.saturating_duration_since(at) >= REPROJECT_INTERVAL);
        if applied || due {
            self.project(now)
        } else {
            false
        }
    }

    /// Project the engine's current insights onto the board.
    pub fn project(&mut self, now: Instant) -> bool {
        let Some(insights) = self.engine.insights() else {
            return false;
        };
        let report = self.sync.project(insights, &mut self.board, self.engine.clock().now());
        if !report.missing.is_empty() {
            tracing::debug!(missing = report.missing.len(), "projection left slots unbound");
        }
        self.last_projection = Some(now);
        true
    }

    /// Manual refresh.
    pub fn refresh(&mut self, force: bool, now: Instant) {
        match self.engine.refresh(force) {
            TriggerOutcome::Started { .. } => {
                let message = if force { "Refreshing (forced)..." } else { "Refreshing..." };
                self.engine.notify(message, Severity::Info, now);
            }
            TriggerOutcome::Coalesced => {
                self.engine.notify("Refresh already in progress", Severity::Info, now);
            }
        }
    }

    /// Export the current user's data as CSV.
    pub fn export(&mut self, now: Instant) {
        let date = self.engine.clock().now().date_naive();
        let dir = self.export_dir.clone();

        if let Some(client) = self.client.clone() {
            let user_id = self.engine.config().user_id;
            let tx = self.actions_tx.clone();
            self.handle.spawn(async move {
                let result = export::export_remote(&client, user_id, &dir, date)
                    .await
                    .map_err(|e| format!("{:#}", e));
                let _ = tx.send(ActionResult::Exported(result));
            });
            self.engine.notify("Exporting...", Severity::Info, now);
            return;
        }

        let result = match self.engine.snapshot() {
            Some(snapshot) => export::export_local(&snapshot.raw_series, &dir, date)
                .map_err(|e| format!("{:#}", e)),
            None => Err("No data to export".to_string()),
        };
        self.on_action(ActionResult::Exported(result), now);
    }

    /// Ask the service to scan for wearables.
    pub fn scan_wearables(&mut self, now: Instant) {
        let Some(client) = self.client.clone() else {
            self.engine.notify("Wearable scan needs a server connection", Severity::Warning, now);
            return;
        };

        let tx = self.actions_tx.clone();
        self.handle.spawn(async move {
            let result = client.scan_wearables().await.map_err(|e| e.to_string());
            let _ = tx.send(ActionResult::Scanned(result));
        });
        self.engine.notify("Scanning for wearables...", Severity::Info, now);
    }

    /// Dismiss the newest notification.
    pub fn dismiss_notification(&mut self, now: Instant) {
        self.engine.notifications_mut().dismiss_latest(now);
    }

    fn poll_actions(&mut self, now: Instant) {
        while let Ok(result) = self.actions_rx.try_recv() {
            self.on_action(result, now);
        }
    }

    fn on_action(&mut self, result: ActionResult, now: Instant) {
        match result {
            ActionResult::Exported(Ok(path)) => {
                self.engine
                    .notify(format!("Exported to {}", path.display()), Severity::Success, now);
            }
            ActionResult::Exported(Err(e)) => {
                tracing::warn!(error = %e, "export failed");
                self.engine.notify(format!("Export failed: {}", e), Severity::Error, now);
            }
            ActionResult::Scanned(Ok(())) => {
                self.engine.notify("Wearable scan started", Severity::Success, now);
                self.refresh(true, now);
            }
            ActionResult::Scanned(Err(e)) => {
                self.engine.notify(format!("Scan failed: {}", e), Severity::Error, now);
            }
            ActionResult::Profile(Ok(profile)) => {
                tracing::debug!(name = %profile.name, "profile loaded");
                self.profile = Some(profile);
            }
            ActionResult::Profile(Err(e)) => {
                tracing::debug!(error = %e, "profile unavailable");
            }
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}
