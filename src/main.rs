use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;

use pulsewatch::app::{App, View};
use pulsewatch::config::Settings;
use pulsewatch::source::{FetchOptions, FileSource, HttpSource, SnapshotSource, SyntheticSource};
use pulsewatch::{events, export, logging, ui, DashboardEngine, Session};
use pulsewatch_client::{HealthApiClient, SignupForm};

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Terminal dashboard for wearable health metrics")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dashboard service URL (overrides api.endpoint)
    #[arg(long)]
    endpoint: Option<String>,

    /// User whose dashboard to show (overrides dashboard.user_id)
    #[arg(short, long)]
    user: Option<u64>,

    /// Read a saved dashboard payload instead of calling the service
    #[arg(short, long, conflicts_with = "demo")]
    file: Option<PathBuf>,

    /// Show generated demo data
    #[arg(long)]
    demo: bool,

    /// Refresh interval (e.g., "5m", "30s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Handling of out-of-order refreshes: last-completed-wins or drop-out-of-order
    #[arg(long)]
    overlap: Option<String>,

    /// Sign in before fetching
    #[arg(long, env = "PULSEWATCH_EMAIL", requires = "password")]
    email: Option<String>,

    #[arg(long, env = "PULSEWATCH_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account on the dashboard service
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password confirmation (defaults to --password)
        #[arg(long)]
        confirm: Option<String>,
    },

    /// Export health data to CSV and exit
    Export {
        /// Output directory (overrides dashboard.export_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref(), &overrides(&args))?;
    logging::init_logging(&settings.logging)?;
    tracing::info!(endpoint = %settings.api.endpoint, user_id = settings.dashboard.user_id, "starting");

    let rt = Runtime::new()?;

    // Handle non-interactive commands
    match &args.command {
        Some(Command::Signup {
            username,
            email,
            password,
            confirm,
        }) => {
            let form = SignupForm::new(username, email, password)
                .confirm(confirm.clone().unwrap_or_else(|| password.clone()));
            return rt.block_on(signup(&settings, &form));
        }
        Some(Command::Export { output }) => {
            let dir = output.clone().unwrap_or_else(|| settings.dashboard.export_dir.clone());
            return rt.block_on(export_to_dir(&args, &settings, &dir));
        }
        None => {}
    }

    let (source, session) = rt.block_on(build_source(&args, &settings))?;
    run_tui(&rt, source, session, &settings)
}

/// Command-line flags as settings overrides.
fn overrides(args: &Args) -> Vec<(&'static str, String)> {
    let mut overrides = Vec::new();
    if let Some(endpoint) = &args.endpoint {
        overrides.push(("api.endpoint", endpoint.clone()));
    }
    if let Some(user) = args.user {
        overrides.push(("dashboard.user_id", user.to_string()));
    }
    if let Some(refresh) = &args.refresh {
        overrides.push(("dashboard.refresh_interval", refresh.clone()));
    }
    if let Some(overlap) = &args.overlap {
        overrides.push(("dashboard.overlap", overlap.clone()));
    }
    overrides
}

fn build_client(settings: &Settings) -> Result<HealthApiClient> {
    HealthApiClient::builder()
        .endpoint(settings.api.endpoint.clone())
        .timeout(settings.api.timeout)
        .build()
        .context("Failed to build HTTP client")
}

/// Build a client and sign in if credentials were given.
///
/// Refused credentials abort; an unreachable service starts offline.
async fn connect(args: &Args, settings: &Settings) -> Result<Session> {
    let client = build_client(settings)?;
    match (&args.email, &args.password) {
        (Some(email), Some(password)) => Session::open(client, email, password)
            .await
            .with_context(|| format!("Login failed for {}", email)),
        _ => Ok(Session::anonymous(client)),
    }
}

/// Pick the snapshot source. Only the service source comes with a session.
async fn build_source(
    args: &Args,
    settings: &Settings,
) -> Result<(Arc<dyn SnapshotSource>, Option<Session>)> {
    if args.demo {
        return Ok((Arc::new(SyntheticSource::new()), None));
    }
    if let Some(path) = &args.file {
        return Ok((Arc::new(FileSource::new(path)), None));
    }

    let session = connect(args, settings).await?;
    let source = HttpSource::new(session.client().clone());
    Ok((Arc::new(source), Some(session)))
}

async fn signup(settings: &Settings, form: &SignupForm) -> Result<()> {
    let client = build_client(settings)?;
    let user = client.signup(form).await.context("Signup failed")?;
    println!(
        "Account created for {}",
        user.username.as_deref().unwrap_or(&form.username)
    );
    Ok(())
}

/// Export the configured user's data and exit
async fn export_to_dir(args: &Args, settings: &Settings, dir: &std::path::Path) -> Result<()> {
    let user_id = settings.dashboard.user_id;
    let date = chrono::Local::now().date_naive();

    let path = if args.demo || args.file.is_some() {
        let (source, _) = build_source(args, settings).await?;
        let snapshot = source.fetch(user_id, FetchOptions::fresh()).await?;
        export::export_local(&snapshot.raw_series, dir, date)?
    } else {
        let mut session = connect(args, settings).await?;
        let exported = export::export_remote(session.client(), user_id, dir, date).await;
        session.close().await;
        exported?
    };

    println!("Exported health data to: {}", path.display());
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(
    rt: &Runtime,
    source: Arc<dyn SnapshotSource>,
    mut session: Option<Session>,
    settings: &Settings,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let engine = DashboardEngine::new(settings.engine_config(), source, rt.handle().clone());
    let mut app = App::new(
        engine,
        session.as_ref().map(|s| s.client().clone()),
        settings.dashboard.export_dir.clone(),
        rt.handle().clone(),
    )
    .with_theme(ui::Theme::auto_detect());
    app.start(Instant::now());

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    if let Some(session) = session.as_mut() {
        rt.block_on(session.close());
    }

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        let now = Instant::now();
        app.tick(now);

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height / 2).saturating_sub(2),
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Sleep => ui::sleep::render(frame, app, chunks[2]),
                View::Devices => ui::devices::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3], now);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            events::handle_event(app, event, Instant::now());
        }
    }

    app.engine.stop();
    Ok(())
}
