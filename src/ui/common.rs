//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::{format_duration, format_since};
use crate::ui::Slot;

/// Render the header bar with the health score and data source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(" PULSEWATCH ", Style::default().add_modifier(Modifier::BOLD));

    let Some(score) = app.board.get(Slot::Score).filter(|_| app.board.is_populated()) else {
        let line = Line::from(vec![title, Span::raw("| Loading...")]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(score.status)),
        title,
        Span::raw("│ Score "),
        Span::styled(
            score.text.clone(),
            app.theme.status_style(score.status).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", score.badge.as_deref().unwrap_or(""))),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
    ];

    if app.engine.is_degraded() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "[OFFLINE: sample data]",
            Style::default().fg(app.theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    if let Some(profile) = &app.profile {
        spans.push(Span::raw(format!(" │ {}", profile.display_initials())));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| Line::from(format!(" {}:{} ", i + 1, v.label())))
        .collect();

    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the newest notification if there is one, otherwise the time since
/// the last update and the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect, now: Instant) {
    if let Some(n) = app.engine.notifications().latest(now) {
        let paragraph = Paragraph::new(format!(" [{}] {}  (x:dismiss)", n.severity.label(), n.message))
            .style(app.theme.severity_style(n.severity));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "r:refresh R:force e:export w:scan Tab:switch ?:help q:quit";
    let status = match app.engine.snapshot() {
        Some(snapshot) => {
            let age = format_since(snapshot.age(app.engine.clock().now()));
            let busy = if app.engine.scheduler().is_busy() { " (refreshing)" } else { "" };
            let every = format_duration(app.engine.scheduler().interval());
            format!(
                " {} | Updated {} (every {}){} | {}",
                app.current_view.label(),
                age,
                every,
                busy,
                controls
            )
        }
        None => " Loading... | q:quit".to_string(),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(" Navigation", bold)]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab         Next view"),
        Line::from("  1-3         Jump to view"),
        Line::from(""),
        Line::from(vec![Span::styled(" Data", bold)]),
        Line::from("  r         Refresh"),
        Line::from("  R         Force refresh"),
        Line::from("  e         Export CSV"),
        Line::from("  w         Scan for wearables"),
        Line::from("  x         Dismiss notification"),
        Line::from(""),
        Line::from(vec![Span::styled(" General", bold)]),
        Line::from("  ?         Toggle help"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 22u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
