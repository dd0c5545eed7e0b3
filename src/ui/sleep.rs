//! Sleep chart rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::Slot;

/// Render the bound sleep chart: hours per night with efficiency labels.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Sleep (last 7 nights) ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let points = app.board.chart();
    if points.is_empty() {
        let msg = Paragraph::new("No sleep data").block(block);
        frame.render_widget(msg, area);
        return;
    }

    let chunks = Layout::vertical([Constraint::Min(6), Constraint::Length(1)]).split(area);

    // Bars are in tenths of an hour so 7.5h and 7.0h differ.
    let bars: Vec<Bar> = points
        .iter()
        .map(|p| {
            Bar::default()
                .value((p.hours * 10.0).round().max(0.0) as u64)
                .text_value(format!("{:.1}h", p.hours))
                .label(Line::from(p.label.clone()))
                .style(Style::default().fg(app.theme.chart))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(2)
        .max(120);

    frame.render_widget(chart, chunks[0]);

    let summary = [Slot::Sleep, Slot::SleepEfficiency]
        .iter()
        .filter_map(|s| app.board.get(*s).map(|b| format!("{}: {}", s.label(), b.text)))
        .collect::<Vec<_>>()
        .join("  │  ");
    let efficiencies = points
        .iter()
        .map(|p| format!("{:.0}%", p.efficiency_pct))
        .collect::<Vec<_>>()
        .join(" ");
    frame.render_widget(
        Paragraph::new(format!(" {}  │  efficiency {}", summary, efficiencies))
            .style(Style::default().add_modifier(Modifier::DIM)),
        chunks[1],
    );
}
