//! Overview rendering.
//!
//! Displays the metric table with status badges, trend glyphs and
//! sparklines, with the recommendation list below it.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::Direction;
use crate::ui::Slot;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Overview view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.board.is_populated() {
        return;
    }

    let recommendations = app
        .board
        .get(Slot::Recommendations)
        .map(|b| b.rows.len())
        .unwrap_or(0) as u16;
    let chunks = Layout::vertical([
        Constraint::Min(Slot::METRICS.len() as u16 + 3),
        Constraint::Length(recommendations + 2),
    ])
    .split(area);

    render_metrics(frame, app, chunks[0]);
    render_recommendations(frame, app, chunks[1]);
}

fn render_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Metric", "Value", "Status", "Trend", "History"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = Slot::METRICS
        .iter()
        .filter_map(|slot| app.board.get(*slot).map(|b| (slot, b)))
        .map(|(slot, binding)| {
            let trend = match binding.trend {
                Some(t) => {
                    let style = match t.direction {
                        Direction::Flat => Style::default(),
                        _ => Style::default().fg(app.theme.highlight),
                    };
                    Cell::from(t.to_string()).style(style)
                }
                None => Cell::from("-"),
            };

            let sparkline = slot
                .metric()
                .map(|m| render_sparkline(&app.engine.history().sparkline(m)))
                .unwrap_or_default();

            Row::new(vec![
                Cell::from(slot.label()),
                Cell::from(binding.text.clone()),
                Cell::from(binding.badge.clone().unwrap_or_default())
                    .style(app.theme.status_style(binding.status)),
                trend,
                Cell::from(sparkline),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(8),
    ];

    let updated = app
        .board
        .get(Slot::LastUpdated)
        .map(|b| match &b.badge {
            Some(badge) => format!("updated {} ({})", b.text, badge),
            None => format!("updated {}", b.text),
        })
        .unwrap_or_default();

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Metrics [{}] ", updated))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn render_recommendations(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .board
        .get(Slot::Recommendations)
        .map(|b| {
            b.rows
                .iter()
                .map(|row| {
                    let icon = row.cells.first().cloned().unwrap_or_default();
                    let text = row.cells.get(1).cloned().unwrap_or_default();
                    ListItem::new(Line::from(vec![
                        Span::raw(format!(" {} ", icon)),
                        Span::raw(text),
                    ]))
                })
                .collect()
        })
        .unwrap_or_default();

    let list = List::new(items).block(
        Block::default()
            .title(" Recommendations ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    frame.render_widget(list, area);
}

fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return "        ".to_string();
    }

    // Take last 8 values
    let values: Vec<u8> = data.iter().rev().take(8).rev().copied().collect();

    values.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_keeps_last_eight() {
        assert_eq!(render_sparkline(&[]), "        ");
        assert_eq!(render_sparkline(&[0, 7]), "▁█");
        assert_eq!(render_sparkline(&[7, 0, 1, 2, 3, 4, 5, 6, 7]), "▁▂▃▄▅▆▇█");
    }
}
