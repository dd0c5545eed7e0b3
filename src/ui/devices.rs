//! Device list rendering.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::ui::Slot;

/// Render the devices inferred from the current snapshot.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Devices ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let rows = app.board.get(Slot::Devices).map(|b| b.rows.as_slice()).unwrap_or(&[]);
    if rows.is_empty() {
        frame.render_widget(Paragraph::new("No devices reporting").block(block), area);
        return;
    }

    let header = Row::new(vec!["Device", "Status", "Battery", "Last Sync", "Latest"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = rows
        .iter()
        .map(|row| {
            Row::new(row.cells.iter().enumerate().map(|(i, cell)| {
                // Status column
                if i == 1 {
                    Cell::from(cell.clone()).style(app.theme.status_style(row.status))
                } else {
                    Cell::from(cell.clone())
                }
            }))
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Fill(1),
    ];

    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
}
