use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Dispatch a terminal event
pub fn handle_event(app: &mut App, event: Event, now: Instant) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key, now),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::FocusGained => {
            app.engine.on_foreground(now);
        }
        // Resize redraws on the next iteration
        _ => {}
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent, now: Instant) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        KeyCode::Char('1') => app.set_view(View::Overview),
        KeyCode::Char('2') => app.set_view(View::Sleep),
        KeyCode::Char('3') => app.set_view(View::Devices),

        KeyCode::Char('r') => app.refresh(false, now),
        KeyCode::Char('R') => app.refresh(true, now),
        KeyCode::Char('e') => app.export(now),
        KeyCode::Char('w') => app.scan_wearables(now),
        KeyCode::Char('x') | KeyCode::Esc => app.dismiss_notification(now),

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.prev_view(),
        MouseEventKind::ScrollDown => app.next_view(),

        // Tab clicks (row 1, after header)
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            // Tabs render as " n:Label " separated by "|"
            let mut start = 0u16;
            for (i, view) in View::ALL.iter().enumerate() {
                let width = format!(" {}:{} ", i + 1, view.label()).len() as u16;
                if mouse.column < start + width {
                    app.set_view(*view);
                    return;
                }
                start += width + 1;
            }
        }

        _ => {}
    }
}
