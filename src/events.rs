//! Event handling functions for user input and application state updates.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{types::Direction, App};

/// Time to wait for input before handing control back to the main loop.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. It uses a
/// timeout to avoid blocking the UI.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_TIMEOUT)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key.code)?;
            }
        }
    }

    Ok(())
}

/// Applies a single key press to the application state.
///
/// `h`, `j`, `k` and `l` or the arrow keys move the cursor, space and enter pick the cell under
/// the cursor, `c` clears the selection, `r` rebuilds the grid and `q` quits.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.exit = true,
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(Direction::Up),
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(Direction::Down),
        KeyCode::Char('h') | KeyCode::Left => app.move_cursor(Direction::Left),
        KeyCode::Char('l') | KeyCode::Right => app.move_cursor(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Enter => app.select()?,
        KeyCode::Char('c') => app.clear_selection(),
        KeyCode::Char('r') => app.regenerate()?,
        _ => {}
    }

    Ok(())
}
