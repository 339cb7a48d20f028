//! User interface rendering for the grid screen.

use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Color, Style},
    symbols::Marker,
    text::Line,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame,
};

use crate::{
    grid::{Cell, CellKey},
    App,
};

/// Key help shown in the footer.
const KEY_HELP: &str = "(hjkl) move / (space) select / (c) clear / (r) new grid / (q) quit";

/// Updates the application UI based on the persistent state.
///
/// This function draws the grid with the selected endpoints, the route between them and the
/// cursor, followed by a footer with key help and the selection status.
///
/// # Errors
///
/// This function may return errors from data conversion failures on grids too large to draw.
pub(crate) fn draw(app: &App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let columns = u16::try_from(app.grid.col_count())?;
    let rows = u16::try_from(app.grid.row_count())?;

    let [content_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(frame.area());
    let [grid_row] = Layout::vertical([Constraint::Length(rows)])
        .flex(Flex::Center)
        .areas(content_area);
    let [grid_area] = Layout::horizontal([Constraint::Length(columns)])
        .flex(Flex::Center)
        .areas(grid_row);

    // Pre-compute canvas coordinates so the paint closure stays infallible
    let (blocked, open): (Vec<&Cell>, Vec<&Cell>) =
        app.grid.cells().partition(|cell| cell.is_blocked());
    let blocked_coords = to_canvas_coords(blocked.iter().map(|cell| cell.key()), columns, rows);
    let open_coords = to_canvas_coords(open.iter().map(|cell| cell.key()), columns, rows);
    let route_coords = to_canvas_coords(
        app.selection.interior().iter().map(Cell::key),
        columns,
        rows,
    );
    let endpoint_coords = to_canvas_coords(
        app.selection
            .start()
            .into_iter()
            .chain(app.selection.target()),
        columns,
        rows,
    );
    let cursor_coords = to_canvas_coords([app.cursor].into_iter(), columns, rows);

    // A single row or column still needs a non-empty span to be painted
    let x_bound = (f64::from(columns) - 1.).max(1.) / 2.;
    let y_bound = (f64::from(rows) - 1.).max(1.) / 2.;
    let canvas = Canvas::default()
        .x_bounds([-x_bound, x_bound])
        .y_bounds([-y_bound, y_bound])
        .marker(Marker::Block)
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &open_coords,
                color: Color::DarkGray,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &blocked_coords,
                color: Color::Green,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &route_coords,
                color: Color::Red,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &endpoint_coords,
                color: Color::Yellow,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &cursor_coords,
                color: Color::White,
            });
        });

    frame.render_widget(canvas, grid_area);

    let footer = Block::bordered()
        .title(KEY_HELP)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    let status_area = footer.inner(footer_area);

    frame.render_widget(footer, footer_area);
    frame.render_widget(Line::raw(status_line(app)?).centered(), status_area);

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Builds the footer text: selection status, grid size and share of blocked cells.
///
/// # Errors
///
/// This function may return errors if the cell counts do not fit the percentage arithmetic.
pub(crate) fn status_line(app: &App) -> Result<String> {
    let total = i32::try_from(app.grid.cells().count())?;
    let blocked = i32::try_from(app.grid.cells().filter(|cell| cell.is_blocked()).count())?;
    let blocked_percent = if total == 0 {
        0
    } else {
        rounded_div::i32(blocked.saturating_mul(100), total)
    };

    Ok(format!(
        "{} | {}x{} cells, {blocked_percent}% blocked | cursor {}",
        app.status(),
        app.grid.col_count(),
        app.grid.row_count(),
        app.cursor
    ))
}

/// Transforms grid coordinates to canvas coordinates centred on the origin.
///
/// This function converts grid coordinates (col, row) to canvas coordinates (x, y) using the
/// standard transformation formulas: coordinate[i] = i - (n - 1) / 2 for columns and
/// coordinate[i] = (n - 1) / 2 - i for rows, so row zero ends up at the top.
pub(crate) fn to_canvas_coords<I>(keys: I, columns: u16, rows: u16) -> Vec<(f64, f64)>
where
    I: Iterator<Item = CellKey>,
{
    let cols_n = f64::from(columns);
    let rows_n = f64::from(rows);

    keys.map(|key| {
        let screen_x = f64::from(key.col) - (cols_n - 1.) / 2.;
        let screen_y = (rows_n - 1.) / 2. - f64::from(key.row);
        (screen_x, screen_y)
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, buffer::Buffer, symbols, Terminal};

    use super::*;
    use crate::types::Direction;

    /// Creates a test terminal with known dimensions for UI testing.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Concatenates every symbol of a buffer into one string.
    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    /// Counts full-block cells drawn in `color`.
    fn count_blocks(buffer: &Buffer, color: Color) -> usize {
        buffer
            .content()
            .iter()
            .filter(|cell| cell.symbol() == symbols::block::FULL && cell.fg == color)
            .count()
    }

    #[test]
    fn test_draw_fresh_grid() {
        let app = App::from_layout(".#.\n...\n..#");
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing the grid should succeed");
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("select a start cell"), "status should prompt for a start");
        assert!(text.contains("(q) quit"), "footer should list the keys");
        assert_eq!(
            count_blocks(terminal.backend().buffer(), Color::Green),
            2,
            "both blocked cells should be drawn"
        );
    }

    #[test]
    fn test_draw_route_highlights_interior() {
        let mut app = App::from_layout(".....");
        app.select().expect("cursor is in the grid");
        for _ in 0..4 {
            app.move_cursor(Direction::Right);
        }
        app.select().expect("cursor is in the grid");
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("drawing should succeed in test");
        });

        assert!(result.is_ok(), "drawing the route should succeed");
        let buffer = terminal.backend().buffer();
        assert_eq!(
            count_blocks(buffer, Color::Red),
            3,
            "only the interior of the route should be red"
        );
        assert_eq!(
            count_blocks(buffer, Color::Yellow),
            1,
            "the start is yellow, the target sits under the cursor"
        );
        assert!(
            buffer_text(buffer).contains("4 steps from 0:0 to 4:0"),
            "status should describe the route"
        );
    }

    #[test]
    fn test_draw_grid_larger_than_terminal() {
        let app = App::from_layout(&".".repeat(200));
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            draw(&app, frame).expect("oversized grids should still draw");
        });

        assert!(result.is_ok(), "drawing should succeed on a small terminal");
    }

    #[test]
    fn test_clear_function() {
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            clear(frame);
        });

        assert!(result.is_ok(), "clearing screen should succeed");
    }

    #[test]
    fn test_status_line_reports_blocked_share() {
        let app = App::from_layout("#..\n...\n..#");

        let status = status_line(&app).expect("counts are small");

        assert_eq!(
            status, "select a start cell | 3x3 cells, 22% blocked | cursor 0:0",
            "two of nine cells round to 22 percent"
        );
    }

    #[test]
    fn test_to_canvas_coords_centres_grid() {
        let coords = to_canvas_coords(
            [CellKey::new(0, 0), CellKey::new(1, 1), CellKey::new(2, 2)].into_iter(),
            3,
            3,
        );

        assert_eq!(
            coords,
            vec![(-1.0, 1.0), (0.0, 0.0), (1.0, -1.0)],
            "corners should map to opposite quadrants with row zero on top"
        );
    }
}
