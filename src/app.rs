//! Core application state and logic for the pathfinding front end.

use std::io;

use color_eyre::eyre::{ensure, Result};
use rand::{rngs::StdRng, SeedableRng as _};
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::{
    config::Config,
    events, file_loader, generator,
    grid::{CellKey, Grid},
    pathfinding::PathFinder,
    types::{Direction, Selection},
    ui,
};

/// Application state container for the pathfinding front end.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the grid and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit but it starts off `false`.
    pub(crate) exit: bool,
    /// Configuration the application was started with.
    pub(crate) config: Config,
    /// Random source for grid generation.
    ///
    /// Seeded from the configuration when a seed is given, from the operating system otherwise.
    pub(crate) rng: StdRng,
    /// Grid currently on screen.
    ///
    /// The grid is only ever replaced as a whole, never modified in place, so every search runs
    /// over a grid that stays the same for its whole duration.
    pub(crate) grid: Grid,
    /// Cell under the user's cursor.
    pub(crate) cursor: CellKey,
    /// Endpoints picked so far and the route between them.
    pub(crate) selection: Selection,
}

impl App {
    /// Creates the application, building the first grid from the configuration.
    ///
    /// # Errors
    ///
    /// This function returns an error if the grid cannot be generated or loaded, or if it holds no
    /// cells.
    pub fn new(config: Config) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let grid = build_grid(&config, &mut rng)?;

        Self::with_grid(config, rng, grid)
    }

    /// Creates the application around an existing grid.
    ///
    /// # Errors
    ///
    /// This function returns an error if the grid holds no cells.
    pub(crate) fn with_grid(config: Config, rng: StdRng, grid: Grid) -> Result<Self> {
        ensure!(
            !grid.is_empty(),
            "the field is smaller than a single {}-pixel cell",
            config.unit
        );

        Ok(Self {
            exit: false,
            config,
            rng,
            grid,
            cursor: CellKey::default(),
            selection: Selection::Empty,
        })
    }

    /// Creates an application over a hand-made unit grid for tests.
    #[cfg(test)]
    pub(crate) fn from_layout(layout: &str) -> Self {
        let grid = Grid::from_layout(1, layout).expect("test layout should be valid");
        Self::with_grid(Config::default(), StdRng::seed_from_u64(1), grid)
            .expect("test grid should not be empty")
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(io::Error::other))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Moves the cursor one cell, stopping at the grid's edges.
    pub(crate) fn move_cursor(&mut self, direction: Direction) {
        self.cursor = direction.step(self.cursor, self.grid.col_count(), self.grid.row_count());
    }

    /// Picks the cell under the cursor as the next endpoint.
    ///
    /// Blocked cells are ignored. Picking a target runs the search straight away; picking again
    /// after a finished route starts a new selection from the cursor.
    ///
    /// # Errors
    ///
    /// This function returns an error if the cursor or the stored start lies outside the grid.
    pub(crate) fn select(&mut self) -> Result<()> {
        let cursor = self.grid.require(self.cursor, "cursor")?;
        if cursor.is_blocked() {
            debug!(cell = %cursor.key(), "ignored selection of a blocked cell");
            return Ok(());
        }

        let next = match &self.selection {
            Selection::Start(start) => {
                let start_cell = self.grid.require(*start, "start")?;
                let path = PathFinder::new(&self.grid)
                    .with_frontier(self.config.frontier)
                    .find_path(start_cell, cursor)?;

                info!(
                    start = %start,
                    target = %cursor.key(),
                    cells = path.len(),
                    "route computed"
                );

                Selection::Route {
                    start: *start,
                    target: cursor.key(),
                    path,
                }
            }
            Selection::Empty | Selection::Route { .. } => Selection::Start(cursor.key()),
        };
        self.selection = next;

        Ok(())
    }

    /// Forgets the picked endpoints and any route.
    pub(crate) fn clear_selection(&mut self) {
        self.selection = Selection::Empty;
    }

    /// Replaces the grid with a freshly generated or reloaded one.
    ///
    /// The selection is cleared and the cursor clamped to the new grid.
    ///
    /// # Errors
    ///
    /// This function returns an error if the new grid cannot be built or holds no cells.
    pub(crate) fn regenerate(&mut self) -> Result<()> {
        let grid = build_grid(&self.config, &mut self.rng)?;
        ensure!(!grid.is_empty(), "regenerated grid holds no cells");

        self.cursor = CellKey::new(
            self.cursor.col.min(grid.col_count().saturating_sub(1)),
            self.cursor.row.min(grid.row_count().saturating_sub(1)),
        );
        self.grid = grid;
        self.clear_selection();

        Ok(())
    }

    /// Describes the selection state for the status bar.
    pub(crate) fn status(&self) -> String {
        match &self.selection {
            Selection::Empty => "select a start cell".to_owned(),
            Selection::Start(start) => format!("start {start}, select a target"),
            Selection::Route {
                start,
                target,
                path,
            } => match path.len().checked_sub(1) {
                Some(steps) => format!("{steps} steps from {start} to {target}"),
                None => format!("no route from {start} to {target}"),
            },
        }
    }
}

/// Builds a grid from the configured layout file, or generates a random one.
fn build_grid(config: &Config, rng: &mut StdRng) -> Result<Grid> {
    match &config.layout {
        Some(path) => file_loader::load_layout(path, config.unit),
        None => generator::generate(config.dimensions(), config.block_probability, rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_seed_is_reproducible() {
        let config = Config {
            seed: Some(99),
            ..Config::default()
        };

        let first = App::new(config.clone()).expect("generation should succeed");
        let second = App::new(config).expect("generation should succeed");

        assert_eq!(first.grid, second.grid, "same seed should give the same grid");
        assert_eq!(first.grid.col_count(), 40, "800 pixels over 20-pixel cells");
        assert_eq!(first.grid.row_count(), 30, "600 pixels over 20-pixel cells");
    }

    #[test]
    fn test_new_rejects_tiny_field() {
        let config = Config {
            width: 10,
            ..Config::default()
        };

        assert!(
            App::new(config).is_err(),
            "a field narrower than one cell should fail"
        );
    }

    #[test]
    fn test_select_start_then_target() {
        let mut app = App::from_layout("...\n...\n...");

        app.select().expect("cursor is in the grid");
        assert_eq!(
            app.selection,
            Selection::Start(CellKey::new(0, 0)),
            "first pick should be the start"
        );

        app.move_cursor(Direction::Right);
        app.move_cursor(Direction::Right);
        app.move_cursor(Direction::Down);
        app.select().expect("cursor is in the grid");

        assert_eq!(
            app.selection.target(),
            Some(CellKey::new(2, 1)),
            "second pick should be the target"
        );
        assert_eq!(app.selection.interior().len(), 2, "two cells between the endpoints");
        assert_eq!(app.status(), "3 steps from 0:0 to 2:1", "status should count steps");
    }

    #[test]
    fn test_select_ignores_blocked_cells() {
        let mut app = App::from_layout("#..");

        app.select().expect("cursor is in the grid");

        assert_eq!(app.selection, Selection::Empty, "blocked cell cannot be picked");
    }

    #[test]
    fn test_select_unreachable_target() {
        let mut app = App::from_layout(".#.");

        app.select().expect("cursor is in the grid");
        app.move_cursor(Direction::Right);
        app.move_cursor(Direction::Right);
        app.select().expect("cursor is in the grid");

        assert_eq!(app.status(), "no route from 0:0 to 2:0", "status should report no route");
    }

    #[test]
    fn test_third_selection_starts_over() {
        let mut app = App::from_layout("...");

        app.select().expect("cursor is in the grid");
        app.move_cursor(Direction::Right);
        app.select().expect("cursor is in the grid");
        app.move_cursor(Direction::Right);
        app.select().expect("cursor is in the grid");

        assert_eq!(
            app.selection,
            Selection::Start(CellKey::new(2, 0)),
            "a finished route should be replaced by a new start"
        );
    }

    #[test]
    fn test_regenerate_clears_selection_and_clamps_cursor() {
        let mut app = App::from_layout("....\n....");
        app.config.width = 40;
        app.config.height = 20;
        app.config.unit = 20;
        app.cursor = CellKey::new(3, 1);
        app.select().expect("cursor is in the grid");

        app.regenerate().expect("generation should succeed");

        assert_eq!(app.selection, Selection::Empty, "selection should be cleared");
        assert_eq!(app.cursor, CellKey::new(1, 0), "cursor should be clamped");
        assert_eq!(app.grid.col_count(), 2, "new grid follows the configuration");
    }
}
