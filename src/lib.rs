//! Grid pathfinding with A* and a terminal front end to drive it.
//!
//! The core of this crate is [`PathFinder`], which routes between two cells of a read-only
//! [`Grid`] using four orthogonal unit steps, with Manhattan distance as both step cost and
//! heuristic. Everything else serves it: [`generate`] builds random grids, [`Config`] reads the
//! command line, [`init_logging`] sets up file logging and [`App`] is the terminal program that
//! lets a user pick endpoints and see the route.
//!
//! Routes come back target first and start last, and an empty route means the target cannot be
//! reached. Only endpoints outside the grid are errors.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
mod config;
mod events;
mod file_loader;
mod generator;
mod grid;
mod logging;
mod pathfinding;
mod types;
mod ui;

pub use app::App;
pub use config::Config;
pub use generator::generate;
pub use grid::{Cell, CellKey, Dimensions, Grid};
pub use logging::init as init_logging;
pub use pathfinding::{find_path, manhattan, Frontier, PathFinder};
