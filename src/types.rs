//! Type definitions and enums for the application state and navigation.

use crate::grid::{Cell, CellKey};

/// Progress of the user's endpoint selection.
///
/// The first selected cell becomes the start, the second the target. Picking the target runs the
/// search and stores its result alongside both endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Nothing has been picked yet.
    #[default]
    Empty,
    /// Only the start has been picked.
    Start(CellKey),
    /// Both endpoints are picked and the search has run.
    Route {
        /// Cell the route leaves from.
        start: CellKey,
        /// Cell the route arrives at.
        target: CellKey,
        /// Search result, target first and start last, empty when unreachable.
        path: Vec<Cell>,
    },
}

impl Selection {
    /// Returns the selected start cell, if any.
    pub(crate) const fn start(&self) -> Option<CellKey> {
        match self {
            Self::Empty => None,
            Self::Start(start) | Self::Route { start, .. } => Some(*start),
        }
    }

    /// Returns the selected target cell, if any.
    pub(crate) const fn target(&self) -> Option<CellKey> {
        match self {
            Self::Route { target, .. } => Some(*target),
            Self::Empty | Self::Start(_) => None,
        }
    }

    /// Returns the route cells strictly between the endpoints.
    ///
    /// This is what gets highlighted: the search result minus its first and last cell.
    pub(crate) fn interior(&self) -> &[Cell] {
        match self {
            Self::Route { path, .. } => path
                .get(1..path.len().saturating_sub(1))
                .unwrap_or_default(),
            Self::Empty | Self::Start(_) => &[],
        }
    }
}

/// Direction the cursor moves in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

impl Direction {
    /// Moves `key` one step in this direction, staying within `cols` by `rows` cells.
    pub(crate) const fn step(self, key: CellKey, cols: u32, rows: u32) -> CellKey {
        let CellKey { col, row } = key;
        match self {
            Self::Up => CellKey::new(col, row.saturating_sub(1)),
            Self::Down if row.saturating_add(1) < rows => CellKey::new(col, row + 1),
            Self::Left => CellKey::new(col.saturating_sub(1), row),
            Self::Right if col.saturating_add(1) < cols => CellKey::new(col + 1, row),
            Self::Down | Self::Right => key,
        }
    }
}
