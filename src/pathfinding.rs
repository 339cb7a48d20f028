//! Pathfinding algorithm module.
//!
//! This module contains the A* search that routes between two cells of a [`Grid`]. Moves are the
//! four orthogonal single-cell steps, and both the step cost and the heuristic are the Manhattan
//! distance between pixel positions, which keeps the heuristic consistent so the first time the
//! target leaves the frontier its cost is final.

use std::{
    cmp::Reverse,
    collections::{hash_map::Entry, BinaryHeap, HashMap, HashSet},
};

use color_eyre::eyre::Result;
use tracing::debug;

use crate::grid::{Cell, CellKey, Grid};

/// Manhattan distance between the pixel positions of two cells.
///
/// This is both the cost of a step and the estimate of the remaining cost to the target.
#[must_use]
pub const fn manhattan(from: &Cell, to: &Cell) -> u64 {
    from.x()
        .abs_diff(to.x())
        .saturating_add(from.y().abs_diff(to.y()))
}

/// Strategy used to pick the next frontier cell.
///
/// Both strategies pop cells in exactly the same order: lowest estimated total cost first, and
/// among equals the cell that joined the frontier earliest. They differ only in running time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Frontier {
    /// Scan the whole frontier for its minimum on every pop.
    ///
    /// Quadratic in the number of visited cells, with no extra memory beyond the frontier list.
    #[default]
    LinearScan,
    /// Keep the frontier in a binary heap with lazy deletion of stale entries.
    BinaryHeap,
}

/// A* pathfinder over a borrowed grid.
///
/// The pathfinder never takes ownership of the grid and never mutates it. Every call to
/// [`find_path`](PathFinder::find_path) allocates its own bookkeeping, so one grid can serve any
/// number of searches, sequentially or from several threads.
#[derive(Clone, Copy, Debug)]
pub struct PathFinder<'grid> {
    /// Grid the searches run over.
    grid: &'grid Grid,
    /// Frontier strategy used by each search.
    frontier: Frontier,
}

impl<'grid> PathFinder<'grid> {
    /// Creates a pathfinder over `grid` using the default frontier strategy.
    #[must_use]
    pub const fn new(grid: &'grid Grid) -> Self {
        Self {
            grid,
            frontier: Frontier::LinearScan,
        }
    }

    /// Replaces the frontier strategy.
    #[must_use]
    pub const fn with_frontier(self, frontier: Frontier) -> Self {
        Self { frontier, ..self }
    }

    /// Finds a shortest route from `start` to `target`.
    ///
    /// The returned cells run from `target` back to `start`, both included, so a caller wanting
    /// forward order reverses it and a caller wanting only the interior drops the first and last
    /// cell. When `start` and `target` are the same cell the route is that single cell. An empty
    /// route means the target cannot be reached through open cells.
    ///
    /// Endpoints are matched by coordinates only. Their blocked flag is not consulted: the start is
    /// always expanded, while a blocked target can never be stepped onto and so is only reached
    /// when it is the start itself.
    ///
    /// # Errors
    ///
    /// This function returns an error if `start` or `target` lies outside the grid.
    pub fn find_path(&self, start: &Cell, target: &Cell) -> Result<Vec<Cell>> {
        let start = self.grid.require(start.key(), "start")?;
        let target = self.grid.require(target.key(), "target")?;

        debug!(
            start = %start.key(),
            target = %target.key(),
            frontier = ?self.frontier,
            "starting search"
        );

        let mut search = Search::new(self.frontier);
        search.seed(start, manhattan(start, target));

        while let Some(current_key) = search.pop() {
            let current = self.grid.require(current_key, "frontier")?;

            if current_key == target.key() {
                let path = search.reconstruct(current);
                debug!(
                    expanded = search.closed.len(),
                    length = path.len(),
                    "route found"
                );
                return Ok(path);
            }

            let _ = search.closed.insert(current_key);

            let Some(current_g) = search.g_score(current_key) else {
                continue;
            };
            for neighbor in self.grid.open_neighbors(current) {
                let neighbor_key = neighbor.key();
                if search.closed.contains(&neighbor_key) {
                    continue;
                }

                let tentative_g = current_g.saturating_add(manhattan(current, neighbor));
                if search
                    .g_score(neighbor_key)
                    .is_some_and(|known_g| tentative_g >= known_g)
                {
                    continue;
                }

                let f_score = tentative_g.saturating_add(manhattan(neighbor, target));
                let _ = search.came_from.insert(neighbor_key, *current);
                let _ = search.g_scores.insert(neighbor_key, tentative_g);
                let _ = search.f_scores.insert(neighbor_key, f_score);
                search.open.insert(neighbor_key);
                search.open.prioritize(neighbor_key, f_score);
            }
        }

        debug!(expanded = search.closed.len(), "frontier exhausted");

        Ok(Vec::new())
    }
}

/// Finds a shortest route from `start` to `target` with the default frontier strategy.
///
/// See [`PathFinder::find_path`] for the shape of the result.
///
/// # Errors
///
/// This function returns an error if `start` or `target` lies outside the grid.
pub fn find_path(grid: &Grid, start: &Cell, target: &Cell) -> Result<Vec<Cell>> {
    PathFinder::new(grid).find_path(start, target)
}

/// Per-call search bookkeeping.
///
/// Nothing in here outlives a single [`PathFinder::find_path`] call.
struct Search {
    /// Cells discovered but not yet finalized.
    open: OpenSet,
    /// Cells whose cost is settled.
    closed: HashSet<CellKey>,
    /// Predecessor of each reached cell on its best known route.
    came_from: HashMap<CellKey, Cell>,
    /// Best known cost from the start.
    g_scores: HashMap<CellKey, u64>,
    /// Best known cost plus the estimate to the target.
    f_scores: HashMap<CellKey, u64>,
}

impl Search {
    /// Creates empty bookkeeping for the given frontier strategy.
    fn new(frontier: Frontier) -> Self {
        Self {
            open: OpenSet::new(frontier),
            closed: HashSet::new(),
            came_from: HashMap::new(),
            g_scores: HashMap::new(),
            f_scores: HashMap::new(),
        }
    }

    /// Puts the start cell on the frontier with zero cost.
    fn seed(&mut self, start: &Cell, estimate: u64) {
        let key = start.key();
        let _ = self.g_scores.insert(key, 0);
        let _ = self.f_scores.insert(key, estimate);
        self.open.insert(key);
        self.open.prioritize(key, estimate);
    }

    /// Best known cost to `key`, if it has been reached.
    fn g_score(&self, key: CellKey) -> Option<u64> {
        self.g_scores.get(&key).copied()
    }

    /// Removes and returns the frontier cell with the lowest total estimate.
    fn pop(&mut self) -> Option<CellKey> {
        self.open.pop_min(&self.f_scores)
    }

    /// Walks the predecessor links from `current` back to the start.
    fn reconstruct(&self, current: &Cell) -> Vec<Cell> {
        let mut path = vec![*current];
        let mut key = current.key();
        while let Some(previous) = self.came_from.get(&key) {
            path.push(*previous);
            key = previous.key();
        }
        path
    }
}

/// Frontier container backing a search.
enum OpenSet {
    /// Members in the order they joined, scanned on every pop.
    Scan(Vec<CellKey>),
    /// Heap of `(f, sequence, key)` entries plus the live members and their join sequence.
    Heap {
        /// Pending entries, possibly stale.
        entries: BinaryHeap<Reverse<(u64, u64, CellKey)>>,
        /// Live members mapped to the sequence number they joined with.
        members: HashMap<CellKey, u64>,
        /// Sequence number handed to the next new member.
        next_sequence: u64,
    },
}

impl OpenSet {
    /// Creates an empty frontier of the requested kind.
    fn new(frontier: Frontier) -> Self {
        match frontier {
            Frontier::LinearScan => Self::Scan(Vec::new()),
            Frontier::BinaryHeap => Self::Heap {
                entries: BinaryHeap::new(),
                members: HashMap::new(),
                next_sequence: 0,
            },
        }
    }

    /// Adds `key` to the frontier; adding an existing member changes nothing.
    fn insert(&mut self, key: CellKey) {
        match self {
            Self::Scan(members) => {
                if !members.contains(&key) {
                    members.push(key);
                }
            }
            Self::Heap {
                members,
                next_sequence,
                ..
            } => {
                if let Entry::Vacant(entry) = members.entry(key) {
                    let _ = entry.insert(*next_sequence);
                    *next_sequence += 1;
                }
            }
        }
    }

    /// Records a new, lower total estimate for the member `key`.
    fn prioritize(&mut self, key: CellKey, f_score: u64) {
        if let Self::Heap {
            entries, members, ..
        } = self
        {
            if let Some(sequence) = members.get(&key) {
                entries.push(Reverse((f_score, *sequence, key)));
            }
        }
    }

    /// Removes and returns the member with the lowest `f_scores` entry.
    ///
    /// Ties go to the member that joined first. Every member has a score, since cells only join
    /// once their cost is known.
    fn pop_min(&mut self, f_scores: &HashMap<CellKey, u64>) -> Option<CellKey> {
        let f_score = |key: &CellKey| f_scores.get(key).copied();

        match self {
            Self::Scan(members) => {
                let mut best: Option<(usize, u64)> = None;
                for (idx, key) in members.iter().enumerate() {
                    let Some(score) = f_score(key) else {
                        continue;
                    };
                    if best.is_none_or(|(_, best_score)| score < best_score) {
                        best = Some((idx, score));
                    }
                }
                best.map(|(idx, _)| members.remove(idx))
            }
            Self::Heap {
                entries, members, ..
            } => {
                while let Some(Reverse((score, sequence, key))) = entries.pop() {
                    let live =
                        members.get(&key) == Some(&sequence) && f_score(&key) == Some(score);
                    if live {
                        let _ = members.remove(&key);
                        return Some(key);
                    }
                }
                None
            }
        }
    }
}
