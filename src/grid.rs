//! Grid data model module.
//!
//! This module contains the [`Cell`] record, its value identity [`CellKey`] and the read-only
//! [`Grid`] matrix the pathfinder searches. It also holds the text layout format used to describe
//! hand-made grids, where `#` marks a blocked cell and `.` an open one.

use std::fmt;

use color_eyre::eyre::{bail, eyre, Result};

/// Character marking a blocked cell in a text layout.
pub(crate) const BLOCKED_GLYPH: char = '#';

/// Character marking an open cell in a text layout.
pub(crate) const OPEN_GLYPH: char = '.';

/// Value identity of a cell.
///
/// Two cells are the same entity if and only if their column and row match, so this key is what
/// every set and map in the search is keyed by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    /// Column index of the cell.
    pub col: u32,
    /// Row index of the cell.
    pub row: u32,
}

impl CellKey {
    /// Builds a key from a column and a row.
    #[must_use]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.col, self.row)
    }
}

/// One unit of the grid.
///
/// A cell knows its grid coordinates, the pixel rectangle it covers and whether it is blocked. All
/// of it is fixed when the grid is built; nothing about a cell changes afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Column index within the grid.
    col: u32,
    /// Row index within the grid.
    row: u32,
    /// Horizontal pixel position of the top-left corner.
    x: u64,
    /// Vertical pixel position of the top-left corner.
    y: u64,
    /// Side length of the cell in pixels.
    size: u32,
    /// Whether the cell is impassable.
    blocked: bool,
}

impl Cell {
    /// Creates a cell at the given coordinates with pixel geometry derived from the unit size.
    ///
    /// Pixel positions are 64-bit, so every column and row index times any unit size is exact.
    #[must_use]
    pub fn new(col: u32, row: u32, unit: u32, blocked: bool) -> Self {
        Self {
            col,
            row,
            x: u64::from(col) * u64::from(unit),
            y: u64::from(row) * u64::from(unit),
            size: unit,
            blocked,
        }
    }

    /// Returns the value identity of this cell.
    #[must_use]
    pub const fn key(&self) -> CellKey {
        CellKey::new(self.col, self.row)
    }

    /// Column index within the grid.
    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// Row index within the grid.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Horizontal pixel position of the top-left corner.
    #[must_use]
    pub const fn x(&self) -> u64 {
        self.x
    }

    /// Vertical pixel position of the top-left corner.
    #[must_use]
    pub const fn y(&self) -> u64 {
        self.y
    }

    /// Width of the cell in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size
    }

    /// Height of the cell in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size
    }

    /// Whether the cell is impassable.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Returns `true` when `other` sits exactly one step away along a single axis.
    #[must_use]
    pub const fn is_adjacent(&self, other: &Self) -> bool {
        self.col
            .abs_diff(other.col)
            .saturating_add(self.row.abs_diff(other.row))
            == 1
    }
}

/// Pixel size of the field and of a single cell.
///
/// The grid holds `width / unit` columns and `height / unit` rows, rounding down, so a trailing
/// strip narrower than a cell is simply left out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Total width of the field in pixels.
    pub width: u32,
    /// Total height of the field in pixels.
    pub height: u32,
    /// Side length of one cell in pixels.
    pub unit: u32,
}

impl Dimensions {
    /// Number of whole columns that fit into the field, zero for a zero unit.
    #[must_use]
    pub const fn col_count(&self) -> u32 {
        match self.width.checked_div(self.unit) {
            Some(count) => count,
            None => 0,
        }
    }

    /// Number of whole rows that fit into the field, zero for a zero unit.
    #[must_use]
    pub const fn row_count(&self) -> u32 {
        match self.height.checked_div(self.unit) {
            Some(count) => count,
            None => 0,
        }
    }
}

/// Rectangular, immutable matrix of cells indexed `[col][row]`.
///
/// Every cell's coordinates match its position in the matrix, and the matrix keeps the shape it
/// was built with for its whole life. There is no way to change a cell once the grid exists, which
/// is what lets searches borrow it freely.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Side length of one cell in pixels.
    unit: u32,
    /// Number of rows in every column.
    rows: u32,
    /// Cells stored column by column.
    columns: Vec<Vec<Cell>>,
}

impl Grid {
    /// Builds a grid of the given dimensions, asking `blocked` about every `(col, row)` pair.
    ///
    /// Cells are visited column by column, top to bottom, which is the order a random generator
    /// will draw its samples in.
    ///
    /// # Errors
    ///
    /// This function returns an error if the unit size is zero.
    pub fn from_fn<F>(dimensions: Dimensions, blocked: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self::with_counts(
            dimensions.unit,
            dimensions.col_count(),
            dimensions.row_count(),
            blocked,
        )
    }

    /// Builds a grid with an exact number of columns and rows.
    ///
    /// # Errors
    ///
    /// This function returns an error if the unit size is zero.
    fn with_counts<F>(unit: u32, cols: u32, rows: u32, mut blocked: F) -> Result<Self>
    where
        F: FnMut(u32, u32) -> bool,
    {
        if unit == 0 {
            bail!("cell unit size must be at least one pixel");
        }

        let columns = (0..cols)
            .map(|col| {
                (0..rows)
                    .map(|row| Cell::new(col, row, unit, blocked(col, row)))
                    .collect::<Vec<_>>()
            })
            .collect();

        Ok(Self {
            unit,
            rows,
            columns,
        })
    }

    /// Parses a text layout into a grid.
    ///
    /// Each line of the layout is a row and each character a cell: `#` is blocked, `.` is open.
    /// Whitespace around the whole text is ignored, so layouts can be written as indented string
    /// literals or files with a trailing newline.
    ///
    /// # Errors
    ///
    /// This function returns an error if:
    /// - The unit size is zero
    /// - The layout has no rows or a row has no cells
    /// - Rows differ in length
    /// - A character other than `#` or `.` appears
    pub fn from_layout(unit: u32, layout: &str) -> Result<Self> {
        let lines: Vec<&str> = layout.trim().lines().map(str::trim).collect();

        let Some(first_line) = lines.first() else {
            bail!("layout has no rows");
        };
        let expected_width = first_line.chars().count();
        if expected_width == 0 {
            bail!("layout has an empty first row");
        }

        let mut blocked_rows = Vec::with_capacity(lines.len());
        for (row_idx, line) in lines.iter().enumerate() {
            if line.chars().count() != expected_width {
                bail!(
                    "layout row {} has {} cells, expected {expected_width}",
                    row_idx + 1,
                    line.chars().count()
                );
            }

            let mut row = Vec::with_capacity(expected_width);
            for (col_idx, glyph) in line.chars().enumerate() {
                match glyph {
                    BLOCKED_GLYPH => row.push(true),
                    OPEN_GLYPH => row.push(false),
                    other => bail!(
                        "unexpected character {other:?} at row {}, column {}",
                        row_idx + 1,
                        col_idx + 1
                    ),
                }
            }
            blocked_rows.push(row);
        }

        let cols = u32::try_from(expected_width)?;
        let rows = u32::try_from(blocked_rows.len())?;

        Self::with_counts(unit, cols, rows, |col, row| {
            usize::try_from(row)
                .ok()
                .and_then(|row| blocked_rows.get(row))
                .and_then(|cells| usize::try_from(col).ok().and_then(|col| cells.get(col)))
                .copied()
                .unwrap_or(false)
        })
    }

    /// Side length of one cell in pixels.
    #[must_use]
    pub const fn unit(&self) -> u32 {
        self.unit
    }

    /// Number of columns.
    #[must_use]
    pub fn col_count(&self) -> u32 {
        u32::try_from(self.columns.len()).unwrap_or(u32::MAX)
    }

    /// Number of rows.
    #[must_use]
    pub const fn row_count(&self) -> u32 {
        self.rows
    }

    /// Returns `true` when the grid holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows == 0
    }

    /// Looks up the cell at `(col, row)`; out-of-range coordinates yield `None`.
    #[must_use]
    pub fn get(&self, col: u32, row: u32) -> Option<&Cell> {
        self.columns
            .get(usize::try_from(col).ok()?)?
            .get(usize::try_from(row).ok()?)
    }

    /// Looks up the cell identified by `key`.
    #[must_use]
    pub fn cell(&self, key: CellKey) -> Option<&Cell> {
        self.get(key.col, key.row)
    }

    /// Returns `true` when a cell with the same identity as `cell` is part of this grid.
    #[must_use]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cell(cell.key()).is_some()
    }

    /// Iterates over every cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.columns.iter().flatten()
    }

    /// Iterates over the open orthogonal neighbours of `cell`.
    ///
    /// Neighbours come in a fixed order: up, down, left, right. Cells outside the grid and blocked
    /// cells are skipped.
    pub fn open_neighbors(&self, cell: &Cell) -> impl Iterator<Item = &Cell> {
        let (col, row) = (cell.col(), cell.row());
        [
            row.checked_sub(1).map(|up| (col, up)),
            row.checked_add(1).map(|down| (col, down)),
            col.checked_sub(1).map(|left| (left, row)),
            col.checked_add(1).map(|right| (right, row)),
        ]
        .into_iter()
        .flatten()
        .filter_map(|(col, row)| self.get(col, row))
        .filter(|neighbor| !neighbor.is_blocked())
    }

    /// Returns the cell at `key`, or an error naming the role the cell was meant to play.
    pub(crate) fn require(&self, key: CellKey, role: &str) -> Result<&Cell> {
        self.cell(key).ok_or_else(|| {
            eyre!(
                "invalid {role} endpoint {key}: grid has {} columns and {} rows",
                self.col_count(),
                self.rows
            )
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(formatter)?;
            }
            for column in &self.columns {
                let glyph = match column.get(usize::try_from(row).map_err(|_err| fmt::Error)?) {
                    Some(cell) if cell.is_blocked() => BLOCKED_GLYPH,
                    _ => OPEN_GLYPH,
                };
                write!(formatter, "{glyph}")?;
            }
        }

        Ok(())
    }
}
