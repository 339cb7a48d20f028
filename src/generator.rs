//! Random grid generation.
//!
//! Every cell is blocked independently with the same probability. Nothing here is reproducible
//! unless the caller hands in a seeded generator.

use color_eyre::eyre::{ensure, Result};
use rand::Rng;
use tracing::info;

use crate::grid::{Dimensions, Grid};

/// Checks that `probability` is a usable blocking probability.
///
/// # Errors
///
/// This function returns an error if `probability` is NaN or outside `[0, 1]`.
pub(crate) fn validate_probability(probability: f64) -> Result<f64> {
    ensure!(
        (0.0..=1.0).contains(&probability),
        "blocking probability must lie within [0, 1], got {probability}"
    );

    Ok(probability)
}

/// Generates a grid whose cells are each blocked with probability `block_probability`.
///
/// # Errors
///
/// This function returns an error if the probability is out of range or the unit size is zero.
pub fn generate<R: Rng>(
    dimensions: Dimensions,
    block_probability: f64,
    rng: &mut R,
) -> Result<Grid> {
    let block_probability = validate_probability(block_probability)?;
    let grid = Grid::from_fn(dimensions, |_, _| rng.random_bool(block_probability))?;

    info!(
        columns = grid.col_count(),
        rows = grid.row_count(),
        blocked = grid.cells().filter(|cell| cell.is_blocked()).count(),
        "generated grid"
    );

    Ok(grid)
}
