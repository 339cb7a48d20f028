//! Loading of grid layout files.

use std::{fs, path::Path};

use color_eyre::eyre::{Result, WrapErr as _};
use tracing::info;

use crate::grid::Grid;

/// Reads a text layout from `path` and parses it into a grid with the given unit size.
///
/// The file uses the same format [`Grid`] displays itself in: one line per row, `#` for blocked
/// cells and `.` for open ones.
///
/// # Errors
///
/// This function returns an error if the file cannot be read or its contents are not a valid
/// layout.
pub(crate) fn load_layout(path: &Path, unit: u32) -> Result<Grid> {
    let contents = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read layout file {}", path.display()))?;
    let grid = Grid::from_layout(unit, &contents)
        .wrap_err_with(|| format!("invalid layout in {}", path.display()))?;

    info!(
        path = %path.display(),
        columns = grid.col_count(),
        rows = grid.row_count(),
        "loaded layout"
    );

    Ok(grid)
}

#[cfg(test)]
mod tests {
    use std::{env, path::PathBuf, process};

    use super::*;

    /// Writes `contents` to a per-process temporary file and returns its path.
    fn temp_layout(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("pathgrid-{}-{name}.layout", process::id()));
        fs::write(&path, contents).expect("temporary file should be writable");
        path
    }

    #[test]
    fn test_load_layout_valid_file() {
        let path = temp_layout("valid", "..#\n#..\n");

        let grid = load_layout(&path, 8).expect("layout should load");
        fs::remove_file(&path).expect("temporary file should be removable");

        assert_eq!(grid.col_count(), 3, "three columns in the file");
        assert_eq!(grid.row_count(), 2, "two rows in the file");
        assert_eq!(grid.unit(), 8, "unit should come from the caller");
        assert_eq!(grid.to_string(), "..#\n#..", "cells should match the file");
    }

    #[test]
    fn test_load_layout_invalid_contents() {
        let path = temp_layout("invalid", "..#\n#.\n");

        let result = load_layout(&path, 1);
        fs::remove_file(&path).expect("temporary file should be removable");

        let error = result.expect_err("ragged layout should fail");
        assert!(
            format!("{error:?}").contains("row 2 has 2 cells"),
            "report should keep the parse failure: {error:?}"
        );
    }

    #[test]
    fn test_load_bundled_layout_is_routable() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("layouts/gaps.layout");

        let grid = load_layout(&path, 20).expect("bundled layout should load");
        let start = grid.get(0, 0).expect("top-left corner exists");
        let target = grid
            .get(grid.col_count() - 1, grid.row_count() - 1)
            .expect("bottom-right corner exists");
        let path = crate::find_path(&grid, start, target).expect("corners are in the grid");

        assert_eq!(grid.col_count(), 20, "bundled layout is 20 cells wide");
        assert_eq!(grid.row_count(), 9, "bundled layout is 9 cells tall");
        assert!(!path.is_empty(), "corners of the bundled layout should connect");
    }

    #[test]
    fn test_load_layout_missing_file() {
        let path = env::temp_dir().join("pathgrid-definitely-missing.layout");

        let error = load_layout(&path, 1).expect_err("missing file should fail");

        assert!(
            error.to_string().contains("failed to read layout file"),
            "error should name the failing step: {error}"
        );
    }
}
