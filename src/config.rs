//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::{generator, grid::Dimensions, pathfinding::Frontier};

/// Runtime configuration of the program, read from the command line.
#[derive(Clone, Debug, PartialEq, Parser)]
#[command(version, about)]
pub struct Config {
    /// Total width of the field in pixels.
    #[arg(long, default_value_t = 800)]
    pub width: u32,
    /// Total height of the field in pixels.
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    /// Side length of one cell in pixels.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
    pub unit: u32,
    /// Probability of each generated cell being blocked.
    #[arg(long, default_value_t = 0.3, value_parser = parse_probability)]
    pub block_probability: f64,
    /// Strategy used to pick the next frontier cell during a search.
    #[arg(long, value_enum, default_value_t = Frontier::LinearScan)]
    pub frontier: Frontier,
    /// Seed for grid generation; omit it for a different grid on every run.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Text layout file to load instead of generating a random grid.
    #[arg(long)]
    pub layout: Option<PathBuf>,
    /// Directory the log file is written to.
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

impl Config {
    /// Pixel dimensions of the field as described by this configuration.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
            unit: self.unit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["pathgrid"])
    }
}

/// Parses a blocking probability argument.
fn parse_probability(value: &str) -> Result<f64, String> {
    let probability: f64 = value
        .parse()
        .map_err(|err| format!("`{value}` is not a number: {err}"))?;

    generator::validate_probability(probability).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(
            config.dimensions(),
            Dimensions {
                width: 800,
                height: 600,
                unit: 20,
            },
            "default field should be 40 by 30 cells"
        );
        assert_eq!(config.frontier, Frontier::LinearScan, "scan is the default");
        assert!(config.seed.is_none(), "no seed by default");
        assert!(config.layout.is_none(), "no layout by default");
        assert_eq!(config.log_dir, PathBuf::from("logs"), "logs go to ./logs");
    }

    #[test]
    fn test_config_parses_every_flag() {
        let config = Config::try_parse_from([
            "pathgrid",
            "--width",
            "120",
            "--height",
            "80",
            "--unit",
            "4",
            "--block-probability",
            "0.5",
            "--frontier",
            "binary-heap",
            "--seed",
            "42",
            "--layout",
            "maze.layout",
            "--log-dir",
            "/tmp/pathgrid",
        ])
        .expect("all flags are valid");

        assert_eq!(config.width, 120, "width flag");
        assert_eq!(config.height, 80, "height flag");
        assert_eq!(config.unit, 4, "unit flag");
        assert!(
            (config.block_probability - 0.5).abs() < f64::EPSILON,
            "probability flag"
        );
        assert_eq!(config.frontier, Frontier::BinaryHeap, "frontier flag");
        assert_eq!(config.seed, Some(42), "seed flag");
        assert_eq!(
            config.layout,
            Some(PathBuf::from("maze.layout")),
            "layout flag"
        );
        assert_eq!(
            config.log_dir,
            PathBuf::from("/tmp/pathgrid"),
            "log directory flag"
        );
    }

    #[test]
    fn test_config_rejects_zero_unit() {
        assert!(
            Config::try_parse_from(["pathgrid", "--unit", "0"]).is_err(),
            "zero unit should be rejected"
        );
    }

    #[test]
    fn test_config_rejects_bad_probability() {
        assert!(
            Config::try_parse_from(["pathgrid", "--block-probability", "1.2"]).is_err(),
            "probability above one should be rejected"
        );
        assert!(
            Config::try_parse_from(["pathgrid", "--block-probability", "often"]).is_err(),
            "non-numeric probability should be rejected"
        );
    }
}
