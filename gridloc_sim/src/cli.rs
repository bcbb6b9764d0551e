use clap::Parser;
use gridloc_core::prelude::GridCoord;
use std::path::PathBuf;

/// gridloc: track a robot through a colored maze from noisy color readings.
///
/// Every flag overrides the matching value from the scenario file.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to a scenario TOML file.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// A maze text file to use instead of the scenario's maze.
    #[arg(short, long)]
    pub maze: Option<PathBuf>,

    /// Move instructions, e.g. "nnesw".
    #[arg(short, long)]
    pub path: Option<String>,

    /// True starting cell as "x,y" (bottom-left origin).
    #[arg(long, value_parser = parse_coord)]
    pub start: Option<GridCoord>,

    /// Seed for the sensor noise.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Also print the predicted and sensor-weighted grids each step.
    #[arg(long, default_value_t = false)]
    pub show_stages: bool,

    /// Print the resolved scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,

    /// Only print the final summary.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

fn parse_coord(s: &str) -> Result<GridCoord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"x,y\", got {s:?}"))?;
    let x = x.trim().parse::<isize>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<isize>().map_err(|e| e.to_string())?;
    Ok(GridCoord::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinates() {
        assert_eq!(parse_coord("1,2"), Ok(GridCoord::new(1, 2)));
        assert_eq!(parse_coord(" 3 , 0 "), Ok(GridCoord::new(3, 0)));
        assert!(parse_coord("3").is_err());
        assert!(parse_coord("a,1").is_err());
    }

    #[test]
    fn flags_are_optional() {
        let cli = Cli::parse_from(["gridloc"]);
        assert!(cli.scenario.is_none());
        assert!(!cli.quiet);

        let cli = Cli::parse_from(["gridloc", "-m", "maze.maz", "-p", "ns", "--quiet"]);
        assert_eq!(cli.maze, Some(PathBuf::from("maze.maz")));
        assert_eq!(cli.path.as_deref(), Some("ns"));
        assert!(cli.quiet);
    }
}
