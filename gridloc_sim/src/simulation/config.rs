// gridloc_sim/src/simulation/config.rs

//! Scenario configuration: which maze, where the robot starts, which moves it
//! tries, and how the noise is seeded. Loaded from TOML and then patched by
//! any command-line overrides.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Format, Toml},
    Figment,
};
use gridloc_core::models::sensor::DEFAULT_ACCURACY;
use gridloc_core::prelude::{Direction, GridCoord};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cli::Cli;
use crate::error::SimError;

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// The root of a `scenario.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)] // Fail if the TOML has fields not in our struct
pub struct ScenarioConfig {
    #[serde(default)] // Use default if the [simulation] section is missing
    pub simulation: SimulationSection,

    #[serde(default)]
    pub maze: MazeSection,

    #[serde(default)]
    pub robot: RobotSection,
}

// =========================================================================
// == Configuration Sub-Structs ==
// =========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSection {
    /// Optional seed for the sensor noise generator. Absent means OS entropy.
    pub seed: Option<u64>,
    /// Probability that a color reading is correct.
    #[serde(default = "default_accuracy")]
    pub sensor_accuracy: f64,
    /// Print the predicted and sensor-weighted grids as well as the posterior.
    #[serde(default)]
    pub show_stages: bool,
}

fn default_accuracy() -> f64 {
    DEFAULT_ACCURACY
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: None,
            sensor_accuracy: DEFAULT_ACCURACY,
            show_stages: false,
        }
    }
}

/// Where to find the maze: an explicit file, or a name looked up in a catalog
/// directory of `.maz` files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MazeSection {
    pub file: Option<PathBuf>,
    pub name: Option<String>,
    #[serde(default = "default_catalog_dir")]
    pub catalog_dir: PathBuf,
}

fn default_catalog_dir() -> PathBuf {
    "assets/mazes".into()
}

impl Default for MazeSection {
    fn default() -> Self {
        Self {
            file: None,
            name: None,
            catalog_dir: default_catalog_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RobotSection {
    /// True starting cell `[x, y]`, bottom-left origin.
    #[serde(default)]
    pub start: [isize; 2],
    /// Move instructions, one of `n`, `e`, `s`, `w` per step.
    #[serde(default)]
    pub path: String,
}

impl RobotSection {
    pub fn start_coord(&self) -> GridCoord {
        GridCoord::new(self.start[0], self.start[1])
    }

    pub fn directions(&self) -> Result<Vec<Direction>, SimError> {
        Ok(Direction::parse_path(&self.path)?)
    }
}

// =========================================================================
// == Loading ==
// =========================================================================

impl ScenarioConfig {
    /// Reads a scenario TOML file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        if !path.is_file() {
            return Err(SimError::ScenarioNotFound(path.to_path_buf()));
        }
        info!("Loading scenario from: {:?}", path);
        let config: ScenarioConfig = Figment::new().merge(Toml::file(path)).extract()?;
        Ok(config)
    }

    /// Builds the effective configuration for a run: the scenario file if one
    /// was given (defaults otherwise), with every CLI flag taking precedence.
    pub fn resolve(cli: &Cli) -> Result<Self, SimError> {
        let mut config = match &cli.scenario {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(maze) = &cli.maze {
            self.maze.file = Some(maze.clone());
            self.maze.name = None;
        }
        if let Some(path) = &cli.path {
            self.robot.path = path.clone();
        }
        if let Some(start) = cli.start {
            self.robot.start = [start.x, start.y];
        }
        if let Some(seed) = cli.seed {
            self.simulation.seed = Some(seed);
        }
        if cli.show_stages {
            self.simulation.show_stages = true;
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let accuracy = self.simulation.sensor_accuracy;
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(SimError::InvalidConfig(format!(
                "sensor_accuracy must be within [0, 1], got {accuracy}"
            )));
        }
        match (&self.maze.file, &self.maze.name) {
            (None, None) => Err(SimError::InvalidConfig(
                "no maze given: set maze.file, maze.name, or pass --maze".into(),
            )),
            (Some(_), Some(_)) => Err(SimError::InvalidConfig(
                "maze.file and maze.name are mutually exclusive".into(),
            )),
            _ => {
                self.robot.directions()?;
                Ok(())
            }
        }
    }

    /// The configuration as TOML, for echoing what a run will actually use.
    pub fn to_toml(&self) -> Result<String, SimError> {
        toml::to_string_pretty(self).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }
}
