// gridloc_sim/src/error.rs

use std::path::PathBuf;

use gridloc_core::prelude::{FilterError, GridCoord, GridError, LoadError, MotionError};
use thiserror::Error;

/// Everything that can stop a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load maze from {path:?}: {source}")]
    MazeLoad {
        path: PathBuf,
        #[source]
        source: LoadError,
    },
    #[error("scenario file not found at {0:?}")]
    ScenarioNotFound(PathBuf),
    #[error("failed to parse scenario configuration: {0}")]
    Config(#[from] Box<figment::Error>),
    #[error("invalid scenario configuration: {0}")]
    InvalidConfig(String),
    #[error("no maze named '{name}' in the catalog at {catalog:?}")]
    UnknownMaze { name: String, catalog: PathBuf },
    #[error("start cell {0} is a wall or off the map")]
    InvalidStart(GridCoord),
    #[error(transparent)]
    Motion(#[from] MotionError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl From<figment::Error> for SimError {
    fn from(err: figment::Error) -> Self {
        SimError::Config(Box::new(err))
    }
}
