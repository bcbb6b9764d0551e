// gridloc_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::estimation::{BeliefEstimator, FilterError};
pub use crate::grid::{Grid, GridError, LoadError};

// --- Core Data Structures ---
pub use crate::estimation::BeliefState;
pub use crate::types::{Cell, Color, GridCoord, Observation};

// --- Models ---
pub use crate::models::{Direction, MotionError, MotionModel, SensorModel};

// --- Estimation Algorithms ---
pub use crate::estimation::filters::{GridLocalizer, HistogramFilter};
