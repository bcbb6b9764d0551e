// gridloc_sim/src/prelude.rs

// Re-export the entire gridloc_core prelude so driver code sees the pure
// types (`Grid`, `BeliefState`, `Direction`, ...) alongside its own.
pub use gridloc_core::prelude::*;

pub use crate::cli::Cli;
pub use crate::error::SimError;
pub use crate::render::{render_belief, render_step};
pub use crate::simulation::config::ScenarioConfig;
pub use crate::simulation::maze::{load_maze, resolve_maze, MazeCatalog};
pub use crate::simulation::prng::SimulationRng;
pub use crate::simulation::scenario::{Reading, RunReport, Scenario, ScenarioDriver, StepRecord};
