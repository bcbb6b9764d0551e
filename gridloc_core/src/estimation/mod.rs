// gridloc_core/src/estimation/mod.rs

use thiserror::Error;

use crate::types::Observation;

pub mod belief;
pub mod filters;

pub use belief::BeliefState;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// The normalizer came out as zero; the prior or the likelihoods are broken.
    #[error("belief cannot be normalized: total weighted mass is {total}")]
    DegenerateBelief { total: f64 },
    #[error("the maze has no free cells to place the robot in")]
    NoFreeCells,
    #[error("belief is {found_width}x{found_height} but the maze is {width}x{height}")]
    ShapeMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
}

/// The contract for anything that tracks where the robot might be.
///
/// Implementors hold the current belief and nothing else that changes between
/// calls; each observation replaces that belief with the posterior.
pub trait BeliefEstimator: Send + Sync {
    /// Advances one time step with a new sensor reading and returns the posterior.
    fn process(&mut self, observation: Observation) -> Result<&BeliefState, FilterError>;

    /// The current best estimate.
    fn belief(&self) -> &BeliefState;
}
