// gridloc_core/src/lib.rs

//! Pure grid-localization core: the colored maze, the robot's motion and sensor
//! models, and a discrete Bayes filter that tracks where the robot might be.
//!
//! Nothing in this crate performs I/O or owns a random number generator.

pub mod estimation;
pub mod grid;
pub mod models;
pub mod prelude;
pub mod types;
