// gridloc_core/src/models/mod.rs

pub mod motion;
pub mod sensor;

pub use motion::{Direction, MotionError, MotionModel};
pub use sensor::SensorModel;
