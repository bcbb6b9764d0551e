// gridloc_sim/src/simulation/mod.rs

pub mod config;
pub mod maze;
pub mod prng;
pub mod scenario;
