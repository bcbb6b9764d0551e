// gridloc_core/src/estimation/filters/mod.rs

pub mod histogram;

pub use histogram::{GridLocalizer, HistogramFilter, MOVE_PROBABILITY};
