// gridloc_sim/src/lib.rs

//! The simulation side of gridloc: scenario configuration, maze files, the
//! ground-truth robot, and terminal output. All inference lives in
//! `gridloc_core`.

use std::sync::Arc;

use gridloc_core::prelude::SensorModel;
use tracing::info;

// This prelude is for convenience for other files WITHIN the gridloc_sim crate.
pub mod prelude;

pub mod cli;
pub mod error;
pub mod render;
pub mod simulation;

use crate::cli::Cli;
use crate::error::SimError;
use crate::render::{render_belief, render_step};
use crate::simulation::config::ScenarioConfig;
use crate::simulation::maze::resolve_maze;
use crate::simulation::scenario::{RunReport, Scenario};

/// Loads everything a configuration points at and builds a ready-to-run scenario.
pub fn build_scenario(config: &ScenarioConfig) -> Result<Scenario, SimError> {
    let grid = Arc::new(resolve_maze(&config.maze)?);
    Ok(Scenario {
        grid,
        start: config.robot.start_coord(),
        path: config.robot.directions()?,
        sensor: SensorModel::new(config.simulation.sensor_accuracy),
        seed: config.simulation.seed,
    })
}

/// Runs the scenario described by the command line and prints it.
///
/// Returns `None` when the run was only asked to print its configuration.
pub fn run(cli: &Cli) -> Result<Option<RunReport>, SimError> {
    let config = ScenarioConfig::resolve(cli)?;
    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(None);
    }

    let scenario = build_scenario(&config)?;
    let show_stages = config.simulation.show_stages;
    if !cli.quiet {
        println!("{}", scenario.grid);
    }

    let report = scenario.run(|step| {
        if !cli.quiet {
            println!("{}", render_step(step, &scenario.grid, show_stages));
        }
    })?;

    if let Some(last) = report.final_step() {
        if let Some((coord, p)) = last.posterior.most_likely() {
            info!(
                "Most likely cell {} with {:.1}%, true position {}",
                coord,
                p * 100.0,
                last.reading.position
            );
        }
        if cli.quiet {
            print!("{}", render_belief(&last.posterior, &scenario.grid));
        }
    }
    Ok(Some(report))
}
