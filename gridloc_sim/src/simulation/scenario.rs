// gridloc_sim/src/simulation/scenario.rs

//! The simulated robot and the run loop that feeds its readings to the filter.
//!
//! The driver is the only place that knows the true position. The filter only
//! ever sees the noisy observations.

use std::sync::Arc;

use gridloc_core::prelude::{
    BeliefState, Color, Direction, Grid, GridCoord, HistogramFilter, MotionModel, Observation,
    SensorModel,
};
use tracing::{debug, info};

use crate::error::SimError;
use crate::simulation::prng::SimulationRng;

// =========================================================================
// == Ground Truth Robot ==
// =========================================================================

/// One sensor reading taken by the simulated robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Time step; `0` is the reading at the start cell before any move.
    pub t: u64,
    /// The move attempted to reach this step, `None` at `t = 0`.
    pub direction: Option<Direction>,
    pub position: GridCoord,
    pub true_color: Color,
    pub observation: Observation,
}

/// Owns the robot's true position and the noise source for its sensor.
#[derive(Debug)]
pub struct ScenarioDriver {
    grid: Arc<Grid>,
    sensor: SensorModel,
    rng: SimulationRng,
    position: GridCoord,
    move_counter: u64,
}

impl ScenarioDriver {
    /// Places the robot on `start`, which must be a free cell.
    pub fn new(
        grid: Arc<Grid>,
        start: GridCoord,
        sensor: SensorModel,
        rng: SimulationRng,
    ) -> Result<Self, SimError> {
        if !grid.is_free(start) {
            return Err(SimError::InvalidStart(start));
        }
        Ok(Self {
            grid,
            sensor,
            rng,
            position: start,
            move_counter: 0,
        })
    }

    pub fn position(&self) -> GridCoord {
        self.position
    }

    pub fn move_counter(&self) -> u64 {
        self.move_counter
    }

    fn true_color(&self) -> Result<Color, SimError> {
        // The robot only ever stands on free cells.
        self.grid
            .color_at(self.position)?
            .color()
            .ok_or(SimError::InvalidStart(self.position))
    }

    /// Reads the floor under the robot without moving.
    pub fn sense(&mut self) -> Result<Reading, SimError> {
        let true_color = self.true_color()?;
        let observation = self.sensor.sense(true_color, &mut self.rng.0);
        Ok(Reading {
            t: self.move_counter,
            direction: None,
            position: self.position,
            true_color,
            observation,
        })
    }

    /// Tries to move one cell, then reads the floor where the robot ended up.
    pub fn advance(&mut self, direction: Direction) -> Result<Reading, SimError> {
        let next = MotionModel::new(&self.grid).attempt_move(self.position, direction);
        if next == self.position {
            debug!("Robot bumped trying {} from {}", direction, self.position);
        }
        self.position = next;
        self.move_counter += 1;

        let mut reading = self.sense()?;
        reading.direction = Some(direction);
        Ok(reading)
    }
}

// =========================================================================
// == Run Loop ==
// =========================================================================

/// Everything recorded for one time step of a run.
#[derive(Debug, Clone)]
pub struct StepRecord {
    pub reading: Reading,
    /// Belief after the transition stage, unnormalized. `None` at `t = 0`.
    pub predicted: Option<BeliefState>,
    /// Belief after sensor weighting, unnormalized. `None` at `t = 0`.
    pub weighted: Option<BeliefState>,
    pub posterior: BeliefState,
}

/// The outcome of a run, one record per time step starting at `t = 0`.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub steps: Vec<StepRecord>,
}

impl RunReport {
    pub fn final_step(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    /// Whether the most likely cell of the final belief is the true position.
    pub fn localized(&self) -> bool {
        self.final_step().is_some_and(|step| {
            step.posterior
                .most_likely()
                .is_some_and(|(coord, _)| coord == step.reading.position)
        })
    }
}

/// Everything a run needs, already validated and loaded.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub grid: Arc<Grid>,
    pub start: GridCoord,
    pub path: Vec<Direction>,
    pub sensor: SensorModel,
    pub seed: Option<u64>,
}

impl Scenario {
    /// Runs the robot along its path and filters every reading.
    ///
    /// The `t = 0` reading is recorded but does not update the belief; the run
    /// starts from the uniform prior. `on_step` sees each record as soon as it
    /// is produced.
    pub fn run<F>(&self, mut on_step: F) -> Result<RunReport, SimError>
    where
        F: FnMut(&StepRecord),
    {
        let filter = HistogramFilter::new(Arc::clone(&self.grid), self.sensor);
        let mut driver = ScenarioDriver::new(
            Arc::clone(&self.grid),
            self.start,
            self.sensor,
            SimulationRng::new(self.seed),
        )?;

        info!(
            "Starting run: {} moves from {} on a {}x{} maze",
            self.path.len(),
            self.start,
            self.grid.width(),
            self.grid.height()
        );

        let mut belief = filter.initial_belief()?;
        let mut steps = Vec::with_capacity(self.path.len() + 1);
        let first = StepRecord {
            reading: driver.sense()?,
            predicted: None,
            weighted: None,
            posterior: belief.clone(),
        };
        on_step(&first);
        steps.push(first);

        for &direction in &self.path {
            let reading = driver.advance(direction)?;
            let predicted = filter.predict(&belief)?;
            let weighted = filter.weigh(&predicted, reading.observation)?;
            belief = filter.normalize(weighted.clone())?;

            debug!(
                "t = {}: tried {}, now at {} ({}), sensed {}",
                reading.t, direction, reading.position, reading.true_color, reading.observation
            );

            let record = StepRecord {
                reading,
                predicted: Some(predicted),
                weighted: Some(weighted),
                posterior: belief.clone(),
            };
            on_step(&record);
            steps.push(record);
        }

        let report = RunReport { steps };
        info!(
            "Run finished after {} moves; localized: {}",
            driver.move_counter(),
            report.localized()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grid(text: &str) -> Arc<Grid> {
        Arc::new(Grid::parse(text).unwrap())
    }

    fn scenario(text: &str, start: (isize, isize), path: &str, seed: u64) -> Scenario {
        Scenario {
            grid: grid(text),
            start: start.into(),
            path: Direction::parse_path(path).unwrap(),
            sensor: SensorModel::default(),
            seed: Some(seed),
        }
    }

    #[test]
    fn driver_rejects_walls_as_start() {
        let result = ScenarioDriver::new(
            grid("r#"),
            GridCoord::new(1, 0),
            SensorModel::default(),
            SimulationRng::new(Some(0)),
        );
        assert!(matches!(result, Err(SimError::InvalidStart(_))));
    }

    #[test]
    fn driver_moves_and_bumps() {
        let mut driver = ScenarioDriver::new(
            grid("r#\ngb"),
            GridCoord::new(0, 0),
            SensorModel::new(1.0),
            SimulationRng::new(Some(0)),
        )
        .unwrap();

        let reading = driver.advance(Direction::North).unwrap();
        assert_eq!(reading.position, GridCoord::new(0, 1));
        assert_eq!(reading.true_color, Color::Red);
        assert_eq!(reading.observation, Color::Red);
        assert_eq!(reading.t, 1);

        // Wall to the east: the robot stays put but time still advances.
        let reading = driver.advance(Direction::East).unwrap();
        assert_eq!(reading.position, GridCoord::new(0, 1));
        assert_eq!(driver.move_counter(), 2);
    }

    #[test]
    fn run_records_every_step() {
        let report = scenario("rgby\nbyrg\ngrbb", (0, 0), "neen", 11)
            .run(|_| {})
            .unwrap();

        assert_eq!(report.steps.len(), 5);
        let first = &report.steps[0];
        assert!(first.predicted.is_none());
        assert_eq!(first.reading.t, 0);
        assert_eq!(report.final_step().unwrap().reading.position, GridCoord::new(2, 2));

        for step in &report.steps {
            assert_abs_diff_eq!(step.posterior.total(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn runs_are_reproducible_from_a_seed() {
        let a = scenario("rgby\nbyrg", (0, 0), "eeewnn", 2024).run(|_| {}).unwrap();
        let b = scenario("rgby\nbyrg", (0, 0), "eeewnn", 2024).run(|_| {}).unwrap();

        let readings = |report: &RunReport| -> Vec<Observation> {
            report.steps.iter().map(|s| s.reading.observation).collect()
        };
        assert_eq!(readings(&a), readings(&b));
        assert_eq!(
            a.final_step().unwrap().posterior,
            b.final_step().unwrap().posterior
        );
    }

    #[test]
    fn perfect_sensor_on_two_cells_localizes() {
        let mut run = scenario("rg", (0, 0), "e", 0);
        run.sensor = SensorModel::new(1.0);
        let mut seen = 0;
        let report = run.run(|_| seen += 1).unwrap();

        assert_eq!(seen, 2);
        assert!(report.localized());
        let posterior = &report.final_step().unwrap().posterior;
        assert_abs_diff_eq!(
            posterior.probability_at(GridCoord::new(1, 0)).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }
}
