// gridloc_core/src/estimation/filters/histogram.rs

use std::sync::Arc;

use nalgebra::DMatrix;
use tracing::{debug, trace};

use crate::estimation::{BeliefEstimator, BeliefState, FilterError};
use crate::grid::Grid;
use crate::models::{MotionModel, SensorModel};
use crate::types::{GridCoord, Observation};

/// Probability that the robot attempts any one cardinal direction in a step.
pub const MOVE_PROBABILITY: f64 = 0.25;

/// A discrete Bayes (histogram) filter over the cells of a maze.
///
/// The filter itself is stateless: every stage takes a belief and returns a new
/// one. [`GridLocalizer`] wraps it when a caller wants the current belief kept
/// for them.
///
/// # Transition quirk
/// The predict stage gives cell `c` the mass `0.25 * k(c) * B[c]` plus
/// `0.25 * B[n]` for every free neighbor `n`, where `k(c)` is the number of
/// legal moves out of `c`. Attempts that bump into a wall (`4 - k(c)` of them)
/// are *not* added back to `c`, so predicted mass does not sum to one and
/// cells with many walls around them are under-weighted. Normalization hides
/// the lost mass. This matches the established model and is kept as is.
#[derive(Debug, Clone)]
pub struct HistogramFilter {
    grid: Arc<Grid>,
    sensor: SensorModel,
}

impl HistogramFilter {
    pub fn new(grid: Arc<Grid>, sensor: SensorModel) -> Self {
        Self { grid, sensor }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn sensor(&self) -> &SensorModel {
        &self.sensor
    }

    /// Uniform mass over free cells, zero on walls.
    pub fn initial_belief(&self) -> Result<BeliefState, FilterError> {
        let free = self.grid.free_cell_count();
        if free == 0 {
            return Err(FilterError::NoFreeCells);
        }

        let share = 1.0 / free as f64;
        let mut probabilities = self.zeros();
        for coord in self.grid.free_coords() {
            probabilities[Self::idx(coord)] = share;
        }
        debug!(
            free_cells = free,
            obstacles = self.grid.count_obstacles(),
            "initialized uniform belief"
        );
        Ok(BeliefState::from_matrix(probabilities))
    }

    /// One full time step: predict, weigh by the observation, normalize.
    pub fn step(
        &self,
        prior: &BeliefState,
        observation: Observation,
    ) -> Result<BeliefState, FilterError> {
        let predicted = self.predict(prior)?;
        let weighted = self.weigh(&predicted, observation)?;
        self.normalize(weighted)
    }

    /// Transition (predict) stage under the random cardinal motion policy.
    pub fn predict(&self, prior: &BeliefState) -> Result<BeliefState, FilterError> {
        self.check_shape(prior)?;
        let motion = MotionModel::new(&self.grid);
        let prior = prior.as_matrix();

        let mut predicted = self.zeros();
        for coord in self.grid.free_coords() {
            let mut legal_moves = 0usize;
            let mut inflow = 0.0;
            for neighbor in motion.legal_neighbors(coord) {
                legal_moves += 1;
                inflow += MOVE_PROBABILITY * prior[Self::idx(neighbor)];
            }
            let retained = MOVE_PROBABILITY * legal_moves as f64 * prior[Self::idx(coord)];
            predicted[Self::idx(coord)] = retained + inflow;
        }

        trace!(mass = predicted.sum(), "predicted belief");
        Ok(BeliefState::from_matrix(predicted))
    }

    /// Sensor fusion stage: scales each cell by `P(observation | cell color)`.
    /// The result is unnormalized.
    pub fn weigh(
        &self,
        predicted: &BeliefState,
        observation: Observation,
    ) -> Result<BeliefState, FilterError> {
        self.check_shape(predicted)?;
        let mut weighted = predicted.as_matrix().clone();
        for coord in self.grid.coords() {
            let likelihood = self
                .grid
                .cell(coord)
                .and_then(|cell| cell.color())
                .map_or(0.0, |color| self.sensor.likelihood(observation, color));
            weighted[Self::idx(coord)] *= likelihood;
        }

        trace!(%observation, mass = weighted.sum(), "weighted belief");
        Ok(BeliefState::from_matrix(weighted))
    }

    /// Rescales `weighted` so it sums to one.
    pub fn normalize(&self, weighted: BeliefState) -> Result<BeliefState, FilterError> {
        let total = weighted.total();
        if total <= 0.0 || !total.is_finite() {
            return Err(FilterError::DegenerateBelief { total });
        }
        Ok(BeliefState::from_matrix(weighted.as_matrix() / total))
    }

    fn zeros(&self) -> DMatrix<f64> {
        DMatrix::zeros(self.grid.width(), self.grid.height())
    }

    fn idx(coord: GridCoord) -> (usize, usize) {
        (coord.x as usize, coord.y as usize)
    }

    fn check_shape(&self, belief: &BeliefState) -> Result<(), FilterError> {
        if belief.width() == self.grid.width() && belief.height() == self.grid.height() {
            Ok(())
        } else {
            Err(FilterError::ShapeMismatch {
                width: self.grid.width(),
                height: self.grid.height(),
                found_width: belief.width(),
                found_height: belief.height(),
            })
        }
    }
}

// =========================================================================
// == Stateful Wrapper ==
// =========================================================================

/// Holds the current belief and threads it through [`HistogramFilter::step`].
#[derive(Debug, Clone)]
pub struct GridLocalizer {
    filter: HistogramFilter,
    belief: BeliefState,
    steps: u64,
}

impl GridLocalizer {
    /// Starts from the uniform prior over free cells.
    pub fn new(grid: Arc<Grid>, sensor: SensorModel) -> Result<Self, FilterError> {
        let filter = HistogramFilter::new(grid, sensor);
        let belief = filter.initial_belief()?;
        Ok(Self {
            filter,
            belief,
            steps: 0,
        })
    }

    pub fn filter(&self) -> &HistogramFilter {
        &self.filter
    }

    /// Number of observations processed since construction or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Drops everything learned and returns to the uniform prior.
    pub fn reset(&mut self) -> Result<(), FilterError> {
        self.belief = self.filter.initial_belief()?;
        self.steps = 0;
        Ok(())
    }
}

impl BeliefEstimator for GridLocalizer {
    fn process(&mut self, observation: Observation) -> Result<&BeliefState, FilterError> {
        // Leave the previous belief untouched if the step fails.
        let posterior = self.filter.step(&self.belief, observation)?;
        self.belief = posterior;
        self.steps += 1;
        debug!(step = self.steps, %observation, "belief updated");
        Ok(&self.belief)
    }

    fn belief(&self) -> &BeliefState {
        &self.belief
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use approx::assert_abs_diff_eq;

    const EPS: f64 = 1e-9;

    fn filter_for(text: &str) -> HistogramFilter {
        HistogramFilter::new(Arc::new(Grid::parse(text).unwrap()), SensorModel::default())
    }

    fn p(belief: &BeliefState, x: isize, y: isize) -> f64 {
        belief.probability_at(GridCoord::new(x, y)).unwrap()
    }

    fn assert_walls_empty(filter: &HistogramFilter, belief: &BeliefState) {
        for coord in filter.grid().coords() {
            if !filter.grid().is_free(coord) {
                assert_eq!(belief.probability_at(coord).unwrap(), 0.0, "wall {coord}");
            }
        }
    }

    #[test]
    fn initial_belief_is_uniform_over_free_cells() {
        let filter = filter_for("r#g\nb#y\nrgb");
        let belief = filter.initial_belief().unwrap();

        assert_abs_diff_eq!(belief.total(), 1.0, epsilon = EPS);
        assert_abs_diff_eq!(p(&belief, 0, 0), 1.0 / 7.0, epsilon = EPS);
        assert_abs_diff_eq!(p(&belief, 2, 2), 1.0 / 7.0, epsilon = EPS);
        assert_walls_empty(&filter, &belief);
    }

    #[test]
    fn two_cell_golden_posterior() {
        // Bottom-left is red, its east neighbor green.
        let filter = filter_for("rg");
        let prior = filter.initial_belief().unwrap();
        assert_abs_diff_eq!(p(&prior, 0, 0), 0.5, epsilon = EPS);
        assert_abs_diff_eq!(p(&prior, 1, 0), 0.5, epsilon = EPS);

        // Each cell has one legal move: 0.25 * 0.5 + 0.25 * 0.5 = 0.25.
        let predicted = filter.predict(&prior).unwrap();
        assert_abs_diff_eq!(p(&predicted, 0, 0), 0.25, epsilon = EPS);
        assert_abs_diff_eq!(p(&predicted, 1, 0), 0.25, epsilon = EPS);

        let weighted = filter.weigh(&predicted, Color::Red).unwrap();
        assert_abs_diff_eq!(p(&weighted, 0, 0), 0.22, epsilon = EPS);
        assert_abs_diff_eq!(p(&weighted, 1, 0), 0.01, epsilon = EPS);

        let posterior = filter.step(&prior, Color::Red).unwrap();
        assert_abs_diff_eq!(p(&posterior, 0, 0), 0.956522, epsilon = 1e-6);
        assert_abs_diff_eq!(p(&posterior, 1, 0), 0.043478, epsilon = 1e-6);

        // Both cells receive 0.25 of the total mass again, so a repeat reading
        // lands on the same posterior.
        let again = filter.step(&posterior, Color::Red).unwrap();
        assert_abs_diff_eq!(p(&again, 0, 0), 0.956522, epsilon = 1e-6);
    }

    #[test]
    fn posterior_sums_to_one_for_every_observation() {
        let filter = filter_for("rg#b\ny#gr\nbbry\n#gyg");
        let mut belief = filter.initial_belief().unwrap();
        for observation in [Color::Red, Color::Green, Color::Blue, Color::Yellow, Color::Red] {
            belief = filter.step(&belief, observation).unwrap();
            assert_abs_diff_eq!(belief.total(), 1.0, epsilon = EPS);
            assert_walls_empty(&filter, &belief);
            assert!(belief.iter().all(|(_, p)| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn bump_mass_is_not_returned_to_the_origin() {
        // (0, 0) has one legal move (east); (1, 0) has two; (2, 0) has one.
        let filter = filter_for("rgb");
        let prior = filter.initial_belief().unwrap();
        let predicted = filter.predict(&prior).unwrap();
        let third = 1.0 / 3.0;

        assert_abs_diff_eq!(p(&predicted, 0, 0), 0.25 * third + 0.25 * third, epsilon = EPS);
        assert_abs_diff_eq!(
            p(&predicted, 1, 0),
            0.25 * 2.0 * third + 2.0 * 0.25 * third,
            epsilon = EPS
        );
        // Unnormalized: only 2/3 of the mass survives prediction here.
        assert_abs_diff_eq!(predicted.total(), 2.0 / 3.0, epsilon = EPS);
    }

    #[test]
    fn uniform_color_maze_reaches_a_fixed_point() {
        let filter = filter_for("ggg\ng#g\nggg");
        let mut belief = filter.initial_belief().unwrap();
        for _ in 0..200 {
            belief = filter.step(&belief, Color::Green).unwrap();
        }

        let next = filter.step(&belief, Color::Green).unwrap();
        for ((coord, before), (_, after)) in belief.iter().zip(next.iter()) {
            assert_abs_diff_eq!(before, after, epsilon = EPS);
            if !filter.grid().is_free(coord) {
                assert_eq!(after, 0.0);
            }
        }
    }

    #[test]
    fn uniform_prior_on_a_regular_ring_is_already_stationary() {
        // Every cell of a 2x2 open maze has exactly two legal moves.
        let filter = filter_for("yy\nyy");
        let prior = filter.initial_belief().unwrap();
        let posterior = filter.step(&prior, Color::Blue).unwrap();
        for (_, mass) in posterior.iter() {
            assert_abs_diff_eq!(mass, 0.25, epsilon = EPS);
        }
    }

    #[test]
    fn isolated_cell_degenerates() {
        // A lone cell has no legal moves, so the predicted mass is zero.
        let filter = filter_for("r");
        let prior = filter.initial_belief().unwrap();
        assert_abs_diff_eq!(p(&prior, 0, 0), 1.0);
        assert!(matches!(
            filter.step(&prior, Color::Red),
            Err(FilterError::DegenerateBelief { .. })
        ));
    }

    #[test]
    fn all_wall_maze_has_no_prior() {
        let filter = filter_for("##\n##");
        assert_eq!(filter.initial_belief(), Err(FilterError::NoFreeCells));
    }

    #[test]
    fn rejects_beliefs_from_another_maze() {
        let small = filter_for("rg");
        let large = filter_for("rgb\nrgb");
        let foreign = small.initial_belief().unwrap();
        assert!(matches!(
            large.predict(&foreign),
            Err(FilterError::ShapeMismatch { width: 3, height: 2, .. })
        ));
    }

    #[test]
    fn localizer_threads_the_belief_and_resets() {
        let grid = Arc::new(Grid::parse("rg").unwrap());
        let mut localizer = GridLocalizer::new(grid, SensorModel::default()).unwrap();
        let posterior = localizer.process(Color::Green).unwrap().clone();

        assert_abs_diff_eq!(p(&posterior, 1, 0), 0.956522, epsilon = 1e-6);
        assert_eq!(localizer.steps(), 1);
        assert_eq!(localizer.belief(), &posterior);

        localizer.reset().unwrap();
        assert_eq!(localizer.steps(), 0);
        assert_abs_diff_eq!(p(localizer.belief(), 0, 0), 0.5, epsilon = EPS);
    }

    #[test]
    fn failed_step_keeps_the_previous_belief() {
        let grid = Arc::new(Grid::parse("g").unwrap());
        let mut localizer = GridLocalizer::new(grid, SensorModel::default()).unwrap();
        let before = localizer.belief().clone();
        assert!(localizer.process(Color::Green).is_err());
        assert_eq!(localizer.belief(), &before);
        assert_eq!(localizer.steps(), 0);
    }
}
