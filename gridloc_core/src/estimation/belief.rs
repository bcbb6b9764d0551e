// gridloc_core/src/estimation/belief.rs

use nalgebra::DMatrix;

use crate::grid::GridError;
use crate::types::GridCoord;

/// A probability for every cell of a maze.
///
/// Stored as a `width x height` matrix indexed `(x, y)` with the same
/// bottom-left origin as [`Grid`](crate::grid::Grid). States produced by the
/// filter sum to one and hold exactly zero on walls. A `BeliefState` is a plain
/// value: every filter stage returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefState {
    probabilities: DMatrix<f64>,
}

impl BeliefState {
    pub(crate) fn from_matrix(probabilities: DMatrix<f64>) -> Self {
        Self { probabilities }
    }

    pub fn width(&self) -> usize {
        self.probabilities.nrows()
    }

    pub fn height(&self) -> usize {
        self.probabilities.ncols()
    }

    fn out_of_bounds(&self, coord: GridCoord) -> GridError {
        GridError::OutOfBounds {
            coord,
            width: self.width(),
            height: self.height(),
        }
    }

    /// The mass at `coord`.
    pub fn probability_at(&self, coord: GridCoord) -> Result<f64, GridError> {
        if coord.x < 0 || coord.y < 0 {
            return Err(self.out_of_bounds(coord));
        }
        self.probabilities
            .get((coord.x as usize, coord.y as usize))
            .copied()
            .ok_or_else(|| self.out_of_bounds(coord))
    }

    /// Total mass. One for any normalized state.
    pub fn total(&self) -> f64 {
        self.probabilities.sum()
    }

    /// Every `(coord, probability)` pair, bottom row first, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, f64)> + '_ {
        let width = self.width();
        let height = self.height();
        (0..height).flat_map(move |y| {
            (0..width).map(move |x| {
                (
                    GridCoord::new(x as isize, y as isize),
                    self.probabilities[(x, y)],
                )
            })
        })
    }

    /// The cell holding the most mass and that mass. Ties resolve to the first
    /// cell in [`BeliefState::iter`] order.
    pub fn most_likely(&self) -> Option<(GridCoord, f64)> {
        self.iter().fold(None, |best, (coord, p)| match best {
            Some((_, best_p)) if best_p >= p => best,
            _ => Some((coord, p)),
        })
    }

    /// Read-only view of the underlying matrix, indexed `(x, y)`.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.probabilities
    }
}
