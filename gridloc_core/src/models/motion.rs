// gridloc_core/src/models/motion.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Grid;
use crate::types::GridCoord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    #[error("{symbol:?} is not a direction (expected one of n, e, s, w)")]
    InvalidDirection { symbol: char },
    #[error("{symbol:?} at position {index} of the path is not a direction")]
    InvalidPathStep { index: usize, symbol: char },
}

/// A cardinal move. There are no diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical iteration order for every adjacency scan.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The `(dx, dy)` step, with `+y` pointing north.
    pub const fn vector(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Direction::North => 'n',
            Direction::East => 'e',
            Direction::South => 's',
            Direction::West => 'w',
        }
    }

    /// Parses `n`, `e`, `s` or `w` in either case.
    pub fn from_symbol(symbol: char) -> Result<Self, MotionError> {
        match symbol.to_ascii_lowercase() {
            'n' => Ok(Direction::North),
            'e' => Ok(Direction::East),
            's' => Ok(Direction::South),
            'w' => Ok(Direction::West),
            _ => Err(MotionError::InvalidDirection { symbol }),
        }
    }

    /// Parses a path such as `"nnesw"` into moves. Whitespace is skipped; any
    /// other unknown character fails with its index in the input.
    pub fn parse_path(path: &str) -> Result<Vec<Self>, MotionError> {
        path.chars()
            .enumerate()
            .filter(|(_, symbol)| !symbol.is_whitespace())
            .map(|(index, symbol)| {
                Self::from_symbol(symbol)
                    .map_err(|_| MotionError::InvalidPathStep { index, symbol })
            })
            .collect()
    }

    /// The cell one step from `coord` in this direction, legal or not.
    pub const fn apply(self, coord: GridCoord) -> GridCoord {
        let (dx, dy) = self.vector();
        coord.offset(dx, dy)
    }
}

impl TryFrom<char> for Direction {
    type Error = MotionError;

    fn try_from(symbol: char) -> Result<Self, Self::Error> {
        Self::from_symbol(symbol)
    }
}

impl FromStr for Direction {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => Self::from_symbol(symbol),
            (Some(symbol), Some(_)) | (None, Some(symbol)) => {
                Err(MotionError::InvalidDirection { symbol })
            }
            (None, None) => Err(MotionError::InvalidDirection { symbol: ' ' }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// =========================================================================
// == Motion Model ==
// =========================================================================

/// The deterministic outcome of a move attempt on a fixed maze.
///
/// A move into a wall or off the map leaves the robot where it was. This never
/// fails; an illegal destination simply collapses to the identity move.
#[derive(Debug, Clone, Copy)]
pub struct MotionModel<'a> {
    grid: &'a Grid,
}

impl<'a> MotionModel<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    pub fn attempt_move(&self, from: GridCoord, direction: Direction) -> GridCoord {
        let target = direction.apply(from);
        if self.grid.is_free(target) {
            target
        } else {
            from
        }
    }

    /// The free cardinal neighbors of `coord`, in [`Direction::ALL`] order.
    pub fn legal_neighbors(&self, coord: GridCoord) -> impl Iterator<Item = GridCoord> + 'a {
        let grid = self.grid;
        Direction::ALL
            .into_iter()
            .map(move |direction| direction.apply(coord))
            .filter(move |&neighbor| grid.is_free(neighbor))
    }

    /// How many of the four cardinal moves from `coord` are legal.
    pub fn legal_move_count(&self, coord: GridCoord) -> usize {
        self.legal_neighbors(coord).count()
    }
}
