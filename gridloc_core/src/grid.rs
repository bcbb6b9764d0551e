// gridloc_core/src/grid.rs

//! The static maze: which cells are walls, and what color every floor cell is.
//!
//! # Orientation
//! A `Grid` is always addressed with `(0, 0)` at the **bottom-left** and `y`
//! growing upward. Map text is written top row first, so the first input line
//! becomes row `y = height - 1`. This convention lives entirely in
//! [`Grid::parse`]; the storage layout behind it is private.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{Cell, Color, GridCoord, WALL_SYMBOL};

/// Errors raised while building a [`Grid`] from map text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("map text contains no rows")]
    Empty,
    #[error("row {line} has width {found}, expected {expected}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown map symbol {symbol:?} at line {line}, column {column}")]
    InvalidSymbol {
        line: usize,
        column: usize,
        symbol: char,
    },
}

/// Errors raised by queries against an existing [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("coordinate {coord} is outside the {width}x{height} grid")]
    OutOfBounds {
        coord: GridCoord,
        width: usize,
        height: usize,
    },
}

/// An immutable maze of walls and colored floor tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    // Row-major, row 0 is the bottom row.
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from map text: `#` for walls, `r`/`g`/`b`/`y` for floor
    /// colors (either case). Every line must have the same length. A trailing
    /// `\r` on each line and trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, LoadError> {
        let mut lines: Vec<&str> = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        let height = lines.len();
        let width = lines.first().map_or(0, |line| line.chars().count());
        if height == 0 || width == 0 {
            return Err(LoadError::Empty);
        }

        let mut cells = vec![Cell::Blocked; width * height];
        for (line_idx, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LoadError::RaggedRow {
                    line: line_idx + 1,
                    expected: width,
                    found,
                });
            }

            // The first line is the top of the map.
            let y = height - 1 - line_idx;
            for (x, symbol) in line.chars().enumerate() {
                let cell = if symbol == WALL_SYMBOL {
                    Cell::Blocked
                } else {
                    let color =
                        Color::from_symbol(symbol).ok_or(LoadError::InvalidSymbol {
                            line: line_idx + 1,
                            column: x + 1,
                            symbol,
                        })?;
                    Cell::Free(color)
                };
                cells[y * width + x] = cell;
            }
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True if `coord` lies within `[0, width) x [0, height)`.
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && (coord.x as usize) < self.width
            && coord.y >= 0
            && (coord.y as usize) < self.height
    }

    fn index(&self, coord: GridCoord) -> Option<usize> {
        self.contains(coord)
            .then(|| coord.y as usize * self.width + coord.x as usize)
    }

    /// The cell at `coord`, or `None` when off the map.
    pub fn cell(&self, coord: GridCoord) -> Option<Cell> {
        self.index(coord).map(|idx| self.cells[idx])
    }

    /// True iff `coord` is on the map and not a wall.
    pub fn is_free(&self, coord: GridCoord) -> bool {
        self.cell(coord).is_some_and(Cell::is_free)
    }

    /// The kind of the cell at `coord`. Querying off the map is a caller bug
    /// and is reported as [`GridError::OutOfBounds`].
    pub fn color_at(&self, coord: GridCoord) -> Result<Cell, GridError> {
        self.cell(coord).ok_or(GridError::OutOfBounds {
            coord,
            width: self.width,
            height: self.height,
        })
    }

    /// Number of wall cells.
    pub fn count_obstacles(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_free()).count()
    }

    /// Number of floor cells the robot could occupy.
    pub fn free_cell_count(&self) -> usize {
        self.width * self.height - self.count_obstacles()
    }

    /// Every coordinate on the map, bottom row first, left to right.
    pub fn coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| GridCoord::new(x as isize, y as isize))
        })
    }

    /// Every floor coordinate, in the same order as [`Grid::coords`].
    pub fn free_coords(&self) -> impl Iterator<Item = GridCoord> + '_ {
        self.coords().filter(move |&coord| self.is_free(coord))
    }
}

impl FromStr for Grid {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Prints the map back in its text form, top row first.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                write!(f, "{}", self.cells[y * self.width + x].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
