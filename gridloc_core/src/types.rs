// gridloc_core/src/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// --- Core Coordinate ---

/// A 2D index into the maze. `(0, 0)` is the bottom-left cell; `y` grows upward.
///
/// Signed so that neighbor arithmetic can step off the map and be rejected by a
/// bounds check instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: isize,
    pub y: isize,
}

impl GridCoord {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate shifted by `(dx, dy)`.
    pub const fn offset(self, dx: isize, dy: isize) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(isize, isize)> for GridCoord {
    fn from((x, y): (isize, isize)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// --- Color Alphabet ---

/// The four floor tints a free cell can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
    Yellow,
}

impl Color {
    /// Every color, in the order used when drawing a wrong sensor reading.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Blue, Color::Yellow];

    /// The map symbol for this color.
    pub const fn symbol(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Yellow => 'y',
        }
    }

    /// Parses a map symbol, ignoring case.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_lowercase() {
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'b' => Some(Color::Blue),
            'y' => Some(Color::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// What a single sensor reading reports. Not necessarily the true cell color.
pub type Observation = Color;

// --- Cell Kind ---

/// The symbol that marks a wall in the map text.
pub const WALL_SYMBOL: char = '#';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Blocked,
    Free(Color),
}

impl Cell {
    pub const fn is_free(self) -> bool {
        matches!(self, Cell::Free(_))
    }

    /// The color of a free cell, `None` for a wall.
    pub const fn color(self) -> Option<Color> {
        match self {
            Cell::Free(color) => Some(color),
            Cell::Blocked => None,
        }
    }

    pub const fn symbol(self) -> char {
        match self {
            Cell::Free(color) => color.symbol(),
            Cell::Blocked => WALL_SYMBOL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_symbols_parse_case_insensitively() {
        for color in Color::ALL {
            assert_eq!(Color::from_symbol(color.symbol()), Some(color));
            assert_eq!(
                Color::from_symbol(color.symbol().to_ascii_uppercase()),
                Some(color)
            );
        }
        assert_eq!(Color::from_symbol('#'), None);
        assert_eq!(Color::from_symbol('x'), None);
    }

    #[test]
    fn blocked_cells_have_no_color() {
        assert_eq!(Cell::Blocked.color(), None);
        assert!(!Cell::Blocked.is_free());
        assert_eq!(Cell::Free(Color::Blue).color(), Some(Color::Blue));
        assert_eq!(Cell::Blocked.symbol(), '#');
    }
}
