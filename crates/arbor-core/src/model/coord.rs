use core::fmt;
use serde::{Deserialize, Serialize};

/// Grid position in a tableau. Unbounded in every direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    /// Up, down, right, left.
    pub const OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn neighbors(self) -> [Coord; 4] {
        Self::OFFSETS.map(|(dx, dy)| Coord::new(self.x + dx, self.y + dy))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (i32, i32) {
    fn from(coord: Coord) -> Self {
        (coord.x, coord.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
