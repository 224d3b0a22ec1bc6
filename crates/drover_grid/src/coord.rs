//! Switch coordinates on the routing grid.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of one switch, relative to the origin of the herd group it
/// belongs to.
///
/// Offsets are signed: a route that detours past the edge of its herd's
/// footprint walks through negative coordinates without any special casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Column, growing east.
    pub x: i32,
    /// Row, growing north.
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate from its column and row.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one hop away in `dir`.
    pub fn step(self, dir: Direction) -> Coord {
        Coord::new(self.x + dir.dx(), self.y + dir.dy())
    }

    /// The coordinate displaced by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
