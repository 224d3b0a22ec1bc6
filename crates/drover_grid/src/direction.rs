//! Cardinal hop directions on the switch grid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four directions a route can hop between neighboring switches.
///
/// The grid is oriented with x growing east and y growing north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward larger y.
    North,
    /// Toward smaller y.
    South,
    /// Toward larger x.
    East,
    /// Toward smaller x.
    West,
}

impl Direction {
    /// All four directions, in the fixed order the path builder probes them
    /// when no direction makes progress toward the destination.
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::North,
        Direction::South,
    ];

    /// The direction pointing the opposite way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// X displacement of a single hop in this direction.
    pub fn dx(self) -> i32 {
        match self {
            Direction::East => 1,
            Direction::West => -1,
            Direction::North | Direction::South => 0,
        }
    }

    /// Y displacement of a single hop in this direction.
    pub fn dy(self) -> i32 {
        match self {
            Direction::North => 1,
            Direction::South => -1,
            Direction::East | Direction::West => 0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        };
        write!(f, "{name}")
    }
}
