//! Herd-level declarations consumed and produced by the routing pass.

use crate::ids::{HerdId, RangeId};
use drover_grid::{Connect, Port};
use serde::{Deserialize, Serialize};

/// A placed cluster of compute tiles.
///
/// The router treats the herd as an opaque identity that partitions switch
/// occupancy; only the name surfaces, in error messages and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HerdDecl {
    /// Human-readable name from the source program.
    pub name: String,
}

/// A half-open, strided iteration over tile offsets: `start`, `start +
/// stride`, and so on below `end`.
///
/// Ranges turn one route declaration into a family of concrete routes.
/// A range value says nothing about identity: sameness is [`RangeId`]
/// equality, assigned at allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterRange {
    /// First offset produced.
    pub start: i32,
    /// Exclusive upper bound.
    pub end: i32,
    /// Step between consecutive offsets. Routable ranges have `stride >= 1`.
    pub stride: i32,
}

impl IterRange {
    /// Creates a range over `start..end` advancing by `stride`.
    pub fn new(start: i32, end: i32, stride: i32) -> Self {
        Self { start, end, stride }
    }

    /// Whether the stride can make forward progress.
    pub fn is_valid(&self) -> bool {
        self.stride >= 1
    }

    /// Iterates the concrete offsets of the range.
    ///
    /// Yields nothing when `end <= start`. A non-positive stride also
    /// yields nothing rather than spinning; callers that care reject it
    /// via [`is_valid`](Self::is_valid) first.
    pub fn values(self) -> impl Iterator<Item = i32> {
        let IterRange { start, end, stride } = self;
        let mut next = start;
        std::iter::from_fn(move || {
            if stride < 1 || next >= end {
                return None;
            }
            let value = next;
            next += stride;
            Some(value)
        })
    }
}

/// One side of a route request: a herd plus an iteration range per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HerdSelect {
    /// The herd whose tiles are selected.
    pub herd: HerdId,
    /// X offsets relative to the herd origin.
    pub iter_x: RangeId,
    /// Y offsets relative to the herd origin.
    pub iter_y: RangeId,
}

impl HerdSelect {
    /// Creates a selection of `herd` tiles over the two axis ranges.
    pub fn new(herd: HerdId, iter_x: RangeId, iter_y: RangeId) -> Self {
        Self { herd, iter_x, iter_y }
    }
}

/// A placement fact: the grid distance from one herd's origin to another's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDecl {
    /// Herd the distance is measured from.
    pub source: HerdId,
    /// Herd the distance is measured to.
    pub dest: HerdId,
    /// Origin-to-origin distance along x, in switches.
    pub dist_x: i32,
    /// Origin-to-origin distance along y, in switches.
    pub dist_y: i32,
}

/// A request to route streams from one herd selection to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDecl {
    /// Source tiles.
    pub source: HerdSelect,
    /// Port each route leaves its source tile through.
    pub source_port: Port,
    /// Destination tiles.
    pub dest: HerdSelect,
    /// Port each route enters its destination tile through.
    pub dest_port: Port,
}

/// A configured switchbox produced by the routing pass.
///
/// The select pins exactly one coordinate through a pair of single-value
/// ranges; the connects carry the switch configuration in the order the
/// router committed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchboxDecl {
    /// The switch being configured.
    pub select: HerdSelect,
    /// Input-to-output connections inside the switch.
    pub connects: Vec<Connect>,
}
