//! Per-bundle channel capacities of a switchbox.

use crate::direction::Direction;
use crate::port::Bundle;
use serde::{Deserialize, Serialize};

/// Number of channels a switchbox offers on each bundle.
///
/// Every switch of the fabric shares one table. The default matches the
/// tile fabric drover targets: six northbound channels, four in each other
/// cardinal direction, and two on each tile-local bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityTable {
    /// Channels on the north stream bundle.
    pub north: u8,
    /// Channels on the south stream bundle.
    pub south: u8,
    /// Channels on the east stream bundle.
    pub east: u8,
    /// Channels on the west stream bundle.
    pub west: u8,
    /// Channels on each tile-local bundle (core, DMA, FIFO).
    pub local: u8,
}

impl CapacityTable {
    /// A table with the same number of channels on every bundle.
    ///
    /// Zero is allowed; it makes every switch immediately exhausted, which
    /// is useful for exercising failure paths.
    pub fn uniform(channels: u8) -> Self {
        Self {
            north: channels,
            south: channels,
            east: channels,
            west: channels,
            local: channels,
        }
    }

    /// The channel capacity of `bundle`.
    pub fn capacity(&self, bundle: Bundle) -> u8 {
        match bundle {
            Bundle::Stream(Direction::North) => self.north,
            Bundle::Stream(Direction::South) => self.south,
            Bundle::Stream(Direction::East) => self.east,
            Bundle::Stream(Direction::West) => self.west,
            Bundle::Core | Bundle::Dma | Bundle::Fifo => self.local,
        }
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self {
            north: 6,
            south: 4,
            east: 4,
            west: 4,
            local: 2,
        }
    }
}
