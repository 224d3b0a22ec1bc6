//! Switchbox bundles, ports, and configured connections.

use crate::direction::Direction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The bundle half of a switchbox port.
///
/// Stream bundles face the neighboring switch in their direction and are the
/// only bundles a path may travel through. The remaining bundles attach
/// tile-local endpoints; routes start or end on them but never pass through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bundle {
    /// Stream channels toward the neighboring switch in the given direction.
    Stream(Direction),
    /// The tile's compute core.
    Core,
    /// The tile's DMA engine.
    Dma,
    /// The tile-local FIFO buffers.
    Fifo,
}

impl Bundle {
    /// The hop direction of a stream bundle, or `None` for a tile-local one.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Bundle::Stream(dir) => Some(dir),
            Bundle::Core | Bundle::Dma | Bundle::Fifo => None,
        }
    }
}

impl fmt::Display for Bundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bundle::Stream(dir) => write!(f, "{dir}"),
            Bundle::Core => write!(f, "Core"),
            Bundle::Dma => write!(f, "DMA"),
            Bundle::Fifo => write!(f, "FIFO"),
        }
    }
}

/// One endpoint of a connection: a bundle plus a channel index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// The bundle the port belongs to.
    pub bundle: Bundle,
    /// Channel index within the bundle, counting from 0.
    pub channel: u8,
}

impl Port {
    /// Creates a port from a bundle and a channel index.
    pub fn new(bundle: Bundle, channel: u8) -> Self {
        Self { bundle, channel }
    }

    /// Shorthand for a stream port facing `dir`.
    pub fn stream(dir: Direction, channel: u8) -> Self {
        Self::new(Bundle::Stream(dir), channel)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.bundle, self.channel)
    }
}

/// One input-to-output linkage configured inside a single switchbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connect {
    /// Switch-side input the signal arrives on.
    pub src: Port,
    /// Switch-side output the signal leaves on.
    pub dst: Port,
}

impl Connect {
    /// Creates a connection from its input and output ports.
    pub fn new(src: Port, dst: Port) -> Self {
        Self { src, dst }
    }
}

impl fmt::Display for Connect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} -> {}>", self.src, self.dst)
    }
}
