//! Switch-grid geometry and port model for the Drover herd router.
//!
//! This crate holds the vocabulary types shared by every stage of the
//! routing pipeline: grid coordinates, hop directions, switchbox port
//! bundles, configured connections, and the per-bundle channel capacity
//! table of the target fabric.
//!
//! # Example
//!
//! ```
//! use drover_grid::{Coord, Direction};
//!
//! let origin = Coord::new(0, 0);
//! assert_eq!(origin.step(Direction::East), Coord::new(1, 0));
//! assert_eq!(Direction::East.opposite(), Direction::West);
//! ```

#![warn(missing_docs)]

pub mod capacity;
pub mod coord;
pub mod direction;
pub mod port;

pub use capacity::CapacityTable;
pub use coord::Coord;
pub use direction::Direction;
pub use port::{Bundle, Connect, Port};
