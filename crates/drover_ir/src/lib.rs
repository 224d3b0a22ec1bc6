//! Herd-level design declarations for the Drover router.
//!
//! This crate is the typed boundary between the host compiler and the
//! routing core. On the input side it models herds, placement distances,
//! iteration ranges, and route requests; on the output side, the switchbox
//! declarations the routing pass materializes. The [`Design`] container
//! carries all of them through a pass.
//!
//! Entities that need identity live in arenas ([`Arena`]) keyed by opaque
//! IDs. Identity matters most for iteration ranges: two ranges with equal
//! bounds are still distinct unless they share a [`RangeId`], and that
//! distinction drives axis pinning during route expansion.

#![warn(missing_docs)]

pub mod arena;
pub mod decl;
pub mod design;
pub mod ids;

pub use arena::{Arena, EntityId};
pub use decl::{HerdDecl, HerdSelect, IterRange, PlaceDecl, RouteDecl, SwitchboxDecl};
pub use design::Design;
pub use ids::{HerdId, RangeId};
