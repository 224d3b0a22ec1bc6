//! Top-level container threaded through a routing pass.

use crate::arena::Arena;
use crate::decl::{HerdDecl, HerdSelect, IterRange, PlaceDecl, RouteDecl, SwitchboxDecl};
use crate::ids::{HerdId, RangeId};
use drover_grid::Port;
use serde::{Deserialize, Serialize};

/// A herd-level design: the declarations the routing pass consumes plus the
/// switchboxes it produces.
///
/// Place and route declarations are drained by a successful pass;
/// switchboxes start empty and are appended by it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// Herd declarations, keyed by [`HerdId`].
    pub herds: Arena<HerdId, HerdDecl>,
    /// Iteration ranges, keyed by [`RangeId`]. Allocation here is what
    /// defines range identity.
    pub ranges: Arena<RangeId, IterRange>,
    /// Placement facts between herd pairs.
    pub places: Vec<PlaceDecl>,
    /// Route requests, in declaration order.
    pub routes: Vec<RouteDecl>,
    /// Switchboxes materialized by routing.
    pub switchboxes: Vec<SwitchboxDecl>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a herd and returns its ID.
    pub fn add_herd(&mut self, name: impl Into<String>) -> HerdId {
        self.herds.alloc(HerdDecl { name: name.into() })
    }

    /// Allocates an iteration range and returns its identity.
    pub fn add_range(&mut self, start: i32, end: i32, stride: i32) -> RangeId {
        self.ranges.alloc(IterRange::new(start, end, stride))
    }

    /// Declares the placement distance from `source`'s origin to `dest`'s.
    pub fn add_place(&mut self, source: HerdId, dest: HerdId, dist_x: i32, dist_y: i32) {
        self.places.push(PlaceDecl {
            source,
            dest,
            dist_x,
            dist_y,
        });
    }

    /// Declares a route request between two herd selections.
    pub fn add_route(
        &mut self,
        source: HerdSelect,
        source_port: Port,
        dest: HerdSelect,
        dest_port: Port,
    ) {
        self.routes.push(RouteDecl {
            source,
            source_port,
            dest,
            dest_port,
        });
    }

    /// The declared name of `herd`.
    pub fn herd_name(&self, herd: HerdId) -> &str {
        &self.herds[herd].name
    }
}
