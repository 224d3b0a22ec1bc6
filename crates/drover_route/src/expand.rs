//! Route expansion over iteration ranges, with axis pinning and dedup.
//!
//! One route declaration stands for a whole family of tile-to-tile routes:
//! each side selects tiles through an X and a Y iteration range, and every
//! combination of offsets yields one concrete (start, delta) instance. A
//! destination axis iterating over the *same range object* as a source axis
//! does not iterate independently; it is pinned to the source's offset,
//! which is how a shared or broadcast axis is expressed. Instances whose
//! (start, delta) key has already been routed this pass are skipped.

use crate::error::RouteError;
use crate::occupancy::Occupancy;
use crate::path;
use drover_grid::Coord;
use drover_ir::{Design, HerdSelect, RouteDecl};
use std::collections::HashSet;

/// Identity of one concrete route instance, for pass-wide deduplication.
///
/// Deliberately excludes ports and herds: two instances with equal start
/// and delta are the same wires on the grid, and only the first is routed.
pub type RouteKey = (Coord, (i32, i32));

/// Expands `route` into concrete instances and routes each new one.
///
/// `dist` is the placement distance for the route's herd pair. `routed`
/// carries route keys across all route declarations of a pass; keys already
/// present are skipped without touching `occupancy`.
pub fn expand_route(
    design: &Design,
    route: &RouteDecl,
    dist: (i32, i32),
    routed: &mut HashSet<RouteKey>,
    occupancy: &mut Occupancy,
) -> Result<(), RouteError> {
    let src_x = design.ranges[route.source.iter_x];
    let src_y = design.ranges[route.source.iter_y];
    let dst_x = design.ranges[route.dest.iter_x];
    let dst_y = design.ranges[route.dest.iter_y];

    for x0 in src_x.values() {
        for y0 in src_y.values() {
            for xd in dst_x.values() {
                for yd in dst_y.values() {
                    let (x1, y1) = pin_axes(&route.source, &route.dest, (x0, y0), (xd, yd));
                    let start = Coord::new(x0, y0);
                    let delta = (dist.0 + x1 - x0, dist.1 + y1 - y0);
                    if !routed.insert((start, delta)) {
                        tracing::trace!(
                            "skipping duplicate route {} + ({}, {})",
                            start,
                            delta.0,
                            delta.1
                        );
                        continue;
                    }
                    path::build_route(
                        occupancy,
                        route.source.herd,
                        start,
                        delta,
                        route.source_port,
                        route.dest_port,
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Applies the shared-axis pinning rules to one loop combination.
///
/// Each destination axis whose range is identical (by [`RangeId`]) to a
/// source axis range takes that source axis's offset instead of its own
/// loop value. When the source uses one range for both of its axes, the
/// source Y binding wins.
///
/// [`RangeId`]: drover_ir::RangeId
fn pin_axes(
    source: &HerdSelect,
    dest: &HerdSelect,
    (x0, y0): (i32, i32),
    (xd, yd): (i32, i32),
) -> (i32, i32) {
    let mut x1 = xd;
    let mut y1 = yd;
    if dest.iter_x == source.iter_x {
        x1 = x0;
    }
    if dest.iter_y == source.iter_x {
        y1 = x0;
    }
    if dest.iter_x == source.iter_y {
        x1 = y0;
    }
    if dest.iter_y == source.iter_y {
        y1 = y0;
    }
    (x1, y1)
}
