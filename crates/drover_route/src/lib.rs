//! Herd-to-herd stream routing over a switchbox grid.
//!
//! This crate is the routing pass of the Drover pipeline. It consumes the
//! place and route declarations of a [`Design`], expands each route request
//! over its iteration ranges into concrete route instances, walks a
//! Manhattan path per instance while allocating per-bundle switch channels,
//! and materializes the accumulated per-switch connection lists as
//! switchbox declarations.
//!
//! A pass runs in four stages:
//!
//! 1. validate placement facts and iteration strides, before any switch is
//!    touched;
//! 2. expand route declarations, in declaration order, deduplicating
//!    (start, delta) instances pass-wide;
//! 3. build one path per new instance against the shared [`Occupancy`],
//!    backtracking around congestion;
//! 4. emit switchbox declarations and drain the consumed place and route
//!    declarations.
//!
//! ```
//! use drover_grid::{Bundle, CapacityTable, Port};
//! use drover_ir::{Design, HerdSelect};
//! use drover_route::route_herds;
//!
//! let mut design = Design::new();
//! let producer = design.add_herd("producer");
//! let consumer = design.add_herd("consumer");
//! let unit = design.add_range(0, 1, 1);
//! design.add_place(producer, consumer, 2, 0);
//! design.add_route(
//!     HerdSelect::new(producer, unit, unit),
//!     Port::new(Bundle::Core, 0),
//!     HerdSelect::new(consumer, unit, unit),
//!     Port::new(Bundle::Core, 1),
//! );
//!
//! let occupancy = route_herds(&mut design, CapacityTable::default())?;
//! assert_eq!(occupancy.connect_count(), 3);
//! assert_eq!(design.switchboxes.len(), 3);
//! assert!(design.routes.is_empty());
//! # Ok::<(), drover_route::RouteError>(())
//! ```

#![warn(missing_docs)]

pub mod emit;
pub mod error;
pub mod expand;
pub mod occupancy;
pub mod path;

pub use emit::materialize_switchboxes;
pub use error::RouteError;
pub use expand::{expand_route, RouteKey};
pub use occupancy::{Occupancy, SwitchKey};
pub use path::build_route;

use drover_grid::CapacityTable;
use drover_ir::{Design, HerdId};
use std::collections::{HashMap, HashSet};

/// Routes every route declaration of `design` and materializes switchboxes.
///
/// Route declarations are processed strictly in declaration order against
/// one shared occupancy, so a given design routes the same way every run.
/// On success the consumed place and route declarations are drained,
/// switchbox declarations are appended, and the final occupancy is returned
/// for inspection. On error the design is left exactly as it was.
pub fn route_herds(design: &mut Design, caps: CapacityTable) -> Result<Occupancy, RouteError> {
    let distances = placement_distances(design)?;
    validate_routes(design, &distances)?;
    tracing::debug!(
        "routing {} declarations across {} herds",
        design.routes.len(),
        design.herds.len()
    );

    let mut occupancy = Occupancy::new(caps);
    let mut routed = HashSet::new();
    for route in &design.routes {
        let dist = distances[&(route.source.herd, route.dest.herd)];
        expand::expand_route(design, route, dist, &mut routed, &mut occupancy)?;
    }

    emit::materialize_switchboxes(design, &occupancy);
    design.places.clear();
    design.routes.clear();
    Ok(occupancy)
}

/// Collects the per-pair placement distances, rejecting duplicates.
fn placement_distances(
    design: &Design,
) -> Result<HashMap<(HerdId, HerdId), (i32, i32)>, RouteError> {
    let mut distances = HashMap::new();
    for place in &design.places {
        let pair = (place.source, place.dest);
        if distances.insert(pair, (place.dist_x, place.dist_y)).is_some() {
            return Err(RouteError::DuplicatePlacement {
                source_herd: design.herd_name(place.source).to_string(),
                dest_herd: design.herd_name(place.dest).to_string(),
            });
        }
    }
    Ok(distances)
}

/// Checks every route against the distance map and its ranges' strides.
fn validate_routes(
    design: &Design,
    distances: &HashMap<(HerdId, HerdId), (i32, i32)>,
) -> Result<(), RouteError> {
    for route in &design.routes {
        if !distances.contains_key(&(route.source.herd, route.dest.herd)) {
            return Err(RouteError::MissingPlacement {
                source_herd: design.herd_name(route.source.herd).to_string(),
                dest_herd: design.herd_name(route.dest.herd).to_string(),
            });
        }
        for select in [&route.source, &route.dest] {
            for range_id in [select.iter_x, select.iter_y] {
                let range = design.ranges[range_id];
                if !range.is_valid() {
                    return Err(RouteError::InvalidStride {
                        start: range.start,
                        end: range.end,
                        stride: range.stride,
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drover_grid::{Bundle, Port};
    use drover_ir::HerdSelect;

    fn linked_pair(dist: (i32, i32)) -> Design {
        let mut design = Design::new();
        let producer = design.add_herd("producer");
        let consumer = design.add_herd("consumer");
        let unit = design.add_range(0, 1, 1);
        design.add_place(producer, consumer, dist.0, dist.1);
        design.add_route(
            HerdSelect::new(producer, unit, unit),
            Port::new(Bundle::Core, 0),
            HerdSelect::new(consumer, unit, unit),
            Port::new(Bundle::Core, 1),
        );
        design
    }

    #[test]
    fn routes_a_simple_design_end_to_end() {
        let mut design = linked_pair((2, 1));
        let occupancy = route_herds(&mut design, CapacityTable::default()).unwrap();

        // |dX| + |dY| hops plus the destination connection.
        assert_eq!(occupancy.connect_count(), 4);
        assert_eq!(design.switchboxes.len(), 4);
        assert!(design.places.is_empty());
        assert!(design.routes.is_empty());
    }

    #[test]
    fn missing_placement_is_reported_before_routing() {
        let mut design = linked_pair((2, 0));
        design.places.clear();

        let err = route_herds(&mut design, CapacityTable::default()).unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingPlacement {
                source_herd: "producer".to_string(),
                dest_herd: "consumer".to_string(),
            }
        );
        // The failed pass consumed nothing.
        assert_eq!(design.routes.len(), 1);
        assert!(design.switchboxes.is_empty());
    }

    #[test]
    fn duplicate_placement_is_rejected() {
        let mut design = linked_pair((2, 0));
        let producer = design.routes[0].source.herd;
        let consumer = design.routes[0].dest.herd;
        design.add_place(producer, consumer, 9, 9);

        let err = route_herds(&mut design, CapacityTable::default()).unwrap_err();
        assert_eq!(
            err,
            RouteError::DuplicatePlacement {
                source_herd: "producer".to_string(),
                dest_herd: "consumer".to_string(),
            }
        );
        assert_eq!(design.places.len(), 2);
    }

    #[test]
    fn non_positive_strides_are_rejected_up_front() {
        let mut design = linked_pair((2, 0));
        let producer = design.routes[0].source.herd;
        let consumer = design.routes[0].dest.herd;
        let bad = design.add_range(0, 4, 0);
        let unit = design.routes[0].source.iter_y;
        design.add_route(
            HerdSelect::new(producer, bad, unit),
            Port::new(Bundle::Dma, 0),
            HerdSelect::new(consumer, unit, unit),
            Port::new(Bundle::Dma, 1),
        );

        let err = route_herds(&mut design, CapacityTable::default()).unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidStride {
                start: 0,
                end: 4,
                stride: 0,
            }
        );
        // Validation failed before the first (valid) route touched a switch.
        assert_eq!(design.routes.len(), 2);
        assert!(design.switchboxes.is_empty());
    }

    #[test]
    fn unroutable_design_leaves_declarations_in_place() {
        let mut design = linked_pair((1, 0));
        let err = route_herds(&mut design, CapacityTable::uniform(0)).unwrap_err();
        assert!(matches!(err, RouteError::Unroutable { .. }));
        assert_eq!(design.routes.len(), 1);
        assert_eq!(design.places.len(), 1);
        assert!(design.switchboxes.is_empty());
    }

    #[test]
    fn identical_designs_route_identically() {
        let run = || {
            let mut design = linked_pair((3, 2));
            let occupancy = route_herds(&mut design, CapacityTable::default()).unwrap();
            serde_json::to_string(&occupancy).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn routes_are_processed_in_declaration_order() {
        let mut design = Design::new();
        let a = design.add_herd("a");
        let b = design.add_herd("b");
        let near = design.add_range(0, 1, 1);
        let far = design.add_range(1, 2, 1);
        design.add_place(a, b, 1, 0);
        design.add_route(
            HerdSelect::new(a, near, near),
            Port::new(Bundle::Core, 0),
            HerdSelect::new(b, near, near),
            Port::new(Bundle::Dma, 0),
        );
        design.add_route(
            HerdSelect::new(a, near, near),
            Port::new(Bundle::Core, 1),
            HerdSelect::new(b, far, near),
            Port::new(Bundle::Dma, 1),
        );

        let occupancy = route_herds(&mut design, CapacityTable::default()).unwrap();
        let origin = SwitchKey::new(a, drover_grid::Coord::new(0, 0));
        // The first declaration claimed east channel 0, the second channel 1.
        let channels: Vec<_> = occupancy
            .connects(origin)
            .iter()
            .map(|c| (c.src.channel, c.dst.channel))
            .collect();
        assert_eq!(channels, vec![(0, 0), (1, 1)]);
    }
}
