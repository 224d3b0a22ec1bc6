//! Manhattan path construction with channel allocation and backtracking.
//!
//! One invocation routes one concrete route instance. The builder walks the
//! grid from the start coordinate toward the destination one hop at a time,
//! allocating the lowest free outbound stream channel at each switch and
//! committing the corresponding connection at the switch it leaves. A switch
//! offering no usable direction is marked congested for the remainder of the
//! search and the builder retreats along an explicit hop stack, undoing the
//! connection that led in. Running out of stack, or out of hop budget, is a
//! hard routing failure.

use crate::error::RouteError;
use crate::occupancy::{Occupancy, SwitchKey};
use drover_grid::{Bundle, Connect, Coord, Direction, Port};
use drover_ir::HerdId;
use std::collections::HashSet;

/// One committed hop: enough to undo it and resume the search at its origin.
#[derive(Debug, Clone, Copy)]
struct Hop {
    /// Switch the hop left from.
    from: Coord,
    /// Inbound port at `from` before the hop was taken.
    inbound: Port,
    /// Direction the hop moved in.
    dir: Direction,
}

/// Candidate directions for one step, most promising first.
///
/// Directions that close the distance to `dest` lead (x axis before y), then
/// the remaining directions follow in the fixed [`Direction::ALL`] order, so
/// each direction is probed at most once per step.
fn candidate_moves(cur: Coord, dest: Coord) -> Vec<Direction> {
    let mut moves = Vec::with_capacity(4);
    if cur.x < dest.x {
        moves.push(Direction::East);
    }
    if cur.x > dest.x {
        moves.push(Direction::West);
    }
    if cur.y < dest.y {
        moves.push(Direction::North);
    }
    if cur.y > dest.y {
        moves.push(Direction::South);
    }
    for dir in Direction::ALL {
        if !moves.contains(&dir) {
            moves.push(dir);
        }
    }
    moves
}

/// Routes one concrete instance from `start` to `start + delta`, committing
/// connections into `occupancy` under `herd`'s switch group.
///
/// The connection at `start` uses `source_port` as its input; the final
/// connection at the destination outputs to `dest_port`, which is taken as
/// given and not allocated. A zero-length delta commits exactly that final
/// connection and nothing else.
///
/// The search commits at most a bounded number of hops, scaled from the
/// route's Manhattan length and the number of switches already occupied;
/// spending the whole budget fails the route. On failure the speculative
/// hops have been undone, so `occupancy` is back to its state from before
/// the call.
pub fn build_route(
    occupancy: &mut Occupancy,
    herd: HerdId,
    start: Coord,
    delta: (i32, i32),
    source_port: Port,
    dest_port: Port,
) -> Result<(), RouteError> {
    let dest = start.offset(delta.0, delta.1);
    // Cap on total committed hops: Manhattan length plus an allowance per
    // occupied switch. A walk still going past this is drifting away from
    // the destination, not detouring around congestion.
    let budget = (delta.0.unsigned_abs() + delta.1.unsigned_abs()) as usize
        + 4 * (occupancy.switch_count() + 1);
    tracing::debug!("routing {} -> {}", start, dest);

    let mut cur = start;
    let mut inbound = source_port;
    let mut congested: HashSet<Coord> = HashSet::new();
    let mut hops: Vec<Hop> = Vec::new();
    let mut spent = 0;

    while cur != dest {
        if spent >= budget {
            tracing::debug!("hop budget {} spent, giving up at {}", budget, cur);
            while let Some(hop) = hops.pop() {
                occupancy.undo_last(SwitchKey::new(herd, hop.from));
            }
            return Err(RouteError::Unroutable { start, dest, at: cur });
        }
        let mut advanced = false;
        for dir in candidate_moves(cur, dest) {
            // No immediate U-turn through the port pair just used.
            if hops.last().is_some_and(|hop| dir == hop.dir.opposite()) {
                continue;
            }
            let key = SwitchKey::new(herd, cur);
            let Some(channel) = occupancy.free_channel(key, Bundle::Stream(dir)) else {
                continue;
            };
            let next = cur.step(dir);
            if congested.contains(&next) {
                continue;
            }

            let outbound = Port::stream(dir, channel);
            tracing::trace!("{}: {} -> {}", cur, inbound, outbound);
            occupancy.record(key, Connect::new(inbound, outbound));
            hops.push(Hop { from: cur, inbound, dir });
            spent += 1;
            inbound = Port::stream(dir.opposite(), channel);
            cur = next;
            advanced = true;
            break;
        }

        if !advanced {
            // Out of options here: congest this switch and retreat one hop,
            // undoing the connection that led in.
            congested.insert(cur);
            let Some(hop) = hops.pop() else {
                tracing::debug!("unroutable: exhausted at {}", cur);
                return Err(RouteError::Unroutable { start, dest, at: cur });
            };
            tracing::debug!("congestion at {}, retreating to {}", cur, hop.from);
            occupancy.undo_last(SwitchKey::new(herd, hop.from));
            cur = hop.from;
            inbound = hop.inbound;
        }
    }

    occupancy.record(SwitchKey::new(herd, cur), Connect::new(inbound, dest_port));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drover_grid::CapacityTable;
    use drover_ir::EntityId;

    fn herd() -> HerdId {
        HerdId::from_index(0)
    }

    fn key(x: i32, y: i32) -> SwitchKey {
        SwitchKey::new(herd(), Coord::new(x, y))
    }

    fn seed(occ: &mut Occupancy, x: i32, y: i32, dir: Direction, channel: u8) {
        occ.record(
            key(x, y),
            Connect::new(Port::new(Bundle::Core, 0), Port::stream(dir, channel)),
        );
    }

    #[test]
    fn candidates_prefer_closing_directions() {
        use Direction::*;
        let at = |cx, cy, dx, dy| candidate_moves(Coord::new(cx, cy), Coord::new(dx, dy));
        assert_eq!(at(0, 0, 2, 0), vec![East, West, North, South]);
        assert_eq!(at(2, 0, 0, 0), vec![West, East, North, South]);
        assert_eq!(at(0, 0, 2, 3), vec![East, North, West, South]);
        assert_eq!(at(2, 3, 0, 0), vec![West, South, East, North]);
        assert_eq!(at(0, 0, 0, -1), vec![South, East, West, North]);
        assert_eq!(at(0, 0, 0, 0), vec![East, West, North, South]);
    }

    #[test]
    fn routes_straight_east() {
        let mut occ = Occupancy::new(CapacityTable::default());
        build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::stream(Direction::East, 0),
            Port::stream(Direction::West, 0),
        )
        .unwrap();

        assert_eq!(
            occ.connects(key(0, 0)),
            &[Connect::new(
                Port::stream(Direction::East, 0),
                Port::stream(Direction::East, 0)
            )]
        );
        assert_eq!(
            occ.connects(key(1, 0)),
            &[Connect::new(
                Port::stream(Direction::West, 0),
                Port::stream(Direction::East, 0)
            )]
        );
        assert_eq!(
            occ.connects(key(2, 0)),
            &[Connect::new(
                Port::stream(Direction::West, 0),
                Port::stream(Direction::West, 0)
            )]
        );
        assert_eq!(occ.switch_count(), 3);
    }

    #[test]
    fn zero_delta_emits_only_the_endpoint_connection() {
        let mut occ = Occupancy::new(CapacityTable::default());
        build_route(
            &mut occ,
            herd(),
            Coord::new(3, 4),
            (0, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Dma, 1),
        )
        .unwrap();

        assert_eq!(occ.switch_count(), 1);
        assert_eq!(
            occ.connects(key(3, 4)),
            &[Connect::new(Port::new(Bundle::Core, 0), Port::new(Bundle::Dma, 1))]
        );
    }

    #[test]
    fn l_shaped_route_closes_x_before_y() {
        let mut occ = Occupancy::new(CapacityTable::default());
        build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 1),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 1),
        )
        .unwrap();

        let coords: Vec<_> = occ.iter().map(|(k, _)| k.coord).collect();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(2, 1),
            ]
        );
        assert_eq!(
            occ.connects(key(2, 0)),
            &[Connect::new(
                Port::stream(Direction::West, 0),
                Port::stream(Direction::North, 0)
            )]
        );
        assert_eq!(
            occ.connects(key(2, 1)),
            &[Connect::new(
                Port::stream(Direction::South, 0),
                Port::new(Bundle::Core, 1)
            )]
        );
    }

    #[test]
    fn parallel_routes_take_ascending_channels() {
        let mut occ = Occupancy::new(CapacityTable::default());
        for channel in 0..2 {
            build_route(
                &mut occ,
                herd(),
                Coord::new(0, 0),
                (1, 0),
                Port::new(Bundle::Core, channel),
                Port::new(Bundle::Core, channel),
            )
            .unwrap();
        }

        assert_eq!(
            occ.connects(key(0, 0)),
            &[
                Connect::new(Port::new(Bundle::Core, 0), Port::stream(Direction::East, 0)),
                Connect::new(Port::new(Bundle::Core, 1), Port::stream(Direction::East, 1)),
            ]
        );
    }

    #[test]
    fn detours_around_exhausted_directions() {
        let mut occ = Occupancy::new(CapacityTable::default());
        // Seal both horizontal bundles at the start switch.
        for channel in 0..4 {
            seed(&mut occ, 0, 0, Direction::East, channel);
            seed(&mut occ, 0, 0, Direction::West, channel);
        }

        build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 1),
        )
        .unwrap();

        // Forced north first, then east along the next row, then back south.
        let ours = occ.connects(key(0, 0)).last().copied().unwrap();
        assert_eq!(ours.dst, Port::stream(Direction::North, 0));
        let coords: Vec<_> = occ.iter().map(|(k, _)| k.coord).collect();
        assert_eq!(
            coords,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 1),
                Coord::new(2, 1),
                Coord::new(2, 0),
            ]
        );
        assert_eq!(
            occ.connects(key(2, 0)),
            &[Connect::new(
                Port::stream(Direction::North, 0),
                Port::new(Bundle::Core, 1)
            )]
        );
    }

    #[test]
    fn hop_budget_bounds_a_divergent_search() {
        let mut occ = Occupancy::new(CapacityTable::default());
        // Seal only east at the start switch. West stays open, so every
        // step the fallback order picks leads farther from the goal, with
        // the forbidden U-turn always pointing back the way we came.
        for channel in 0..4 {
            seed(&mut occ, 0, 0, Direction::East, channel);
        }

        let err = build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 1),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RouteError::Unroutable {
                start: Coord { x: 0, y: 0 },
                dest: Coord { x: 2, y: 0 },
                ..
            }
        ));
        // Every speculative hop was undone; only the seeds remain.
        assert_eq!(occ.connect_count(), 4);
        assert_eq!(occ.switch_count(), 1);
    }

    #[test]
    fn backtracks_out_of_a_dead_end() {
        let mut occ = Occupancy::new(CapacityTable::uniform(1));
        // (1, 0) lets a route in from the west and nothing else; (0, 0) has
        // no west channel left either, so the retry must go north.
        seed(&mut occ, 1, 0, Direction::East, 0);
        seed(&mut occ, 1, 0, Direction::North, 0);
        seed(&mut occ, 1, 0, Direction::South, 0);
        seed(&mut occ, 0, 0, Direction::West, 0);

        build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 0),
        )
        .unwrap();

        // The speculative hop into (1, 0) was undone: no east connection
        // from this route remains at (0, 0).
        let at_origin = occ.connects(key(0, 0));
        assert_eq!(at_origin.len(), 2);
        assert_eq!(at_origin[1].dst, Port::stream(Direction::North, 0));
        // The dead-end switch holds only the pre-seeded connections.
        assert_eq!(occ.connects(key(1, 0)).len(), 3);
        // The route still reached its destination.
        assert_eq!(
            occ.connects(key(2, 0)),
            &[Connect::new(
                Port::stream(Direction::North, 0),
                Port::new(Bundle::Core, 0)
            )]
        );
    }

    #[test]
    fn fails_when_the_first_switch_is_sealed() {
        let mut occ = Occupancy::new(CapacityTable::uniform(1));
        for dir in Direction::ALL {
            seed(&mut occ, 0, 0, dir, 0);
        }

        let err = build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (1, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 0),
        )
        .unwrap_err();

        assert_eq!(
            err,
            RouteError::Unroutable {
                start: Coord::new(0, 0),
                dest: Coord::new(1, 0),
                at: Coord::new(0, 0),
            }
        );
        // Nothing from the failed search is left behind.
        assert_eq!(occ.connect_count(), 4);
    }

    #[test]
    fn fails_after_exhausting_every_retreat() {
        let mut occ = Occupancy::new(CapacityTable::uniform(1));
        // Only east is open at the start; the switch it leads to is a dead
        // end, and after retreating the start has nothing left either.
        seed(&mut occ, 0, 0, Direction::West, 0);
        seed(&mut occ, 0, 0, Direction::North, 0);
        seed(&mut occ, 0, 0, Direction::South, 0);
        seed(&mut occ, 1, 0, Direction::East, 0);
        seed(&mut occ, 1, 0, Direction::North, 0);
        seed(&mut occ, 1, 0, Direction::South, 0);

        let err = build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 0),
        )
        .unwrap_err();

        assert_eq!(
            err,
            RouteError::Unroutable {
                start: Coord::new(0, 0),
                dest: Coord::new(2, 0),
                at: Coord::new(0, 0),
            }
        );
        assert_eq!(occ.connect_count(), 6);
    }

    #[test]
    fn revisiting_a_coordinate_from_another_direction_is_allowed() {
        let mut occ = Occupancy::new(CapacityTable::default());
        // Two routes crossing the same switch consume separate channels.
        build_route(
            &mut occ,
            herd(),
            Coord::new(0, 0),
            (2, 0),
            Port::new(Bundle::Core, 0),
            Port::new(Bundle::Core, 0),
        )
        .unwrap();
        build_route(
            &mut occ,
            herd(),
            Coord::new(1, -1),
            (0, 2),
            Port::new(Bundle::Core, 1),
            Port::new(Bundle::Core, 1),
        )
        .unwrap();

        let at_crossing = occ.connects(key(1, 0));
        assert_eq!(at_crossing.len(), 2);
        assert_eq!(at_crossing[0].dst, Port::stream(Direction::East, 0));
        assert_eq!(at_crossing[1].dst, Port::stream(Direction::North, 0));
    }
}
