//! Shared helpers for the Drover routing conformance suite.
//!
//! The integration tests in `tests/` exercise the routing pass through its
//! public surface only. This crate provides the design builders, occupancy
//! seeding, path tracing, and invariant checks those tests share.

#![warn(missing_docs)]

use drover_grid::{Bundle, CapacityTable, Connect, Coord, Direction, Port};
use drover_ir::{Design, HerdId, HerdSelect};
use drover_route::{Occupancy, SwitchKey};

/// Builds a design with two placed herds and one unit-range route between
/// them, using the given endpoint ports.
pub fn single_route(delta: (i32, i32), source_port: Port, dest_port: Port) -> Design {
    let mut design = Design::new();
    let source = design.add_herd("source");
    let dest = design.add_herd("dest");
    let unit = design.add_range(0, 1, 1);
    design.add_place(source, dest, delta.0, delta.1);
    design.add_route(
        HerdSelect::new(source, unit, unit),
        source_port,
        HerdSelect::new(dest, unit, unit),
        dest_port,
    );
    design
}

/// Runs the routing pass over a fresh single-route design with core
/// endpoint ports. Panics if routing fails.
pub fn route_single(delta: (i32, i32), caps: CapacityTable) -> (Design, Occupancy) {
    let mut design = single_route(delta, core_port(0), core_port(1));
    let occupancy = drover_route::route_herds(&mut design, caps).unwrap();
    (design, occupancy)
}

/// A core bundle port on the given channel.
pub fn core_port(channel: u8) -> Port {
    Port::new(Bundle::Core, channel)
}

/// Commits a filler connection claiming one destination channel of `dir` at
/// `at`.
///
/// The filler's source port uses the FIFO bundle so it can never be mistaken
/// for a hop of a route under test.
pub fn seed_channel(
    occupancy: &mut Occupancy,
    herd: HerdId,
    at: Coord,
    dir: Direction,
    channel: u8,
) {
    occupancy.record(
        SwitchKey::new(herd, at),
        Connect::new(Port::new(Bundle::Fifo, 0), Port::stream(dir, channel)),
    );
}

/// Follows one route's connections from its start, returning the switch
/// coordinates in traversal order.
///
/// Requires the route to end on a tile-local port (that is where the trace
/// stops) and its inbound ports to be unambiguous at every switch, which
/// holds for the single-route scenarios the suite builds.
pub fn trace_route(
    occupancy: &Occupancy,
    herd: HerdId,
    start: Coord,
    source_port: Port,
) -> Vec<Coord> {
    let mut path = vec![start];
    let mut cur = start;
    let mut inbound = source_port;
    loop {
        let connect = occupancy
            .connects(SwitchKey::new(herd, cur))
            .iter()
            .find(|c| c.src == inbound)
            .copied()
            .unwrap_or_else(|| panic!("no connection out of {inbound} at {cur}"));
        match connect.dst.bundle.direction() {
            Some(dir) => {
                cur = cur.step(dir);
                path.push(cur);
                inbound = Port::stream(dir.opposite(), connect.dst.channel);
            }
            None => return path,
        }
    }
}

/// The directions stepped between consecutive coordinates of a traced path.
pub fn hop_directions(path: &[Coord]) -> Vec<Direction> {
    path.windows(2)
        .map(|pair| {
            Direction::ALL
                .into_iter()
                .find(|&dir| pair[0].step(dir) == pair[1])
                .unwrap_or_else(|| panic!("{} and {} are not adjacent", pair[0], pair[1]))
        })
        .collect()
}

/// Asserts a traced path never immediately reverses direction.
pub fn assert_no_uturn(path: &[Coord]) {
    let dirs = hop_directions(path);
    for pair in dirs.windows(2) {
        assert_ne!(
            pair[1],
            pair[0].opposite(),
            "path reverses direction: {path:?}"
        );
    }
}

/// Asserts no bundle at any switch holds more destination connections than
/// its capacity allows.
pub fn assert_capacity_invariant(occupancy: &Occupancy) {
    let bundles = [
        Bundle::Stream(Direction::North),
        Bundle::Stream(Direction::South),
        Bundle::Stream(Direction::East),
        Bundle::Stream(Direction::West),
        Bundle::Core,
        Bundle::Dma,
        Bundle::Fifo,
    ];
    for (key, connects) in occupancy.iter() {
        for bundle in bundles {
            let used = connects.iter().filter(|c| c.dst.bundle == bundle).count();
            let cap = occupancy.caps().capacity(bundle) as usize;
            assert!(
                used <= cap,
                "{used} connections on {bundle} at {} exceed capacity {cap}",
                key.coord
            );
        }
    }
}

/// Asserts destination ports are pairwise distinct at every switch.
pub fn assert_unique_destinations(occupancy: &Occupancy) {
    for (key, connects) in occupancy.iter() {
        for (i, a) in connects.iter().enumerate() {
            for b in &connects[i + 1..] {
                assert_ne!(
                    a.dst, b.dst,
                    "destination {} allocated twice at {}",
                    a.dst, key.coord
                );
            }
        }
    }
}
