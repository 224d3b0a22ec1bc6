//! Switch occupancy tracking and channel allocation.
//!
//! [`Occupancy`] is the one mutable structure a routing pass threads through
//! path building: the connections already committed at every switch, keyed
//! by owning herd and coordinate. Channel allocation is a read-only query
//! against it; recording and undoing connections are the only writes.

use drover_grid::{Bundle, CapacityTable, Connect, Coord, Port};
use drover_ir::HerdId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifies one switch: the herd group that owns it plus its coordinate
/// relative to that herd's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchKey {
    /// The herd group the switch is routed for.
    pub herd: HerdId,
    /// The switch coordinate within the group.
    pub coord: Coord,
}

impl SwitchKey {
    /// Creates a key from a herd and a coordinate.
    pub fn new(herd: HerdId, coord: Coord) -> Self {
        Self { herd, coord }
    }
}

/// Per-switch connection lists accumulated over one routing pass.
///
/// Switches appear in first-commit order and each switch's connects stay in
/// commit order, so a given declaration order always produces the same
/// serialized occupancy. Switches whose connects are all undone drop out of
/// the map entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Occupancy {
    caps: CapacityTable,
    #[serde(with = "indexmap::map::serde_seq")]
    switches: IndexMap<SwitchKey, Vec<Connect>>,
}

impl Occupancy {
    /// Creates an empty occupancy over switches with the given capacities.
    pub fn new(caps: CapacityTable) -> Self {
        Self {
            caps,
            switches: IndexMap::new(),
        }
    }

    /// The capacity table allocation runs against.
    pub fn caps(&self) -> &CapacityTable {
        &self.caps
    }

    /// The lowest-indexed free channel of `bundle` at `key`, if any.
    ///
    /// A channel is taken once a committed connection at the switch uses it
    /// as its destination; source ports do not consume channels. A bundle
    /// with capacity zero is exhausted even at an untouched switch. This is
    /// a pure query: nothing is reserved until [`record`](Self::record).
    pub fn free_channel(&self, key: SwitchKey, bundle: Bundle) -> Option<u8> {
        let connects = self.connects(key);
        (0..self.caps.capacity(bundle))
            .find(|&channel| !connects.iter().any(|c| c.dst == Port::new(bundle, channel)))
    }

    /// The connections committed at `key`, in commit order.
    pub fn connects(&self, key: SwitchKey) -> &[Connect] {
        self.switches.get(&key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Commits a connection at `key`.
    pub fn record(&mut self, key: SwitchKey, connect: Connect) {
        self.switches.entry(key).or_default().push(connect);
    }

    /// Removes the most recently committed connection at `key`.
    ///
    /// The path builder calls this to undo a speculative hop while
    /// retreating from congestion. A switch left with no connections is
    /// forgotten, keeping first-commit iteration order for the rest.
    pub fn undo_last(&mut self, key: SwitchKey) {
        if let Some(connects) = self.switches.get_mut(&key) {
            connects.pop();
            if connects.is_empty() {
                self.switches.shift_remove(&key);
            }
        }
    }

    /// Iterates occupied switches in first-commit order.
    pub fn iter(&self) -> impl Iterator<Item = (SwitchKey, &[Connect])> {
        self.switches
            .iter()
            .map(|(key, connects)| (*key, connects.as_slice()))
    }

    /// Number of switches holding at least one connection.
    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    /// Total connections committed across all switches.
    pub fn connect_count(&self) -> usize {
        self.switches.values().map(Vec::len).sum()
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::new(CapacityTable::default())
    }
}
