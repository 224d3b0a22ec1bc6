//! Switchbox materialization from the final occupancy.
//!
//! The output boundary of the pass: every switch that kept at least one
//! connection becomes a [`SwitchboxDecl`] whose select pins the coordinate
//! through freshly allocated single-value ranges. Lowering the declarations
//! to hardware configuration happens downstream.

use crate::occupancy::Occupancy;
use drover_ir::{Design, HerdSelect, SwitchboxDecl};

/// Appends one switchbox declaration per occupied switch to `design`.
///
/// Switches are emitted in first-commit order and every switch keeps its
/// connection order. Each declaration gets its own pair of single-value
/// ranges, allocated into the design's range arena.
pub fn materialize_switchboxes(design: &mut Design, occupancy: &Occupancy) {
    for (key, connects) in occupancy.iter() {
        let iter_x = design.add_range(key.coord.x, key.coord.x + 1, 1);
        let iter_y = design.add_range(key.coord.y, key.coord.y + 1, 1);
        design.switchboxes.push(SwitchboxDecl {
            select: HerdSelect::new(key.herd, iter_x, iter_y),
            connects: connects.to_vec(),
        });
    }
    tracing::debug!("materialized {} switchboxes", design.switchboxes.len());
}
