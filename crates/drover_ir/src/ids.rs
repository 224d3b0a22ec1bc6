//! Opaque ID newtypes for design entities.

use crate::arena::EntityId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(u32);

        impl EntityId for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// ID of a herd declaration in a [`Design`](crate::Design).
    HerdId
);

define_id!(
    /// ID of an iteration range in a [`Design`](crate::Design).
    ///
    /// Two selects share an axis exactly when they name the same `RangeId`;
    /// ranges with equal bounds but different IDs iterate independently.
    RangeId
);
