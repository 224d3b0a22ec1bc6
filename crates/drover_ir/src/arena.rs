//! Dense, ID-indexed storage for design entities.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::Index;

/// An opaque ID newtype usable as an arena key.
pub trait EntityId: Copy {
    /// Builds the ID wrapping a dense index.
    fn from_index(index: usize) -> Self;

    /// The dense index behind the ID.
    fn index(self) -> usize;
}

/// Append-only, densely indexed storage handing out sequential IDs.
///
/// Entities are never removed or reordered, so an ID stays valid for the
/// arena's lifetime and ID equality doubles as entity identity. Iteration
/// ranges rely on exactly that: the router compares [`RangeId`]s, never
/// range values.
///
/// [`RangeId`]: crate::ids::RangeId
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I, T> {
    entries: Vec<T>,
    #[serde(skip)]
    _id: PhantomData<I>,
}

impl<I: EntityId, T> Arena<I, T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            _id: PhantomData,
        }
    }

    /// Appends an entity and returns its freshly minted ID.
    pub fn alloc(&mut self, entity: T) -> I {
        let id = I::from_index(self.entries.len());
        self.entries.push(entity);
        id
    }

    /// Number of entities allocated so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the arena holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(id, entity)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entity)| (I::from_index(index), entity))
    }
}

impl<I: EntityId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EntityId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.entries[id.index()]
    }
}
