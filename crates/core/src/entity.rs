//! Entity trait: identity + continuity across state changes.
//!
//! Accounts keep their identity while their balance changes; transaction
//! records never change at all but are still addressed by id.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Two snapshots describe the same entity when their ids match,
    /// regardless of the state they carry.
    fn is_same_entity(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
