//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Repositories stage removals by entity identity, so every persisted domain
/// type exposes its strongly-typed id through this trait.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
