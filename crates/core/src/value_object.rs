//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// A value object has no identity of its own; two instances holding the same
/// attributes are interchangeable. [`crate::Avatar`] is the example here: it
/// lives inside a [`crate::User`] and is persisted as an embedded document
/// rather than as a row with its own key.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
