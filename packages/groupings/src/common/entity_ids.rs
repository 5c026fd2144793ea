//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for people known to the identity system.
pub struct PersonMarker;

/// Stable identifier of a person; never reassigned, unlike usernames.
pub type PersonId = Id<PersonMarker>;
