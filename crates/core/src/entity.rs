//! Identity for records that are looked up by key (catalog products).

/// Something with a stable key that outlives changes to its other fields.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// Two records are the same entity when their keys match, whatever their
    /// other fields say.
    fn is_same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
