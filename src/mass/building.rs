use super::entity::MassId;

slotmap::new_key_type! {
    /// Unique identifier for a building in the massing store.
    pub struct BuildingId;
}

/// A group of vertically stacked masses.
///
/// Member order is stacking order. Each member's [`Mass::building`] points
/// back here; [`MassingStore::join_building`] keeps both sides in step.
///
/// [`Mass::building`]: super::Mass::building
/// [`MassingStore::join_building`]: super::MassingStore::join_building
#[derive(Debug, Clone, PartialEq)]
pub struct Building {
    pub name: String,
    pub members: Vec<MassId>,
}

impl Building {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }
}
