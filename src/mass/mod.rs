pub mod building;
pub mod edits;
pub mod entity;

pub use building::{Building, BuildingId};
pub use edits::{BuildingNameOverride, MassAddition, MassEdit, StrategySettings};
pub use entity::{Mass, MassId};

use crate::error::StoreError;
use slotmap::SlotMap;

/// Use category that triggers residential defaults.
pub const RESIDENTIAL: &str = "Residential";

/// Use category of Hotel masses.
pub const HOTEL: &str = "Hotel";

/// Default use category when no unit definitions are supplied.
pub const OFFICE: &str = "Office";

/// Per-run arena that owns all masses and buildings.
///
/// Masses and buildings reference each other by key: a building lists its
/// members, a mass names its building.
#[derive(Debug, Default)]
pub struct MassingStore {
    masses: SlotMap<MassId, Mass>,
    buildings: SlotMap<BuildingId, Building>,
}

impl MassingStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mass operations ---

    /// Inserts a mass and returns its ID.
    pub fn add_mass(&mut self, mass: Mass) -> MassId {
        self.masses.insert(mass)
    }

    /// Returns a reference to the mass, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mass is not in the store.
    pub fn mass(&self, id: MassId) -> Result<&Mass, StoreError> {
        self.masses
            .get(id)
            .ok_or_else(|| StoreError::EntityNotFound("mass".into()))
    }

    /// Returns a mutable reference to the mass, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mass is not in the store.
    pub fn mass_mut(&mut self, id: MassId) -> Result<&mut Mass, StoreError> {
        self.masses
            .get_mut(id)
            .ok_or_else(|| StoreError::EntityNotFound("mass".into()))
    }

    /// Finds a mass by its stable identifier.
    #[must_use]
    pub fn find_mass(&self, add_id: &str) -> Option<MassId> {
        self.masses
            .iter()
            .find(|(_, m)| m.add_id == add_id)
            .map(|(id, _)| id)
    }

    /// Iterates over all masses.
    pub fn masses(&self) -> impl Iterator<Item = (MassId, &Mass)> {
        self.masses.iter()
    }

    #[must_use]
    pub fn mass_count(&self) -> usize {
        self.masses.len()
    }

    // --- Building operations ---

    /// Inserts a building and returns its ID.
    pub fn add_building(&mut self, building: Building) -> BuildingId {
        self.buildings.insert(building)
    }

    /// Returns a reference to the building, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the building is not in the store.
    pub fn building(&self, id: BuildingId) -> Result<&Building, StoreError> {
        self.buildings
            .get(id)
            .ok_or_else(|| StoreError::EntityNotFound("building".into()))
    }

    /// Returns a mutable reference to the building, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the building is not in the store.
    pub fn building_mut(&mut self, id: BuildingId) -> Result<&mut Building, StoreError> {
        self.buildings
            .get_mut(id)
            .ok_or_else(|| StoreError::EntityNotFound("building".into()))
    }

    /// Iterates over all buildings.
    pub fn buildings(&self) -> impl Iterator<Item = (BuildingId, &Building)> {
        self.buildings.iter()
    }

    #[must_use]
    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Appends `mass` to the members of `building` and records the
    /// membership on the mass.
    ///
    /// # Errors
    ///
    /// Returns an error if either entity is not in the store.
    pub fn join_building(&mut self, mass: MassId, building: BuildingId) -> Result<(), StoreError> {
        self.mass(mass)?;
        self.building_mut(building)?.members.push(mass);
        self.mass_mut(mass)?.building = Some(building);
        Ok(())
    }

    /// Stable identifiers of a building's members, in stacking order.
    ///
    /// # Errors
    ///
    /// Returns an error if the building or a member is not in the store.
    pub fn member_add_ids(&self, building: BuildingId) -> Result<Vec<&str>, StoreError> {
        self.building(building)?
            .members
            .iter()
            .map(|&id| self.mass(id).map(|m| m.add_id.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_both_sides() {
        let mut store = MassingStore::new();
        let a = store.add_mass(Mass::new("a", 10.0));
        let b = store.add_mass(Mass::new("b", 10.0));
        let building = store.add_building(Building::new("Building 1"));
        store.join_building(a, building).unwrap();
        store.join_building(b, building).unwrap();

        assert_eq!(store.building(building).unwrap().members, vec![a, b]);
        assert_eq!(store.mass(b).unwrap().building, Some(building));
        assert_eq!(store.member_add_ids(building).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn find_by_add_id() {
        let mut store = MassingStore::new();
        let a = store.add_mass(Mass::new("site-0", 10.0));
        assert_eq!(store.find_mass("site-0"), Some(a));
        assert_eq!(store.find_mass("site-1"), None);
        assert_eq!(store.mass_count(), 1);
    }

    #[test]
    fn missing_entities_error() {
        let mut store = MassingStore::new();
        let a = store.add_mass(Mass::new("a", 10.0));
        let building = store.add_building(Building::new("Building 1"));
        let mut other = MassingStore::new();
        assert!(other.join_building(a, building).is_err());
        assert!(other.building(building).is_err());
        assert!(store.join_building(a, building).is_ok());
    }
}
