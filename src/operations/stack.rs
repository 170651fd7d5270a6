use crate::config::DEFAULT_PLACEHOLDER_SIZE;
use crate::diagnostics::Diagnostics;
use crate::error::{LevelError, Result};
use crate::geometry::Profile;
use crate::levels::{LevelAssigner, LevelGroup};
use crate::mass::{Building, BuildingId, MassId, MassingStore, RESIDENTIAL};
use crate::math::MATCH_TOLERANCE;
use crate::operations::massing::MassingStrategy;

/// Places masses vertically and groups them into buildings.
///
/// Masses are visited in the given order (ascending intended bottom
/// elevation). Each mass stacks on top of every already placed mass whose
/// footprint overlaps its own in plan, and inherits the skeleton, use and
/// building of those masses where it has none; the most recently placed
/// overlapping mass wins.
pub struct StackMasses<'a> {
    masses: &'a [MassId],
    levels: &'a LevelGroup,
    default_use: &'a str,
    placeholder_size: f64,
}

impl<'a> StackMasses<'a> {
    /// Creates a new `StackMasses` operation.
    #[must_use]
    pub fn new(masses: &'a [MassId], levels: &'a LevelGroup, default_use: &'a str) -> Self {
        Self {
            masses,
            levels,
            default_use,
            placeholder_size: DEFAULT_PLACEHOLDER_SIZE,
        }
    }

    /// Sets the side length of the square given to masses with no footprint.
    #[must_use]
    pub fn with_placeholder_size(mut self, size: f64) -> Self {
        self.placeholder_size = size;
        self
    }

    /// Executes the operation and returns the buildings it created, in
    /// creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the level group is empty or a mass is missing
    /// from the store.
    pub fn execute(
        &self,
        store: &mut MassingStore,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<BuildingId>> {
        if self.levels.is_empty() {
            return Err(LevelError::EmptyGroup(self.levels.id.clone()).into());
        }
        let assigner = LevelAssigner::new(self.levels);
        let mut buildings: Vec<BuildingId> = Vec::new();
        let mut placed: Vec<MassId> = Vec::with_capacity(self.masses.len());

        for &id in self.masses {
            {
                let mass = store.mass_mut(id)?;
                if mass.profile.is_none() {
                    let placeholder = Profile::rectangle(self.placeholder_size, self.placeholder_size);
                    mass.boundary = Some(placeholder.clone());
                    mass.profile = Some(placeholder);
                }
            }

            let mut stack_top = 0.0_f64;
            for &prior_id in placed.iter().rev() {
                let prior = store.mass(prior_id)?;
                let current = store.mass(id)?;
                let overlaps = match (&prior.profile, &current.profile) {
                    (Some(a), Some(b)) => a.overlaps(b),
                    _ => false,
                };
                if !overlaps {
                    continue;
                }
                stack_top = stack_top.max(prior.elevation + prior.height);

                let inherit_skeleton = match (&prior.skeleton, &current.skeleton) {
                    (Some(skeleton), None) => Some((skeleton.clone(), prior.band_width)),
                    _ => None,
                };
                let inherit_use = match (&prior.primary_use, &current.primary_use) {
                    (Some(primary_use), None) => Some(primary_use.clone()),
                    _ => None,
                };
                let inherit_building = match (prior.building, current.building) {
                    (Some(building), None) => Some(building),
                    _ => None,
                };

                let current = store.mass_mut(id)?;
                if let Some((skeleton, band_width)) = inherit_skeleton {
                    current.skeleton = Some(skeleton.clone());
                    current.apply_strategy(MassingStrategy::Custom, band_width);
                    // A Custom run that falls back to Full still carries the centerline up.
                    if current.skeleton.is_none() {
                        current.skeleton = Some(skeleton);
                    }
                }
                if inherit_use.is_some() {
                    current.primary_use = inherit_use;
                }
                if let Some(building) = inherit_building {
                    store.join_building(id, building)?;
                }
            }

            let mass = store.mass_mut(id)?;
            if mass.levels.is_empty() {
                let top = match &mass.top_level {
                    Some(r) => assigner.find_best_match(r.id.as_deref(), r.elevation),
                    None => self.levels.last(),
                };
                let bottom = match &mass.bottom_level {
                    Some(r) => assigner.find_best_match(r.id.as_deref(), r.elevation),
                    None => self
                        .levels
                        .levels()
                        .iter()
                        .find(|l| l.elevation > stack_top - MATCH_TOLERANCE)
                        .or_else(|| self.levels.first()),
                };
                if let (Some(bottom), Some(top)) = (bottom, top) {
                    let slice = assigner.levels_between(bottom, top, diagnostics);
                    mass.set_level_info(slice, self.levels);
                }
            }

            if mass.building.is_none() {
                let name = format!("Building {}", buildings.len() + 1);
                let building = store.add_building(Building::new(name));
                store.join_building(id, building)?;
                buildings.push(building);
            }

            let mass = store.mass_mut(id)?;
            if mass.primary_use.is_none()
                && mass.skeleton.is_none()
                && self.default_use == RESIDENTIAL
                && mass.strategy == MassingStrategy::Full
            {
                mass.apply_strategy(MassingStrategy::L, mass.band_width);
            }
            if mass.primary_use.is_none() {
                mass.primary_use = Some(self.default_use.to_owned());
            }
            mass.elevation = mass.bottom_elevation();
            tracing::debug!(
                mass = %mass.add_id,
                elevation = mass.elevation,
                levels = mass.levels.len(),
                "mass placed"
            );
            placed.push(id);
        }
        Ok(buildings)
    }
}
