//! End-to-end massing run: default masses per site, explicit additions and
//! overrides, stacking, building names and area tallies.

use std::collections::{HashMap, HashSet};

use crate::config::MassingConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{LevelError, Result};
use crate::geometry::Profile;
use crate::levels::{Level, LevelAssigner, LevelGroup};
use crate::mass::{
    BuildingId, BuildingNameOverride, Mass, MassAddition, MassEdit, MassId, MassingStore,
    StrategySettings, HOTEL, OFFICE, RESIDENTIAL,
};
use crate::operations::massing::MassingStrategy;
use crate::operations::setback::SetbackProfile;
use crate::operations::stack::StackMasses;
use crate::site::{Setback, Site, SiteConstraint, UnitDefinition};

/// Strategy and use requested for the i-th elevation band of every site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassSettings {
    pub strategy: Option<MassingStrategy>,
    /// Index of a level whose elevation starts a band.
    pub bottom_level_index: Option<usize>,
    /// Index of a level whose elevation ends the last band.
    pub top_level_index: Option<usize>,
    pub primary_use: Option<String>,
}

impl MassSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: MassingStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    #[must_use]
    pub fn with_primary_use(mut self, primary_use: impl Into<String>) -> Self {
        self.primary_use = Some(primary_use.into());
        self
    }

    #[must_use]
    pub fn with_level_range(mut self, bottom: Option<usize>, top: Option<usize>) -> Self {
        self.bottom_level_index = bottom;
        self.top_level_index = top;
        self
    }

    /// The explicit strategy, else Bar for residential and hotel uses.
    #[must_use]
    pub fn effective_strategy(&self) -> Option<MassingStrategy> {
        self.strategy.or_else(|| {
            self.primary_use
                .as_deref()
                .filter(|u| *u == RESIDENTIAL || *u == HOTEL)
                .map(|_| MassingStrategy::Bar)
        })
    }
}

/// Everything a run consumes.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    pub sites: Vec<Site>,
    pub setbacks: Vec<Setback>,
    pub site_constraints: Vec<SiteConstraint>,
    pub level_groups: Vec<LevelGroup>,
    pub unit_definitions: Vec<UnitDefinition>,
    pub mass_settings: Vec<MassSettings>,
    pub edits: Vec<MassEdit>,
    pub additions: Vec<MassAddition>,
    /// Stable identifiers of masses to leave out.
    pub removals: Vec<String>,
    pub strategy_settings: Vec<StrategySettings>,
    pub building_names: Vec<BuildingNameOverride>,
}

/// Summed floor area of one use category.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaTally {
    pub primary_use: String,
    pub area: f64,
    /// Number of floors counted.
    pub floor_count: usize,
}

/// Result of a run.
#[derive(Debug)]
pub struct GenerationOutput {
    pub store: MassingStore,
    /// Masses in stacking order.
    pub masses: Vec<MassId>,
    /// Buildings in creation order.
    pub buildings: Vec<BuildingId>,
    pub area_tallies: Vec<AreaTally>,
    pub warnings: Vec<String>,
}

/// Runs a full massing generation.
pub struct GenerateMassing<'a> {
    input: &'a GenerationInput,
    config: &'a MassingConfig,
}

impl<'a> GenerateMassing<'a> {
    /// Creates a new `GenerateMassing` operation.
    #[must_use]
    pub fn new(input: &'a GenerationInput, config: &'a MassingConfig) -> Self {
        Self { input, config }
    }

    /// Executes the run.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no level group, or the level group used
    /// for a site or for stacking is empty.
    pub fn execute(&self) -> Result<GenerationOutput> {
        let input = self.input;
        let mut diagnostics = Diagnostics::new();
        let mut store = MassingStore::new();

        let band_width = self.band_width();
        let default_use = if input.unit_definitions.is_empty() {
            OFFICE
        } else {
            RESIDENTIAL
        };
        let removed: HashSet<&str> = input.removals.iter().map(String::as_str).collect();
        let edits: HashMap<&str, &MassEdit> =
            input.edits.iter().map(|e| (e.add_id.as_str(), e)).collect();

        let mut masses = Vec::new();
        for site in &input.sites {
            self.default_masses(site, band_width, &removed, &edits, &mut store, &mut masses, &mut diagnostics)?;
        }

        for addition in input.additions.iter().filter(|a| !removed.contains(a.add_id.as_str())) {
            let mut mass = Mass::from_addition(addition, band_width);
            if let Some(edit) = edits.get(addition.add_id.as_str()) {
                mass.apply_edit(edit, band_width);
            }
            masses.push(store.add_mass(mass));
        }

        for settings in &input.strategy_settings {
            for &id in &masses {
                let mass = store.mass_mut(id)?;
                if mass.add_id == settings.add_id {
                    mass.apply_massing_settings(settings);
                }
            }
        }

        let mut keyed = Vec::with_capacity(masses.len());
        for &id in &masses {
            keyed.push((store.mass(id)?.bottom_elevation(), id));
        }
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        let masses: Vec<MassId> = keyed.into_iter().map(|(_, id)| id).collect();

        let group = input
            .level_groups
            .first()
            .ok_or_else(|| LevelError::NotFound("no level group supplied".to_owned()))?;
        let buildings = StackMasses::new(&masses, group, default_use)
            .with_placeholder_size(self.config.placeholder_size)
            .execute(&mut store, &mut diagnostics)?;

        rename_buildings(&input.building_names, &buildings, &mut store)?;
        let area_tallies = area_tallies(&masses, &store)?;

        tracing::info!(
            masses = masses.len(),
            buildings = buildings.len(),
            warnings = diagnostics.warnings().len(),
            "massing generated"
        );
        Ok(GenerationOutput {
            store,
            masses,
            buildings,
            area_tallies,
            warnings: diagnostics.into_warnings(),
        })
    }

    /// Band width from the unit definitions: twice the deepest unit plus a
    /// corridor. A unit's balcony counts toward its depth, less the deepest
    /// balcony protrusion any setback allows. Without units, the configured
    /// default.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        let balcony_allowance = self
            .input
            .setbacks
            .iter()
            .filter_map(|s| s.balcony_protrusion_depth)
            .max_by(f64::total_cmp);
        self.input
            .unit_definitions
            .iter()
            .map(|u| match (balcony_allowance, u.balcony_depth) {
                (Some(allowance), Some(balcony)) => u.depth + balcony - allowance,
                _ => u.depth,
            })
            .max_by(f64::total_cmp)
            .map_or(self.config.band_width, |depth| {
                depth * 2.0 + self.config.corridor_width
            })
    }

    /// Elevations where a site's massing changes: ground, setback starts,
    /// band limits from the mass settings, and the height cap. Breaks above
    /// the cap are dropped.
    fn breakpoints(&self, site: &Site, group: &LevelGroup, diagnostics: &mut Diagnostics) -> Vec<f64> {
        let input = self.input;
        let mut breaks = vec![0.0];
        breaks.extend(
            site_setbacks(input, site).map(|s| s.starting_height),
        );
        let mut max_height = group
            .max_height()
            .or_else(|| {
                input
                    .site_constraints
                    .iter()
                    .find(|c| c.site == site.id)
                    .and_then(|c| c.max_height)
            })
            .unwrap_or(self.config.max_height);

        let level_at = |index: usize, diagnostics: &mut Diagnostics| {
            let level = group.levels().get(index);
            if level.is_none() {
                diagnostics.warn(format!(
                    "mass settings refer to level {index}, but level group `{}` has {} levels",
                    group.id,
                    group.len()
                ));
            }
            level.map(|l| l.elevation)
        };
        for settings in sorted_settings(&input.mass_settings) {
            if let Some(elevation) = settings.bottom_level_index.and_then(|i| level_at(i, diagnostics)) {
                breaks.push(elevation);
            }
            if let Some(elevation) = settings.top_level_index.and_then(|i| level_at(i, diagnostics)) {
                breaks.push(elevation);
                max_height = elevation;
            }
        }
        breaks.push(max_height);
        breaks.retain(|b| *b <= max_height);
        breaks.sort_by(f64::total_cmp);
        breaks.dedup();
        breaks
    }

    #[allow(clippy::too_many_arguments)]
    fn default_masses(
        &self,
        site: &Site,
        band_width: f64,
        removed: &HashSet<&str>,
        edits: &HashMap<&str, &MassEdit>,
        store: &mut MassingStore,
        masses: &mut Vec<MassId>,
        diagnostics: &mut Diagnostics,
    ) -> Result<()> {
        let input = self.input;
        let group = input
            .level_groups
            .iter()
            .find(|g| g.site.as_deref() == Some(site.id.as_str()))
            .or_else(|| input.level_groups.first())
            .ok_or_else(|| LevelError::NotFound(format!("no level group for site `{}`", site.id)))?;
        if group.is_empty() {
            return Err(LevelError::EmptyGroup(group.id.clone()).into());
        }
        let assigner = LevelAssigner::new(group);
        let settings = sorted_settings(&input.mass_settings);
        let breaks = self.breakpoints(site, group, diagnostics);
        let site_id = site.stable_id();

        let mut last_level_used: Option<Level> = None;
        for (i, pair) in breaks.windows(2).enumerate() {
            let (curr, next) = (pair[0], pair[1]);
            let add_id = format!("{site_id}-{i}");
            if removed.contains(add_id.as_str()) {
                continue;
            }
            let band_settings = settings.get(i).copied();

            let mut levels = assigner.levels_up_to_height(next, last_level_used.as_ref());
            let mut strategy = band_settings
                .and_then(MassSettings::effective_strategy)
                .unwrap_or_default();
            let mut primary_use = band_settings.and_then(|s| s.primary_use.clone());
            let mut boundary: Option<Profile> = None;

            if let Some(edit) = edits.get(add_id.as_str()) {
                if edit.changes_levels() {
                    let top = match &edit.top_level {
                        Some(r) => assigner.find_best_match(r.id.as_deref(), r.elevation),
                        None => levels.last(),
                    };
                    let bottom = match &edit.bottom_level {
                        Some(r) => assigner.find_best_match(r.id.as_deref(), r.elevation),
                        None => levels.first(),
                    };
                    if let (Some(bottom), Some(top)) = (bottom, top) {
                        levels = assigner.levels_between(bottom, top, diagnostics);
                    }
                }
                boundary = edit.boundary.clone();
                if let Some(edited) = edit.strategy {
                    strategy = edited;
                }
                // A user-picked strategy usually means a residential bar.
                primary_use = edit.primary_use.clone().or(if edit.strategy.is_some() {
                    Some(RESIDENTIAL.to_owned())
                } else {
                    primary_use
                });
            }

            let Some(last) = levels.last() else {
                diagnostics.warn(format!(
                    "no levels between {curr:.2} and {next:.2} for mass `{add_id}`; skipped"
                ));
                continue;
            };
            last_level_used = Some(last.clone());

            let boundary = boundary.unwrap_or_else(|| {
                SetbackProfile::new(&site.perimeter)
                    .with_setbacks(site_setbacks(input, site).filter(|s| s.is_active_at(curr)))
                    .execute(diagnostics)
            });
            let mut mass = Mass::with_boundary(add_id, boundary, levels, group, band_width);
            mass.primary_use = primary_use;
            mass.apply_strategy(strategy, band_width);
            masses.push(store.add_mass(mass));
        }
        Ok(())
    }
}

/// Runs a full massing generation with `config`.
///
/// # Errors
///
/// See [`GenerateMassing::execute`].
pub fn generate(input: &GenerationInput, config: &MassingConfig) -> Result<GenerationOutput> {
    GenerateMassing::new(input, config).execute()
}

/// Setbacks that belong to `site` (or to no site in particular).
fn site_setbacks<'i>(input: &'i GenerationInput, site: &'i Site) -> impl Iterator<Item = &'i Setback> {
    input
        .setbacks
        .iter()
        .filter(move |s| s.site.as_deref().is_none_or(|id| id == site.id))
}

/// Mass settings ordered by bottom level index (missing counts as zero).
fn sorted_settings(settings: &[MassSettings]) -> Vec<&MassSettings> {
    let mut sorted: Vec<&MassSettings> = settings.iter().collect();
    sorted.sort_by_key(|s| s.bottom_level_index.unwrap_or(0));
    sorted
}

fn rename_buildings(
    overrides: &[BuildingNameOverride],
    buildings: &[BuildingId],
    store: &mut MassingStore,
) -> Result<()> {
    for rename in overrides {
        for &building in buildings {
            let matched = store
                .member_add_ids(building)?
                .iter()
                .any(|id| rename.mass_add_ids.iter().any(|m| m == id));
            if !matched {
                continue;
            }
            let members = {
                let b = store.building_mut(building)?;
                b.name.clone_from(&rename.name);
                b.members.clone()
            };
            for member in members {
                store.mass_mut(member)?.name = Some(rename.name.clone());
            }
        }
    }
    Ok(())
}

/// Floor area per use category, in order of first appearance.
fn area_tallies(masses: &[MassId], store: &MassingStore) -> Result<Vec<AreaTally>> {
    let mut tallies: Vec<AreaTally> = Vec::new();
    for &id in masses {
        let mass = store.mass(id)?;
        let (Some(primary_use), Some(profile)) = (&mass.primary_use, &mass.profile) else {
            continue;
        };
        let floors = mass.floors().iter().filter(|l| l.height.is_some()).count();
        if floors == 0 {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let area = profile.area() * floors as f64;
        match tallies.iter_mut().find(|t| &t.primary_use == primary_use) {
            Some(tally) => {
                tally.area += area;
                tally.floor_count += floors;
            }
            None => tallies.push(AreaTally {
                primary_use: primary_use.clone(),
                area,
                floor_count: floors,
            }),
        }
    }
    Ok(tallies)
}
