use super::building::BuildingId;
use super::edits::{MassAddition, MassEdit, StrategySettings};
use crate::geometry::{Profile, Skeleton};
use crate::levels::{Level, LevelGroup, LevelReference};
use crate::operations::massing::{ApplyStrategy, MassingStrategy};

slotmap::new_key_type! {
    /// Unique identifier for a mass in the massing store.
    pub struct MassId;
}

/// A vertical volume covering one contiguous band of levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Mass {
    /// Stable identifier, matched by edits across runs.
    pub add_id: String,
    /// Display name; set from the building name when the building is renamed.
    pub name: Option<String>,
    /// Drawn outer boundary.
    pub boundary: Option<Profile>,
    /// Footprint after the massing strategy.
    pub profile: Option<Profile>,
    pub skeleton: Option<Skeleton>,
    pub top_level: Option<LevelReference>,
    pub bottom_level: Option<LevelReference>,
    /// Assigned levels, bottom to top. The top level caps the mass and is
    /// not a floor of it.
    pub levels: Vec<Level>,
    pub level_group: Option<String>,
    /// Sum of the floor-to-floor heights of every level but the top one.
    pub height: f64,
    /// Vertical placement (elevation of the bottom level).
    pub elevation: f64,
    pub primary_use: Option<String>,
    pub building: Option<BuildingId>,
    pub strategy: MassingStrategy,
    pub band_width: f64,
}

impl Mass {
    /// Creates an empty mass: no geometry, no levels, Full strategy.
    #[must_use]
    pub fn new(add_id: impl Into<String>, band_width: f64) -> Self {
        Self {
            add_id: add_id.into(),
            name: None,
            boundary: None,
            profile: None,
            skeleton: None,
            top_level: None,
            bottom_level: None,
            levels: Vec::new(),
            level_group: None,
            height: 0.0,
            elevation: 0.0,
            primary_use: None,
            building: None,
            strategy: MassingStrategy::Full,
            band_width,
        }
    }

    /// Creates a mass over `levels` with `boundary` as both the drawn
    /// boundary and the initial footprint.
    #[must_use]
    pub fn with_boundary(
        add_id: impl Into<String>,
        boundary: Profile,
        levels: Vec<Level>,
        group: &LevelGroup,
        band_width: f64,
    ) -> Self {
        let mut mass = Self::new(add_id, band_width);
        mass.profile = Some(boundary.clone());
        mass.boundary = Some(boundary);
        mass.set_level_info(levels, group);
        mass
    }

    /// Creates a mass from a drawn addition. A centerline makes it Custom.
    #[must_use]
    pub fn from_addition(addition: &MassAddition, band_width: f64) -> Self {
        let mut mass = Self::new(addition.add_id.clone(), band_width);
        mass.boundary.clone_from(&addition.boundary);
        mass.profile.clone_from(&addition.boundary);
        mass.top_level.clone_from(&addition.top_level);
        mass.bottom_level.clone_from(&addition.bottom_level);
        if let Some(centerline) = addition.centerline.as_ref().filter(|c| !c.is_empty()) {
            mass.skeleton = Some(centerline.clone());
            mass.apply_strategy(MassingStrategy::Custom, band_width);
        }
        mass.primary_use.clone_from(&addition.primary_use);
        mass
    }

    /// Re-derives the footprint with `strategy`.
    ///
    /// The realized strategy is stored, so a failed reduction leaves the mass
    /// as Full with its boundary as footprint.
    pub fn apply_strategy(&mut self, strategy: MassingStrategy, band_width: f64) {
        self.band_width = band_width;
        let result = ApplyStrategy::new(self.boundary.as_ref(), strategy, band_width)
            .with_skeleton(self.skeleton.as_ref())
            .execute();
        if result.profile.is_some() || self.boundary.is_some() {
            self.profile = result.profile;
        }
        self.skeleton = result.skeleton;
        self.strategy = result.strategy;
    }

    /// Assigns `levels` (bottom to top) and recomputes the level references
    /// and height. An empty slice leaves the mass unchanged.
    pub fn set_level_info(&mut self, levels: Vec<Level>, group: &LevelGroup) {
        let (Some(bottom), Some(top)) = (levels.first(), levels.last()) else {
            return;
        };
        self.bottom_level = Some(LevelReference::from(bottom));
        self.top_level = Some(LevelReference::from(top));
        self.height = levels[..levels.len() - 1]
            .iter()
            .filter_map(|l| l.height)
            .sum();
        self.level_group = Some(group.id.clone());
        self.levels = levels;
    }

    /// Applies an edit to an existing mass.
    ///
    /// Without a new strategy, a Custom mass is re-trimmed against its
    /// (possibly replaced) boundary.
    pub fn apply_edit(&mut self, edit: &MassEdit, band_width: f64) {
        if let Some(boundary) = &edit.boundary {
            self.boundary = Some(boundary.clone());
            self.profile = Some(boundary.clone());
        }
        if let Some(primary_use) = &edit.primary_use {
            self.primary_use = Some(primary_use.clone());
        }
        if let Some(top) = &edit.top_level {
            self.top_level = Some(top.clone());
        }
        if let Some(bottom) = &edit.bottom_level {
            self.bottom_level = Some(bottom.clone());
        }
        if let Some(strategy) = edit.strategy {
            self.apply_strategy(strategy, band_width);
        } else if self.strategy == MassingStrategy::Custom {
            self.apply_strategy(MassingStrategy::Custom, band_width);
        }
    }

    /// Applies strategy settings. A Full mass only reacts to a skeleton.
    pub fn apply_massing_settings(&mut self, settings: &StrategySettings) {
        if self.strategy == MassingStrategy::Full && settings.skeleton.is_none() {
            return;
        }
        if let Some(band_width) = settings.band_width {
            self.band_width = band_width;
        }
        let mut strategy = self.strategy;
        if let Some(skeleton) = settings.skeleton.as_ref().filter(|s| !s.is_empty()) {
            self.skeleton = Some(skeleton.clone());
            strategy = MassingStrategy::Custom;
        }
        self.apply_strategy(strategy, self.band_width);
    }

    /// Elevation of the bottom level reference, zero when unset.
    #[must_use]
    pub fn bottom_elevation(&self) -> f64 {
        self.bottom_level.as_ref().map_or(0.0, |r| r.elevation)
    }

    /// Levels the mass occupies as floors (all but the capping top level).
    #[must_use]
    pub fn floors(&self) -> &[Level] {
        let n = self.levels.len().saturating_sub(1);
        &self.levels[..n]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Profile {
        Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ])
    }

    fn placed(strategy: MassingStrategy) -> Mass {
        let group = LevelGroup::uniform("g", 5, 3.5);
        let mut mass = Mass::with_boundary(
            "m",
            square(100.0),
            group.levels().to_vec(),
            &group,
            10.0,
        );
        mass.apply_strategy(strategy, 10.0);
        mass
    }

    #[test]
    fn level_info_skips_top_level_height() {
        let mass = placed(MassingStrategy::Full);
        assert_relative_eq!(mass.height, 14.0, epsilon = 1e-12);
        assert_eq!(mass.floors().len(), 4);
        assert_eq!(mass.bottom_level.as_ref().unwrap().id.as_deref(), Some("L1"));
        assert_eq!(mass.top_level.as_ref().unwrap().id.as_deref(), Some("L5"));
        assert_eq!(mass.level_group.as_deref(), Some("g"));
    }

    #[test]
    fn failed_strategy_reports_full() {
        let mut mass = placed(MassingStrategy::Full);
        mass.apply_strategy(MassingStrategy::Donut, 80.0);
        assert_eq!(mass.strategy, MassingStrategy::Full);
        assert_eq!(mass.profile, mass.boundary);
        assert!(mass.skeleton.is_none());
    }

    #[test]
    fn edit_retrims_custom_mass() {
        let mut mass = Mass::from_addition(
            &MassAddition::new("a")
                .with_boundary(square(100.0))
                .with_centerline(Skeleton::from_segments(&[(
                    Point2::new(-10.0, 50.0),
                    Point2::new(110.0, 50.0),
                )])),
            10.0,
        );
        assert_eq!(mass.strategy, MassingStrategy::Custom);
        assert_relative_eq!(mass.profile.as_ref().unwrap().area(), 1000.0, epsilon = 1e-6);

        // The band (y 45..55) now only half overlaps the 50 x 50 boundary.
        mass.apply_edit(&MassEdit::new("a").with_boundary(square(50.0)), 10.0);
        assert_eq!(mass.strategy, MassingStrategy::Custom);
        assert_relative_eq!(mass.profile.as_ref().unwrap().area(), 250.0, epsilon = 1e-6);
    }

    #[test]
    fn edit_with_strategy_applies_it() {
        let mut mass = placed(MassingStrategy::Full);
        mass.apply_edit(
            &MassEdit::new("m")
                .with_strategy(MassingStrategy::Bar)
                .with_primary_use("Hotel"),
            10.0,
        );
        assert_eq!(mass.strategy, MassingStrategy::Bar);
        assert_eq!(mass.primary_use.as_deref(), Some("Hotel"));
        assert_relative_eq!(mass.profile.as_ref().unwrap().area(), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn settings_ignore_full_mass_without_skeleton() {
        let mut mass = placed(MassingStrategy::Full);
        mass.apply_massing_settings(&StrategySettings::new("m").with_band_width(4.0));
        assert_relative_eq!(mass.band_width, 10.0);
        assert_eq!(mass.strategy, MassingStrategy::Full);
    }

    #[test]
    fn settings_band_width_reapplies_strategy() {
        let mut mass = placed(MassingStrategy::Bar);
        mass.apply_massing_settings(&StrategySettings::new("m").with_band_width(20.0));
        assert_eq!(mass.strategy, MassingStrategy::Bar);
        assert_relative_eq!(mass.profile.as_ref().unwrap().area(), 2000.0, epsilon = 1e-6);
    }

    #[test]
    fn settings_skeleton_switches_to_custom() {
        let mut mass = placed(MassingStrategy::Full);
        let skeleton =
            Skeleton::from_segments(&[(Point2::new(50.0, -10.0), Point2::new(50.0, 110.0))]);
        mass.apply_massing_settings(&StrategySettings::new("m").with_skeleton(skeleton.clone()));
        assert_eq!(mass.strategy, MassingStrategy::Custom);
        assert_eq!(mass.skeleton, Some(skeleton));
        assert_relative_eq!(mass.profile.as_ref().unwrap().area(), 1000.0, epsilon = 1e-6);
    }

    #[test]
    fn addition_without_geometry_stays_empty() {
        let mass = Mass::from_addition(&MassAddition::new("a"), 10.0);
        assert!(mass.profile.is_none());
        assert!(mass.boundary.is_none());
        assert_eq!(mass.strategy, MassingStrategy::Full);
    }
}
