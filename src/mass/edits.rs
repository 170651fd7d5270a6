//! Per-mass override records, keyed by stable mass identifier.

use crate::geometry::{Profile, Skeleton};
use crate::levels::LevelReference;
use crate::operations::massing::MassingStrategy;

/// Changes to a generated or added mass. Every field is optional; `None`
/// keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassEdit {
    pub add_id: String,
    pub boundary: Option<Profile>,
    pub strategy: Option<MassingStrategy>,
    pub primary_use: Option<String>,
    pub top_level: Option<LevelReference>,
    pub bottom_level: Option<LevelReference>,
}

impl MassEdit {
    #[must_use]
    pub fn new(add_id: impl Into<String>) -> Self {
        Self {
            add_id: add_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_boundary(mut self, boundary: Profile) -> Self {
        self.boundary = Some(boundary);
        self
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
    pub fn with_levels(
        mut self,
        bottom: Option<LevelReference>,
        top: Option<LevelReference>,
    ) -> Self {
        self.bottom_level = bottom;
        self.top_level = top;
        self
    }

    /// Returns `true` if the edit moves the mass to other levels.
    #[must_use]
    pub fn changes_levels(&self) -> bool {
        self.top_level.is_some() || self.bottom_level.is_some()
    }
}

/// A mass drawn directly rather than generated from a site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MassAddition {
    pub add_id: String,
    pub boundary: Option<Profile>,
    /// Centerline; when present the mass uses the Custom strategy.
    pub centerline: Option<Skeleton>,
    pub top_level: Option<LevelReference>,
    pub bottom_level: Option<LevelReference>,
    pub primary_use: Option<String>,
}

impl MassAddition {
    #[must_use]
    pub fn new(add_id: impl Into<String>) -> Self {
        Self {
            add_id: add_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_boundary(mut self, boundary: Profile) -> Self {
        self.boundary = Some(boundary);
        self
    }

    #[must_use]
    pub fn with_centerline(mut self, centerline: Skeleton) -> Self {
        self.centerline = Some(centerline);
        self
    }

    #[must_use]
    pub fn with_levels(
        mut self,
        bottom: Option<LevelReference>,
        top: Option<LevelReference>,
    ) -> Self {
        self.bottom_level = bottom;
        self.top_level = top;
        self
    }

    #[must_use]
    pub fn with_primary_use(mut self, primary_use: impl Into<String>) -> Self {
        self.primary_use = Some(primary_use.into());
        self
    }
}

/// Strategy parameters set on an existing mass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategySettings {
    pub add_id: String,
    pub band_width: Option<f64>,
    /// A non-empty skeleton switches the mass to the Custom strategy.
    pub skeleton: Option<Skeleton>,
}

impl StrategySettings {
    #[must_use]
    pub fn new(add_id: impl Into<String>) -> Self {
        Self {
            add_id: add_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_band_width(mut self, band_width: f64) -> Self {
        self.band_width = Some(band_width);
        self
    }

    #[must_use]
    pub fn with_skeleton(mut self, skeleton: Skeleton) -> Self {
        self.skeleton = Some(skeleton);
        self
    }
}

/// Renames the building that contains any of `mass_add_ids`.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingNameOverride {
    pub mass_add_ids: Vec<String>,
    pub name: String,
}

impl BuildingNameOverride {
    #[must_use]
    pub fn new(mass_add_ids: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            mass_add_ids,
            name: name.into(),
        }
    }
}
