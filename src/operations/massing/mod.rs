//! Plan-shape reduction strategies.
//!
//! Every strategy reduces a drawn boundary to a narrower footprint inside it
//! (plus the centerline it was built from). Geometric failures never surface
//! as errors: the strategy degrades to [`MassingStrategy::Full`].

mod band;
mod bar;
mod custom;
mod donut;
mod h_shape;

use std::fmt;
use std::str::FromStr;

pub use custom::{join_polylines, MAX_JOIN_PASSES};

use crate::error::{MassingError, OperationError, Result};
use crate::geometry::{Profile, Skeleton};

/// Slack allowed when checking that a derived profile stays within its boundary.
const AREA_SLACK: f64 = 1e-6;

/// Plan-shape strategy of a mass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MassingStrategy {
    /// The whole boundary.
    #[default]
    Full,
    /// Boundary with a courtyard void.
    Donut,
    /// A band along the two longest contiguous edges.
    L,
    /// A band along the three longest contiguous edges.
    U,
    /// Two parallel end bars joined by a center bar.
    H,
    /// A single straight band along the longest chord through the centroid.
    Bar,
    /// A band around a caller-supplied skeleton.
    Custom,
}

impl MassingStrategy {
    /// All strategies, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Full,
        Self::Donut,
        Self::L,
        Self::U,
        Self::H,
        Self::Bar,
        Self::Custom,
    ];

    /// Display name, also accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "Full",
            Self::Donut => "Donut",
            Self::L => "L",
            Self::U => "U",
            Self::H => "H",
            Self::Bar => "Bar",
            Self::Custom => "Custom",
        }
    }
}

impl fmt::Display for MassingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MassingStrategy {
    type Err = MassingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                OperationError::InvalidInput(format!("unknown massing strategy `{s}`")).into()
            })
    }
}

/// Output of a strategy run.
#[derive(Debug, Clone, PartialEq)]
pub struct MassingResult {
    /// Derived footprint; `None` only when there was no boundary and nothing
    /// could be built from a skeleton either.
    pub profile: Option<Profile>,
    /// Centerline of the derived footprint.
    pub skeleton: Option<Skeleton>,
    /// Strategy actually realized (differs from the request after a fallback).
    pub strategy: MassingStrategy,
}

impl MassingResult {
    fn full(boundary: Option<&Profile>) -> Self {
        Self {
            profile: boundary.cloned(),
            skeleton: None,
            strategy: MassingStrategy::Full,
        }
    }
}

/// Reduces a boundary profile with a massing strategy.
///
/// `band_width` is the plan thickness of the occupied band. The skeleton is
/// only read by [`MassingStrategy::Custom`]; every other strategy derives its
/// own skeleton from the boundary, so re-running with identical inputs always
/// reproduces the same result.
#[derive(Debug)]
pub struct ApplyStrategy<'a> {
    boundary: Option<&'a Profile>,
    strategy: MassingStrategy,
    band_width: f64,
    skeleton: Option<&'a Skeleton>,
}

impl<'a> ApplyStrategy<'a> {
    /// Creates a new strategy run.
    #[must_use]
    pub fn new(boundary: Option<&'a Profile>, strategy: MassingStrategy, band_width: f64) -> Self {
        Self {
            boundary,
            strategy,
            band_width,
            skeleton: None,
        }
    }

    /// Supplies the skeleton used by [`MassingStrategy::Custom`].
    #[must_use]
    pub fn with_skeleton(mut self, skeleton: Option<&'a Skeleton>) -> Self {
        self.skeleton = skeleton;
        self
    }

    /// Executes the strategy, falling back to [`MassingStrategy::Full`] on
    /// any geometric failure.
    #[must_use]
    pub fn execute(&self) -> MassingResult {
        if self.strategy == MassingStrategy::Full {
            return MassingResult::full(self.boundary);
        }
        match self.try_execute() {
            Ok(result) => result,
            Err(err) => {
                tracing::debug!(
                    strategy = %self.strategy,
                    band_width = self.band_width,
                    error = %err,
                    "massing strategy fell back to Full"
                );
                MassingResult::full(self.boundary)
            }
        }
    }

    fn try_execute(&self) -> Result<MassingResult> {
        if self.band_width.is_nan() || self.band_width <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "band width must be positive, got {}",
                self.band_width
            ))
            .into());
        }
        let half = self.band_width * 0.5;

        if self.strategy == MassingStrategy::Custom {
            let skeleton = self
                .skeleton
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    OperationError::InvalidInput("custom strategy without skeleton".to_owned())
                })?;
            let profile = custom::custom(self.boundary, skeleton, half)?;
            return Ok(MassingResult {
                profile: Some(profile),
                skeleton: Some(skeleton.clone()),
                strategy: MassingStrategy::Custom,
            });
        }

        let boundary = self
            .boundary
            .filter(|b| b.is_valid())
            .ok_or_else(|| OperationError::InvalidInput("strategy needs a boundary".to_owned()))?
            .normalized();

        let (profile, skeleton) = match self.strategy {
            MassingStrategy::Donut => donut::donut(&boundary, self.band_width)?,
            MassingStrategy::L => band::contiguous_edge_band(&boundary, self.band_width, 2)?,
            MassingStrategy::U => band::contiguous_edge_band(&boundary, self.band_width, 3)?,
            MassingStrategy::H => h_shape::h_shape(&boundary, half)?,
            MassingStrategy::Bar => bar::bar(&boundary, half)?,
            other @ (MassingStrategy::Full | MassingStrategy::Custom) => {
                return Err(OperationError::InvalidInput(format!(
                    "{other} does not reduce a boundary"
                ))
                .into());
            }
        };

        // A reduction that swallows (or exceeds) the whole boundary means the
        // band is wider than the shape.
        if profile.area() >= boundary.area() - AREA_SLACK {
            return Err(OperationError::Failed(format!(
                "{} footprint covers the whole boundary",
                self.strategy
            ))
            .into());
        }

        Ok(MassingResult {
            profile: Some(profile),
            skeleton: Some(skeleton),
            strategy: self.strategy,
        })
    }
}
