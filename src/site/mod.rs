//! Site inputs: perimeters, setback rules, zoning constraints and unit types.

use crate::geometry::Segment;
use crate::math::polygon_2d::{centroid, left_normal, segment_direction};
use crate::math::Point2;

/// Offsets added to the truncated centroid coordinates of a generated site
/// identifier.
const ADD_ID_OFFSETS: [i32; 3] = [45_200, 9_100, 1_300];

/// A site with its plan perimeter.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    /// Closed perimeter, either winding.
    pub perimeter: Vec<Point2>,
    /// Stable identifier used to key the site's masses across runs.
    pub add_id: Option<String>,
}

impl Site {
    #[must_use]
    pub fn new(id: impl Into<String>, perimeter: Vec<Point2>) -> Self {
        Self {
            id: id.into(),
            perimeter,
            add_id: None,
        }
    }

    #[must_use]
    pub fn with_add_id(mut self, add_id: impl Into<String>) -> Self {
        self.add_id = Some(add_id.into());
        self
    }

    /// The explicit identifier, or one derived from the perimeter centroid.
    #[must_use]
    pub fn stable_id(&self) -> String {
        self.add_id
            .clone()
            .unwrap_or_else(|| self.generate_add_id())
    }

    /// Derives an identifier from the perimeter centroid as `X-Y-Z`, each
    /// part the uppercase hex of the 32-bit two's-complement value of the
    /// truncated coordinate plus a fixed offset. The plan centroid has z = 0.
    #[must_use]
    pub fn generate_add_id(&self) -> String {
        let c = centroid(&self.perimeter);
        let [ox, oy, oz] = ADD_ID_OFFSETS;
        let x = truncate_i32(c.x).wrapping_add(ox);
        let y = truncate_i32(c.y).wrapping_add(oy);
        let z = oz;
        format!("{x:X}-{y:X}-{z:X}")
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_i32(v: f64) -> i32 {
    // Saturating cast; site coordinates never get near the bounds.
    v.trunc() as i32
}

/// A zoning setback: the band within `distance` of `baseline`, on the site
/// side, is unbuildable from `starting_height` up.
#[derive(Debug, Clone, PartialEq)]
pub struct Setback {
    pub baseline: Segment,
    pub distance: f64,
    pub starting_height: f64,
    /// Depth a balcony may protrude into the setback.
    pub balcony_protrusion_depth: Option<f64>,
    /// Identifier of the site the rule applies to.
    pub site: Option<String>,
}

impl Setback {
    #[must_use]
    pub fn new(start: Point2, end: Point2, distance: f64) -> Self {
        Self {
            baseline: (start, end),
            distance,
            starting_height: 0.0,
            balcony_protrusion_depth: None,
            site: None,
        }
    }

    #[must_use]
    pub fn with_starting_height(mut self, height: f64) -> Self {
        self.starting_height = height;
        self
    }

    #[must_use]
    pub fn with_balcony_protrusion_depth(mut self, depth: f64) -> Self {
        self.balcony_protrusion_depth = Some(depth);
        self
    }

    #[must_use]
    pub fn for_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    /// Returns `true` if the rule applies to a band starting at `elevation`.
    #[must_use]
    pub fn is_active_at(&self, elevation: f64) -> bool {
        elevation >= self.starting_height
    }

    /// The baseline moved `distance` to its left, or `None` for a
    /// zero-length baseline.
    #[must_use]
    pub fn shifted_baseline(&self, distance: f64) -> Option<Segment> {
        let (a, b) = self.baseline;
        let offset = left_normal(segment_direction(&a, &b).ok()?) * distance;
        Some((a + offset, b + offset))
    }
}

/// Zoning limits for one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteConstraint {
    pub site: String,
    pub max_height: Option<f64>,
}

/// A residential unit type; its depth drives the derived band width.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDefinition {
    pub name: String,
    pub width: f64,
    pub depth: f64,
    /// Plan depth of the unit's balcony, if it has one.
    pub balcony_depth: Option<f64>,
}

impl UnitDefinition {
    #[must_use]
    pub fn new(name: impl Into<String>, width: f64, depth: f64) -> Self {
        Self {
            name: name.into(),
            width,
            depth,
            balcony_depth: None,
        }
    }

    #[must_use]
    pub fn with_balcony_depth(mut self, depth: f64) -> Self {
        self.balcony_depth = Some(depth);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_site(x0: f64, y0: f64, size: f64) -> Site {
        Site::new(
            "site",
            vec![
                Point2::new(x0, y0),
                Point2::new(x0 + size, y0),
                Point2::new(x0 + size, y0 + size),
                Point2::new(x0, y0 + size),
            ],
        )
    }

    #[test]
    fn generated_id_encodes_centroid() {
        assert_eq!(square_site(0.0, 0.0, 100.0).generate_add_id(), "B0C2-23BE-514");
    }

    #[test]
    fn generated_id_wraps_negative_values() {
        let site = square_site(-50_050.0, 0.0, 100.0);
        assert_eq!(site.generate_add_id(), "FFFFED40-23BE-514");
    }

    #[test]
    fn explicit_id_wins() {
        let site = square_site(0.0, 0.0, 100.0).with_add_id("north");
        assert_eq!(site.stable_id(), "north");
    }

    #[test]
    fn setback_shifts_left() {
        let setback = Setback::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 3.0);
        let (a, b) = setback.shifted_baseline(setback.distance).unwrap();
        assert_relative_eq!(a, Point2::new(0.0, 3.0));
        assert_relative_eq!(b, Point2::new(10.0, 3.0));
        assert!(setback.is_active_at(0.0));
        assert!(!setback.clone().with_starting_height(5.0).is_active_at(4.9));
    }
}
