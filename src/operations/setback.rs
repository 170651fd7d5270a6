use crate::diagnostics::Diagnostics;
use crate::geometry::kernel::{difference, largest};
use crate::geometry::{Profile, Segment};
use crate::math::distance_2d::points_coincide;
use crate::math::intersect_2d::infinite_line_intersection;
use crate::math::polygon_2d::{is_ccw, loop_edges};
use crate::math::{Point2, MATCH_TOLERANCE};
use crate::site::Setback;

/// Derives the buildable plan boundary of a site from its active setbacks.
///
/// A setback whose baseline matches a perimeter edge replaces that edge with
/// the baseline shifted inward; the shifted edges are re-joined by
/// intersecting each with the next. Setbacks that match no edge are cut out
/// with a boolean difference instead.
pub struct SetbackProfile<'a> {
    perimeter: &'a [Point2],
    setbacks: Vec<&'a Setback>,
}

impl<'a> SetbackProfile<'a> {
    /// Creates a new `SetbackProfile` operation over a site perimeter of
    /// either winding.
    #[must_use]
    pub fn new(perimeter: &'a [Point2]) -> Self {
        Self {
            perimeter,
            setbacks: Vec::new(),
        }
    }

    /// Adds the setbacks to apply.
    #[must_use]
    pub fn with_setbacks(mut self, setbacks: impl IntoIterator<Item = &'a Setback>) -> Self {
        self.setbacks.extend(setbacks);
        self
    }

    /// Executes the operation. Boolean failures are recorded in
    /// `diagnostics` and leave the boundary at its last good state.
    #[must_use]
    pub fn execute(&self, diagnostics: &mut Diagnostics) -> Profile {
        if self.setbacks.is_empty() || self.perimeter.len() < 3 {
            return Profile::new(self.perimeter.to_vec());
        }

        // Inward is left of each edge on a counter-clockwise loop, right otherwise.
        let inward = if is_ccw(self.perimeter) { 1.0 } else { -1.0 };
        let mut remaining = self.setbacks.clone();
        let mut lines: Vec<Segment> = Vec::with_capacity(self.perimeter.len());
        for (a, b) in loop_edges(self.perimeter) {
            // Several rules on one edge: the deepest wins; equal depths keep the last.
            let deepest = remaining
                .iter()
                .copied()
                .filter(|s| baseline_matches(s, &a, &b))
                .max_by(|x, y| x.distance.total_cmp(&y.distance));
            remaining.retain(|s| !baseline_matches(s, &a, &b));
            let line = deepest
                .and_then(|s| s.shifted_baseline(inward * s.distance))
                .unwrap_or((a, b));
            lines.push(line);
        }

        let n = lines.len();
        let corners: Vec<Point2> = (0..n)
            .map(|i| {
                let (a0, a1) = lines[i];
                let (b0, b1) = lines[(i + 1) % n];
                infinite_line_intersection(&a0, &a1, &b0, &b1).unwrap_or(a1)
            })
            .collect();
        let mut profile = Profile::new(corners);

        for setback in remaining {
            let (Some(right), Some(left)) = (
                setback.shifted_baseline(-setback.distance),
                setback.shifted_baseline(setback.distance),
            ) else {
                diagnostics.warn("setback with a zero-length baseline ignored");
                continue;
            };
            let cutter = [right.0, right.1, left.1, left.0];
            match largest(difference(&profile, &cutter)) {
                Some(trimmed) => profile = trimmed,
                None => diagnostics.warn(format!(
                    "setback boolean failed for baseline ({:.3}, {:.3})-({:.3}, {:.3})",
                    setback.baseline.0.x,
                    setback.baseline.0.y,
                    setback.baseline.1.x,
                    setback.baseline.1.y
                )),
            }
        }
        profile
    }
}

fn baseline_matches(setback: &Setback, start: &Point2, end: &Point2) -> bool {
    points_coincide(&setback.baseline.0, start, MATCH_TOLERANCE)
        && points_coincide(&setback.baseline.1, end, MATCH_TOLERANCE)
}
