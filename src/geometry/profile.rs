use crate::math::intersect_2d::segments_cross;
use crate::math::polygon_2d::{
    centroid, interior_point, loop_edges, point_strictly_inside, signed_area, to_ccw,
};
use crate::math::{Point2, TOLERANCE};

/// Distance from a loop boundary under which a point is not "strictly inside".
const CONTAINMENT_TOLERANCE: f64 = 1e-7;

/// A plan shape: an outer boundary loop plus zero or more interior voids.
///
/// Profiles are replaced, never edited in place: every transform in this
/// crate builds a new `Profile`.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Outer boundary, closed implicitly (last vertex connects to the first).
    pub perimeter: Vec<Point2>,
    /// Interior void loops, each fully inside `perimeter`.
    pub voids: Vec<Vec<Point2>>,
}

impl Profile {
    /// Creates a single-loop profile.
    #[must_use]
    pub fn new(perimeter: Vec<Point2>) -> Self {
        Self {
            perimeter,
            voids: Vec::new(),
        }
    }

    /// Creates a profile with interior voids.
    #[must_use]
    pub fn with_voids(perimeter: Vec<Point2>, voids: Vec<Vec<Point2>>) -> Self {
        Self { perimeter, voids }
    }

    /// Axis-aligned rectangle centered on the origin, wound counter-clockwise.
    #[must_use]
    pub fn rectangle(width: f64, height: f64) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        Self::new(vec![
            Point2::new(-hw, -hh),
            Point2::new(hw, -hh),
            Point2::new(hw, hh),
            Point2::new(-hw, hh),
        ])
    }

    /// Net plan area: perimeter area minus void areas.
    #[must_use]
    pub fn area(&self) -> f64 {
        let outer = signed_area(&self.perimeter).abs();
        let holes: f64 = self.voids.iter().map(|v| signed_area(v).abs()).sum();
        (outer - holes).max(0.0)
    }

    /// Area-weighted centroid of the perimeter.
    #[must_use]
    pub fn centroid(&self) -> Point2 {
        centroid(&self.perimeter)
    }

    /// Returns `true` if the perimeter has at least three vertices and
    /// non-zero area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.perimeter.len() >= 3 && signed_area(&self.perimeter).abs() > TOLERANCE
    }

    /// Returns a copy whose perimeter winds counter-clockwise and whose voids
    /// wind clockwise.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let voids = self
            .voids
            .iter()
            .map(|v| to_ccw(v).into_iter().rev().collect())
            .collect();
        Self::with_voids(to_ccw(&self.perimeter), voids)
    }

    /// Plan-only overlap test between two perimeters.
    ///
    /// Loops that share only an edge or a vertex do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        loops_overlap(&self.perimeter, &other.perimeter)
    }
}

/// Returns `true` if the interiors of two simple loops intersect.
#[must_use]
pub fn loops_overlap(a: &[Point2], b: &[Point2]) -> bool {
    if a.len() < 3 || b.len() < 3 || !bounds_overlap(a, b) {
        return false;
    }
    let crossing = loop_edges(a)
        .any(|(a0, a1)| loop_edges(b).any(|(b0, b1)| segments_cross(&a0, &a1, &b0, &b1)));
    if crossing {
        return true;
    }
    let inside = |pts: &[Point2], container: &[Point2]| {
        pts.iter()
            .any(|p| point_strictly_inside(p, container, CONTAINMENT_TOLERANCE))
            || interior_point(pts)
                .is_some_and(|p| point_strictly_inside(&p, container, CONTAINMENT_TOLERANCE))
    };
    inside(a, b) || inside(b, a)
}

fn bounds_overlap(a: &[Point2], b: &[Point2]) -> bool {
    let bounds = |pts: &[Point2]| {
        pts.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    };
    let (ax0, ay0, ax1, ay1) = bounds(a);
    let (bx0, by0, bx1, by1) = bounds(b);
    ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
}
