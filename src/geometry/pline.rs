//! Conversion between plan loops and the polygon kernel's bulge polylines.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, Polyline};

use crate::math::arc_2d::Arc2;
use crate::math::Point2;

/// Maximum deviation between a kernel arc and its chord approximation.
pub const ARC_TOLERANCE: f64 = 0.01;

/// Squared distance under which consecutive output vertices are merged.
const DUPLICATE_DIST_SQ: f64 = 1e-12;

/// Builds a closed, line-only kernel polyline from a loop.
#[must_use]
pub fn closed_pline(points: &[Point2]) -> Polyline<f64> {
    let mut pline = Polyline::new_closed();
    for p in points {
        pline.add(p.x, p.y, 0.0);
    }
    pline
}

/// Flattens a closed kernel polyline into a loop, tessellating arc segments.
#[must_use]
pub fn pline_to_loop(pline: &Polyline<f64>) -> Vec<Point2> {
    let n = pline.vertex_count();
    let mut points: Vec<Point2> = Vec::with_capacity(n * 2);
    let seg_count = if pline.is_closed() { n } else { n.saturating_sub(1) };

    for i in 0..n {
        let v0 = pline.at(i);
        push_unique(&mut points, Point2::new(v0.x, v0.y));
        if i >= seg_count {
            continue;
        }
        let v1 = pline.at((i + 1) % n);
        if let Some(arc) =
            Arc2::from_bulge(&Point2::new(v0.x, v0.y), &Point2::new(v1.x, v1.y), v0.bulge)
        {
            for p in arc.interior_points(ARC_TOLERANCE) {
                push_unique(&mut points, p);
            }
        }
    }

    // Drop a closing duplicate of the first vertex.
    if points.len() > 1 {
        let first = points[0];
        if let Some(last) = points.last() {
            if (last - first).norm_squared() < DUPLICATE_DIST_SQ {
                points.pop();
            }
        }
    }
    points
}

fn push_unique(points: &mut Vec<Point2>, p: Point2) {
    if points
        .last()
        .is_none_or(|last| (last - p).norm_squared() >= DUPLICATE_DIST_SQ)
    {
        points.push(p);
    }
}
