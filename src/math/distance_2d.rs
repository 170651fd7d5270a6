use super::Point2;

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest_x = ax + t * dx;
    let closest_y = ay + t * dy;

    ((px - closest_x).powi(2) + (py - closest_y).powi(2)).sqrt()
}

/// Distance from `point` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment(point: &Point2, a: &Point2, b: &Point2) -> f64 {
    point_to_segment_dist(point.x, point.y, a.x, a.y, b.x, b.y)
}

/// Returns `true` if two points lie within `tolerance` of each other.
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2, tolerance: f64) -> bool {
    (a - b).norm() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn point_on_segment() {
        let d = point_to_segment_dist(0.5, 0.0, 0.0, 0.0, 1.0, 0.0);
        assert!(d.abs() < TOL);
    }

    #[test]
    fn point_perpendicular_to_segment() {
        let d = point_to_segment_dist(0.5, 1.0, 0.0, 0.0, 1.0, 0.0);
        assert!((d - 1.0).abs() < TOL);
    }

    #[test]
    fn point_beyond_endpoint() {
        let d = point_to_segment(
            &Point2::new(4.0, 4.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(1.0, 0.0),
        );
        assert!((d - 5.0).abs() < TOL);
    }

    #[test]
    fn degenerate_segment() {
        let d = point_to_segment_dist(3.0, 4.0, 0.0, 0.0, 0.0, 0.0);
        assert!((d - 5.0).abs() < TOL);
    }

    #[test]
    fn coincidence_uses_tolerance() {
        let a = Point2::new(1.0, 1.0);
        assert!(points_coincide(&a, &Point2::new(1.005, 1.0), 0.01));
        assert!(!points_coincide(&a, &Point2::new(1.02, 1.0), 0.01));
    }
}
