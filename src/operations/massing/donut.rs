use crate::error::{GeometryError, Result};
use crate::geometry::kernel::{difference, largest, largest_loop, offset_inward};
use crate::geometry::{Profile, Skeleton};

/// Courtyard plan: the boundary minus its inward offset by `band_width`.
///
/// The skeleton is the ring halfway into the band.
pub(super) fn donut(boundary: &Profile, band_width: f64) -> Result<(Profile, Skeleton)> {
    let courtyard = largest_loop(offset_inward(&boundary.perimeter, band_width)).ok_or(
        GeometryError::EmptyResult {
            operation: "courtyard offset",
        },
    )?;
    let rings = offset_inward(&boundary.perimeter, band_width * 0.5);

    let profile = largest(difference(boundary, &courtyard)).ok_or(GeometryError::EmptyResult {
        operation: "courtyard difference",
    })?;
    Ok((profile, Skeleton::from_rings(&rings)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use approx::assert_relative_eq;

    fn rect(w: f64, h: f64) -> Profile {
        Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(w, 0.0),
            Point2::new(w, h),
            Point2::new(0.0, h),
        ])
    }

    #[test]
    fn square_courtyard() {
        let (profile, skeleton) = donut(&rect(100.0, 100.0), 10.0).unwrap();
        assert_eq!(profile.voids.len(), 1);
        assert_relative_eq!(profile.area(), 3600.0, epsilon = 1e-6);
        // Ring at 5 from every edge: a 90 x 90 square.
        assert_eq!(skeleton.polylines.len(), 1);
        assert_relative_eq!(skeleton.length(), 360.0, epsilon = 1e-6);
    }

    #[test]
    fn rectangle_courtyard() {
        let (profile, _) = donut(&rect(60.0, 40.0), 8.0).unwrap();
        assert_relative_eq!(profile.area(), 60.0 * 40.0 - 44.0 * 24.0, epsilon = 1e-6);
    }

    #[test]
    fn narrow_plan_has_no_courtyard() {
        assert!(donut(&rect(60.0, 12.0), 8.0).is_err());
    }
}
