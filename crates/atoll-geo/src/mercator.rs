use std::f64::consts::PI;

use crate::lnglat::LngLat;

/// Mean earth radius in meters (IUGG R1).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Equatorial circumference of the projected world, in meters.
pub const EARTH_CIRCUMFERENCE_M: f64 = 2.0 * PI * EARTH_RADIUS_M;

/// Point in projected (web-mercator unit) coordinates.
///
/// The projected world is the unit square: `(0, 0)` is the north-west corner
/// and `(1, 1)` the south-east corner. `y` grows towards the south.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Projection output for one geodetic position: the projected point plus the
/// local metric scale at that latitude.
///
/// `units_per_meter` converts ground meters to projected units, so a metric
/// radius becomes `radius_m * units_per_meter`. The factor depends on
/// latitude only and must be re-derived whenever the position changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ProjectedAnchor {
    pub point: ProjectedPoint,
    pub units_per_meter: f64,
}

/// Projection seam between geometry generation and the hosting map engine.
///
/// Implementations must be pure: the same input always yields the same
/// anchor, with no side effects.
pub trait Projector {
    fn project(&self, position: LngLat) -> ProjectedAnchor;
}

/// Spherical web mercator into the unit square, `y` growing south.
///
/// This is the projection slippy-map engines share; the formulas match the
/// usual tile math (`x = (180 + lng) / 360`, `y` from the mercator
/// latitude stretch).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct WebMercator;

impl WebMercator {
    /// Projects degrees to the unit square.
    pub fn forward(position: LngLat) -> ProjectedPoint {
        let x = (180.0 + position.lng) / 360.0;
        let y =
            (180.0 - (180.0 / PI) * ((PI / 4.0 + position.lat * PI / 360.0).tan()).ln()) / 360.0;
        ProjectedPoint::new(x, y)
    }

    /// Inverse of [`forward`](Self::forward).
    pub fn inverse(point: ProjectedPoint) -> LngLat {
        let lng = point.x * 360.0 - 180.0;
        let y2 = 180.0 - point.y * 360.0;
        let lat = 360.0 / PI * ((y2 * PI / 180.0).exp().atan()) - 90.0;
        LngLat::new(lng, lat)
    }

    /// Projected units per ground meter at the given latitude.
    ///
    /// Mercator stretches by `1 / cos(lat)`, so the factor grows towards the
    /// poles; at the equator one unit spans the full earth circumference.
    #[inline]
    pub fn units_per_meter(lat_deg: f64) -> f64 {
        mercator_scale(lat_deg) / EARTH_CIRCUMFERENCE_M
    }
}

impl Projector for WebMercator {
    fn project(&self, position: LngLat) -> ProjectedAnchor {
        ProjectedAnchor {
            point: Self::forward(position),
            units_per_meter: Self::units_per_meter(position.lat),
        }
    }
}

#[inline]
fn mercator_scale(lat_deg: f64) -> f64 {
    1.0 / lat_deg.to_radians().cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    // ── forward ───────────────────────────────────────────────────────────

    #[test]
    fn forward_null_island_is_square_center() {
        let p = WebMercator::forward(LngLat::new(0.0, 0.0));
        assert!(close(p.x, 0.5, 1e-15));
        assert!(close(p.y, 0.5, 1e-15));
    }

    #[test]
    fn forward_x_spans_the_antimeridians() {
        assert!(close(WebMercator::forward(LngLat::new(-180.0, 0.0)).x, 0.0, 1e-15));
        assert!(close(WebMercator::forward(LngLat::new(180.0, 0.0)).x, 1.0, 1e-15));
    }

    #[test]
    fn forward_y_grows_south() {
        let north = WebMercator::forward(LngLat::new(0.0, 60.0));
        let south = WebMercator::forward(LngLat::new(0.0, -60.0));
        assert!(north.y < 0.5);
        assert!(south.y > 0.5);
    }

    // ── inverse ───────────────────────────────────────────────────────────

    #[test]
    fn inverse_round_trips_degrees() {
        let original = LngLat::new(139.7671, 35.6812);
        let back = WebMercator::inverse(WebMercator::forward(original));
        assert!(close(back.lng, original.lng, 1e-9));
        assert!(close(back.lat, original.lat, 1e-9));
    }

    #[test]
    fn inverse_of_square_center_is_null_island() {
        let back = WebMercator::inverse(ProjectedPoint::new(0.5, 0.5));
        assert!(close(back.lng, 0.0, 1e-12));
        assert!(close(back.lat, 0.0, 1e-12));
    }

    // ── units_per_meter ───────────────────────────────────────────────────

    #[test]
    fn units_per_meter_equator_is_inverse_circumference() {
        assert!(close(
            WebMercator::units_per_meter(0.0),
            1.0 / EARTH_CIRCUMFERENCE_M,
            1e-24,
        ));
    }

    #[test]
    fn units_per_meter_doubles_at_sixty_degrees() {
        // cos 60° = 1/2, so the mercator stretch is exactly 2x.
        let equator = WebMercator::units_per_meter(0.0);
        let sixty = WebMercator::units_per_meter(60.0);
        assert!(close(sixty / equator, 2.0, 1e-12));
    }

    #[test]
    fn units_per_meter_is_symmetric_in_latitude() {
        assert!(close(
            WebMercator::units_per_meter(35.0),
            WebMercator::units_per_meter(-35.0),
            1e-20,
        ));
    }

    // ── anchor ────────────────────────────────────────────────────────────

    #[test]
    fn project_reports_point_and_scale_together() {
        let position = LngLat::new(139.7671, 35.6812);
        let anchor = WebMercator.project(position);
        assert_eq!(anchor.point, WebMercator::forward(position));
        assert_eq!(anchor.units_per_meter, WebMercator::units_per_meter(position.lat));
    }
}
