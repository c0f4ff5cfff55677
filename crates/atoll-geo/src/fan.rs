use std::f64::consts::TAU;

use crate::lnglat::LngLat;
use crate::mercator::{ProjectedPoint, Projector};

/// Builds the vertex ring of a filled circle as a triangle fan.
///
/// Layout: the fan center first, then `segments` rim points counter-clockwise
/// starting on the +x axis, then a closing duplicate of the first rim point.
/// Output length is always `segments + 2`.
///
/// The metric radius is converted with the scale factor the projector reports
/// for `center`, so moving the circle in latitude changes its projected size
/// on the next call. A zero radius is valid and collapses every rim point
/// onto the center.
///
/// Preconditions (debug-asserted, enforced by layer validation upstream):
/// `radius_m` finite and non-negative, `segments >= 3`.
pub fn circle_fan<P: Projector + ?Sized>(
    center: LngLat,
    radius_m: f64,
    segments: u32,
    projector: &P,
) -> Vec<ProjectedPoint> {
    debug_assert!(radius_m.is_finite() && radius_m >= 0.0, "bad radius: {radius_m}");
    debug_assert!(segments >= 3, "fan needs at least 3 segments, got {segments}");

    let anchor = projector.project(center);
    let (cx, cy) = (anchor.point.x, anchor.point.y);
    let radius = radius_m * anchor.units_per_meter;

    let mut points = Vec::with_capacity(segments as usize + 2);
    points.push(ProjectedPoint::new(cx, cy));
    for i in 0..segments {
        let angle = TAU * f64::from(i) / f64::from(segments);
        points.push(ProjectedPoint::new(
            cx + radius * angle.cos(),
            cy + radius * angle.sin(),
        ));
    }
    // Closes the ring. cos 0 = 1 and sin 0 = 0 exactly, so this duplicates
    // the first rim point bit for bit.
    points.push(ProjectedPoint::new(cx + radius, cy));

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mercator::{ProjectedAnchor, WebMercator};

    /// Projector with a scripted anchor, for checking emission geometry
    /// without mercator math in the way.
    struct FixedAnchor {
        point: ProjectedPoint,
        units_per_meter: f64,
    }

    impl Projector for FixedAnchor {
        fn project(&self, _position: LngLat) -> ProjectedAnchor {
            ProjectedAnchor {
                point: self.point,
                units_per_meter: self.units_per_meter,
            }
        }
    }

    fn tokyo() -> LngLat {
        LngLat::new(139.7671, 35.6812)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn length_is_segments_plus_two() {
        for segments in 3..=64 {
            let ring = circle_fan(tokyo(), 50.0, segments, &WebMercator);
            assert_eq!(ring.len(), segments as usize + 2);
        }
    }

    #[test]
    fn first_point_is_projected_center() {
        let ring = circle_fan(tokyo(), 50.0, 8, &WebMercator);
        assert_eq!(ring[0], WebMercator::forward(tokyo()));
    }

    #[test]
    fn closing_point_bit_equals_first_rim_point() {
        for segments in [3, 4, 7, 32, 255] {
            let ring = circle_fan(tokyo(), 50.0, segments, &WebMercator);
            assert_eq!(ring[1], ring[segments as usize + 1]);
        }
    }

    #[test]
    fn zero_radius_collapses_rim_onto_center() {
        let ring = circle_fan(tokyo(), 0.0, 16, &WebMercator);
        for p in &ring {
            assert_eq!(*p, ring[0]);
        }
    }

    #[test]
    fn output_is_deterministic() {
        let a = circle_fan(tokyo(), 123.456, 32, &WebMercator);
        let b = circle_fan(tokyo(), 123.456, 32, &WebMercator);
        assert_eq!(a, b);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn four_segment_ring_hits_the_axes() {
        // 50 m at Tokyo Station with 4 segments: rim points at 0°, 90°,
        // 180°, 270°, then the closing duplicate.
        let ring = circle_fan(tokyo(), 50.0, 4, &WebMercator);
        assert_eq!(ring.len(), 6);

        let c = WebMercator::forward(tokyo());
        let r = 50.0 * WebMercator::units_per_meter(tokyo().lat);

        assert!(close(ring[1].x, c.x + r) && close(ring[1].y, c.y));
        assert!(close(ring[2].x, c.x) && close(ring[2].y, c.y + r));
        assert!(close(ring[3].x, c.x - r) && close(ring[3].y, c.y));
        assert!(close(ring[4].x, c.x) && close(ring[4].y, c.y - r));
        assert_eq!(ring[5], ring[1]);
    }

    #[test]
    fn radius_scales_with_reported_units_per_meter() {
        let projector = FixedAnchor {
            point: ProjectedPoint::new(10.0, 20.0),
            units_per_meter: 0.5,
        };
        let ring = circle_fan(LngLat::new(0.0, 0.0), 2.0, 4, &projector);

        // 2 m at 0.5 units/m is one projected unit of radius.
        assert_eq!(ring[0], ProjectedPoint::new(10.0, 20.0));
        assert!(close(ring[1].x, 11.0) && close(ring[1].y, 20.0));
        assert!(close(ring[2].x, 10.0) && close(ring[2].y, 21.0));
    }

    #[test]
    fn rim_points_sit_on_the_circle() {
        let projector = FixedAnchor {
            point: ProjectedPoint::new(0.0, 0.0),
            units_per_meter: 1.0,
        };
        let ring = circle_fan(LngLat::new(0.0, 0.0), 3.0, 12, &projector);
        for p in &ring[1..] {
            assert!(close((p.x * p.x + p.y * p.y).sqrt(), 3.0));
        }
    }
}
