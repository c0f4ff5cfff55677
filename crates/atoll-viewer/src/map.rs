use atoll_geo::{LngLat, ProjectedPoint, WebMercator};

/// Pixel size of the projected world at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Mercator camera: a geodetic center and a slippy-map zoom level.
///
/// The projected world is `TILE_SIZE * 2^zoom` pixels wide at the current
/// zoom; all screen math flows from that.
#[derive(Debug, Copy, Clone)]
pub struct MapView {
    pub center: LngLat,
    pub zoom: f64,
}

impl MapView {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// World size in pixels at the current zoom.
    #[inline]
    pub fn world_px(self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Column-major matrix mapping projected (mercator unit) positions to
    /// clip space for a `width` x `height` pixel viewport.
    ///
    /// Mercator y grows south while clip y grows up, hence the negated y
    /// scale.
    pub fn clip_matrix(self, width: f64, height: f64) -> [f64; 16] {
        let world = self.world_px();
        let c = WebMercator::forward(self.center);

        let sx = 2.0 * world / width;
        let sy = -2.0 * world / height;

        let mut m = [0.0; 16];
        m[0] = sx;
        m[5] = sy;
        m[10] = 1.0;
        m[12] = -c.x * sx;
        m[13] = -c.y * sy;
        m[15] = 1.0;
        m
    }

    /// Projected position to viewport pixels (top-left origin).
    pub fn to_screen(self, p: ProjectedPoint, width: f64, height: f64) -> (f64, f64) {
        let world = self.world_px();
        let c = WebMercator::forward(self.center);
        (
            width / 2.0 + (p.x - c.x) * world,
            height / 2.0 + (p.y - c.y) * world,
        )
    }

    /// Moves the camera by a screen-pixel delta (dragging the map moves the
    /// camera the opposite way).
    pub fn pan(&mut self, dx_px: f64, dy_px: f64) {
        let world = self.world_px();
        let c = WebMercator::forward(self.center);
        let moved = ProjectedPoint::new(
            (c.x - dx_px / world).clamp(0.0, 1.0),
            (c.y - dy_px / world).clamp(0.0, 1.0),
        );
        self.center = WebMercator::inverse(moved);
    }

    /// Zooms by wheel steps, a quarter level each, within sane bounds.
    pub fn zoom_by(&mut self, steps: f64) {
        self.zoom = (self.zoom + steps * 0.25).clamp(1.0, 20.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> MapView {
        MapView::new(LngLat::new(139.7671, 35.6812), 14.0)
    }

    fn apply(m: &[f64; 16], p: ProjectedPoint) -> (f64, f64) {
        // Column-major affine apply, w stays 1.
        (
            m[0] * p.x + m[4] * p.y + m[12],
            m[1] * p.x + m[5] * p.y + m[13],
        )
    }

    #[test]
    fn camera_center_maps_to_clip_origin() {
        let v = view();
        let m = v.clip_matrix(1024.0, 768.0);
        let (x, y) = apply(&m, WebMercator::forward(v.center));
        assert!(x.abs() < 1e-9);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn half_viewport_east_maps_to_clip_right_edge() {
        let v = view();
        let (w, h) = (1024.0, 768.0);
        let m = v.clip_matrix(w, h);
        let c = WebMercator::forward(v.center);
        let east = ProjectedPoint::new(c.x + (w / 2.0) / v.world_px(), c.y);
        let (x, _) = apply(&m, east);
        assert!((x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn south_maps_to_negative_clip_y() {
        let v = view();
        let m = v.clip_matrix(1024.0, 768.0);
        let c = WebMercator::forward(v.center);
        // Mercator y grows south; clip y must flip.
        let south = ProjectedPoint::new(c.x, c.y + 0.001);
        let (_, y) = apply(&m, south);
        assert!(y < 0.0);
    }

    #[test]
    fn center_lands_mid_viewport_on_screen() {
        let v = view();
        let (x, y) = v.to_screen(WebMercator::forward(v.center), 800.0, 600.0);
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn pan_moves_the_camera_against_the_drag() {
        let mut v = view();
        let before = WebMercator::forward(v.center);
        // Dragging content east (positive dx) moves the camera west.
        v.pan(100.0, 0.0);
        let after = WebMercator::forward(v.center);
        assert!(after.x < before.x);
        assert!((after.y - before.y).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut v = view();
        v.zoom_by(1000.0);
        assert_eq!(v.zoom, 20.0);
        v.zoom_by(-10000.0);
        assert_eq!(v.zoom, 1.0);
    }
}
