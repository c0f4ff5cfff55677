/// Geographic position in degrees.
///
/// Longitude grows east, latitude grows north. Values outside ±180 / ±90 are
/// representable; whether they are meaningful is up to the projection.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[inline]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}
