/// Straight-alpha RGBA color, `[0, 1]` per channel.
///
/// Invariant:
/// - storage stays straight-alpha so repeated edits never accumulate
///   multiplication error.
///
/// The GPU side of the layer blends premultiplied (`ONE,
/// ONE_MINUS_SRC_ALPHA`); [`premultiplied`](Self::premultiplied) derives the
/// upload form at the last moment.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }

    /// Returns `[r·a, g·a, b·a, a]`, clamping every channel to `[0, 1]`
    /// first so out-of-range user input cannot leak to the GPU.
    #[inline]
    pub fn premultiplied(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r.clamp(0.0, 1.0) * a,
            self.g.clamp(0.0, 1.0) * a,
            self.b.clamp(0.0, 1.0) * a,
            a,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_black_is_unchanged() {
        assert_eq!(Rgba::new(0.0, 0.0, 0.0, 0.0).premultiplied(), [0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn opaque_white_is_unchanged() {
        assert_eq!(Rgba::new(1.0, 1.0, 1.0, 1.0).premultiplied(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn half_alpha_halves_rgb() {
        assert_eq!(Rgba::new(1.0, 1.0, 1.0, 0.5).premultiplied(), [0.5, 0.5, 0.5, 0.5]);
    }

    #[test]
    fn quarter_alpha_scales_each_channel() {
        assert_eq!(
            Rgba::new(1.0, 0.5, 0.25, 0.25).premultiplied(),
            [0.25, 0.125, 0.0625, 0.25]
        );
    }

    #[test]
    fn out_of_range_channels_are_clamped_before_multiplying() {
        assert_eq!(Rgba::new(2.0, -1.0, 0.5, 1.5).premultiplied(), [1.0, 0.0, 0.5, 1.0]);
    }
}
