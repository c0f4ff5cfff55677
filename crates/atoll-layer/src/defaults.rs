//! Default property values for newly constructed circle layers.
//!
//! All of these pass validation; [`CircleLayer::new`](crate::CircleLayer::new)
//! relies on that.

use atoll_geo::LngLat;

use crate::color::Rgba;

/// Tokyo Station.
pub const DEFAULT_CENTER: LngLat = LngLat::new(139.7671, 35.6812);

/// Meters.
pub const DEFAULT_RADIUS_M: f64 = 50.0;

/// Semi-transparent slate blue.
pub const DEFAULT_FILL: Rgba = Rgba::new(0.25, 0.25, 0.5, 0.5);

/// Triangles in the fan. Enough for a smooth circle at typical zooms.
pub const DEFAULT_SEGMENTS: u32 = 32;
