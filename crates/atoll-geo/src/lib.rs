//! Geodetic math for slippy-map layers.
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! geometry tooling, hosts, and tests without pulling in any GPU or
//! windowing code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`lnglat`] | `LngLat` |
//! | [`mercator`] | `WebMercator`, `ProjectedPoint`, `ProjectedAnchor`, the `Projector` seam |
//! | [`fan`] | `circle_fan` triangle-fan builder |
//!
//! # Quick start
//!
//! ```rust
//! use atoll_geo::{circle_fan, LngLat, WebMercator};
//!
//! let ring = circle_fan(LngLat::new(139.7671, 35.6812), 50.0, 32, &WebMercator);
//!
//! // Fan center, 32 rim points, and the closing duplicate.
//! assert_eq!(ring.len(), 34);
//! assert_eq!(ring[1], ring[33]);
//! ```

pub mod fan;
pub mod lnglat;
pub mod mercator;

pub use fan::circle_fan;
pub use lnglat::LngLat;
pub use mercator::{ProjectedAnchor, ProjectedPoint, Projector, WebMercator};
