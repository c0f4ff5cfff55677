//! Geographic circle layer for GL-hosted slippy maps.
//!
//! A [`CircleLayer`] turns a geodetic center and a metric radius into a
//! triangle fan in the host's projected space, and drives its GPU resources
//! through the host's attach / render / context-loss callbacks. Geometry
//! rebuilds are deferred behind a dirty flag; color changes repaint without
//! a rebuild.
//!
//! The host side is abstracted: a map engine implements [`MapHost`] and
//! [`gl::GlContext`] and drives any [`CustomLayer`] it owns. The
//! [`testing`] doubles implement both, so the whole lifecycle runs under
//! plain unit tests.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`circle`](CircleLayer) | `CircleLayer`, `CircleOptions` |
//! | [`layer`] | the `CustomLayer` protocol |
//! | [`host`] | `MapHost`, `ContextEvent`, `Subscription` |
//! | [`gl`] | `GlContext`, handles, `build_program` |
//! | [`color`] | straight-alpha `Rgba` with premultiplied upload |
//! | [`defaults`] | documented default property values |
//! | [`error`] | `ValidationError`, `ResourceError` |
//! | [`logging`] | `env_logger` setup for host binaries |
//! | [`testing`] | `RecordingGl`, `RecordingHost` |
//!
//! # Quick start
//!
//! ```rust
//! use atoll_layer::testing::{RecordingGl, RecordingHost};
//! use atoll_layer::{CircleLayer, CustomLayer};
//!
//! let mut layer = CircleLayer::new("site-radius");
//! let mut host = RecordingHost::new();
//! let mut gl = RecordingGl::new();
//!
//! layer.on_add(&mut host, &mut gl).unwrap();
//! layer.prerender(&mut gl);
//!
//! let matrix = [
//!     1.0, 0.0, 0.0, 0.0, //
//!     0.0, 1.0, 0.0, 0.0, //
//!     0.0, 0.0, 1.0, 0.0, //
//!     0.0, 0.0, 0.0, 1.0,
//! ];
//! layer.render(&mut gl, &matrix);
//! assert_eq!(gl.draw_count(), 1);
//! ```

mod circle;
pub mod color;
pub mod defaults;
pub mod error;
pub mod gl;
pub mod host;
pub mod layer;
pub mod logging;
pub mod testing;

pub use circle::{CircleLayer, CircleOptions};
pub use color::Rgba;
pub use error::{ResourceError, ValidationError};
pub use host::{ContextEvent, MapHost, Subscription};
pub use layer::CustomLayer;
