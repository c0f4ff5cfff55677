use std::fmt;

use crate::gl::ShaderStage;

/// A rejected property value.
///
/// Raised synchronously by constructors and setters; the layer keeps its
/// previous valid state and nothing downstream (geometry, GPU buffers) is
/// touched.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ValidationError {
    /// Radius must be finite and non-negative (meters).
    Radius { value: f64 },
    /// A fan needs at least 3 triangles.
    Segments { value: u32 },
    /// Center coordinates must be finite.
    Center { lng: f64, lat: f64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Radius { value } => {
                write!(f, "radius must be a finite non-negative number of meters, got {value}")
            }
            ValidationError::Segments { value } => {
                write!(f, "a circle fan needs at least 3 triangles, got {value}")
            }
            ValidationError::Center { lng, lat } => {
                write!(f, "center coordinates must be finite, got ({lng}, {lat})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// GPU resource creation failure.
///
/// Propagated out of `on_add` / `context_restored`; the attach attempt is
/// abandoned as a whole and the host decides what to do with the layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader stage failed to compile; `message` is the driver info log.
    ShaderCompile { stage: ShaderStage, message: String },
    /// The program failed to link.
    ProgramLink { message: String },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::ShaderCompile { stage, message } => {
                write!(f, "{stage} shader failed to compile: {message}")
            }
            ResourceError::ProgramLink { message } => {
                write!(f, "program failed to link: {message}")
            }
        }
    }
}

impl std::error::Error for ResourceError {}
