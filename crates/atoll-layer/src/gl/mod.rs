//! Host GPU context abstraction.
//!
//! Responsibilities:
//! - define the command surface a layer needs from a GL-style host context
//! - keep handles opaque and `Copy` so layers can hold them across frames
//! - isolate the compile-and-link helper in `gl::program`

mod context;
mod program;

pub use context::{
    AttribLocation, BufferId, BufferUsage, GlContext, GlError, PrimitiveMode, ProgramId, ShaderId,
    ShaderStage, UniformLocation,
};
pub use program::{LinkedProgram, build_program};
