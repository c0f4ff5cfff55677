use std::fmt;

/// Handle to a compiled shader object.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ShaderId(pub u32);

/// Handle to a linked program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ProgramId(pub u32);

/// Handle to a vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferId(pub u32);

/// Location of an active vertex attribute within a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AttribLocation(pub u32);

/// Location of an active uniform within a program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrimitiveMode {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Upload frequency hint, mirroring the GL usage enums.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    StaticDraw,
    /// Rewritten whenever the geometry changes.
    DynamicDraw,
}

/// Failure reported by the host context, carrying the driver info log.
#[derive(Debug, Clone, PartialEq)]
pub struct GlError {
    pub message: String,
}

impl GlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for GlError {}

/// Command surface a hosting map engine exposes to its layers.
///
/// Modeled on the GL-style contexts map engines hand to layer callbacks:
/// shaders are compiled from source, attributes and uniforms are looked up by
/// name, buffers are uploaded as raw bytes. Handles stay valid for one
/// context incarnation; after a context loss every outstanding handle is
/// dead and the host issues fresh ones.
///
/// Blending is host-owned and premultiplied (`ONE, ONE_MINUS_SRC_ALPHA`), so
/// color uniforms are expected in premultiplied form.
pub trait GlContext {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, GlError>;
    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, GlError>;

    /// `None` when the program has no active attribute of that name.
    fn attrib_location(&mut self, program: ProgramId, name: &str) -> Option<AttribLocation>;
    /// `None` when the program has no active uniform of that name.
    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation>;

    fn create_buffer(&mut self) -> BufferId;
    /// Replaces the buffer's entire contents.
    fn buffer_data(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage);

    fn use_program(&mut self, program: ProgramId);
    /// Column-major, like every GL matrix upload.
    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]);
    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]);
    /// Binds `buffer` as tightly packed `vec2` f32 data feeding `location`.
    fn bind_vec2_attrib(&mut self, buffer: BufferId, location: AttribLocation);
    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32);

    fn delete_shader(&mut self, shader: ShaderId);
    fn delete_program(&mut self, program: ProgramId);
    fn delete_buffer(&mut self, buffer: BufferId);
}
