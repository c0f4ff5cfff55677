use crate::error::ResourceError;

use super::{GlContext, ProgramId, ShaderId, ShaderStage};

/// A linked program together with the shader objects it was built from.
///
/// The shader handles are kept so the owner can delete them when the layer
/// is removed; the context does not reclaim them implicitly.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LinkedProgram {
    pub vertex: ShaderId,
    pub fragment: ShaderId,
    pub program: ProgramId,
}

/// Compiles both shader stages and links them.
///
/// Fails fast: the first compile or link error is returned and no cleanup of
/// earlier objects is attempted. A failed attach is abandoned as a whole and
/// the host reclaims stragglers with the context.
pub fn build_program(
    gl: &mut dyn GlContext,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<LinkedProgram, ResourceError> {
    let vertex = compile(gl, ShaderStage::Vertex, vertex_src)?;
    let fragment = compile(gl, ShaderStage::Fragment, fragment_src)?;

    let program = gl
        .link_program(vertex, fragment)
        .map_err(|e| ResourceError::ProgramLink { message: e.message })?;

    Ok(LinkedProgram { vertex, fragment, program })
}

fn compile(
    gl: &mut dyn GlContext,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderId, ResourceError> {
    gl.compile_shader(stage, source)
        .map_err(|e| ResourceError::ShaderCompile { stage, message: e.message })
}
