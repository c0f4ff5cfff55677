//! Scriptable in-memory doubles for the host-facing traits.
//!
//! These ship in the library proper (not behind `cfg(test)`) so hosts can
//! drive a layer through its whole lifecycle in their own tests without a
//! real GPU context.

use std::collections::HashMap;

use crate::gl::{
    AttribLocation, BufferId, BufferUsage, GlContext, GlError, PrimitiveMode, ProgramId, ShaderId,
    ShaderStage, UniformLocation,
};
use crate::host::{ContextEvent, MapHost, Subscription};

/// One observed [`GlContext`] call, in order of arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CompileShader { stage: ShaderStage, id: ShaderId },
    LinkProgram { id: ProgramId },
    CreateBuffer { id: BufferId },
    BufferData { buffer: BufferId, len: usize, usage: BufferUsage },
    UseProgram { program: ProgramId },
    SetMat4 { location: UniformLocation, value: [f32; 16] },
    SetVec4 { location: UniformLocation, value: [f32; 4] },
    BindVec2Attrib { buffer: BufferId, location: AttribLocation },
    DrawArrays { mode: PrimitiveMode, first: u32, count: u32 },
    DeleteShader { id: ShaderId },
    DeleteProgram { id: ProgramId },
    DeleteBuffer { id: BufferId },
}

/// In-memory [`GlContext`] that hands out sequential handles (from 1) and
/// records every call.
///
/// Compile and link failures can be scripted to exercise error paths, and
/// attribute/uniform names can be hidden to simulate a program interface the
/// layer does not expect. Buffer uploads are retained verbatim.
#[derive(Debug, Default)]
pub struct RecordingGl {
    next_id: u32,
    /// Every call observed, in order.
    pub calls: Vec<GlCall>,

    buffers: HashMap<BufferId, (Vec<u8>, BufferUsage)>,
    attribs: HashMap<(ProgramId, String), AttribLocation>,
    uniforms: HashMap<(ProgramId, String), UniformLocation>,

    fail_compile: Option<(ShaderStage, String)>,
    fail_link: Option<String>,
    hidden_names: Vec<String>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts every compile of `stage` to fail with `message`.
    pub fn fail_compile(&mut self, stage: ShaderStage, message: impl Into<String>) {
        self.fail_compile = Some((stage, message.into()));
    }

    /// Scripts every link to fail with `message`.
    pub fn fail_link(&mut self, message: impl Into<String>) {
        self.fail_link = Some(message.into());
    }

    /// Makes `name` report as absent from every program interface.
    pub fn hide_name(&mut self, name: impl Into<String>) {
        self.hidden_names.push(name.into());
    }

    /// Last bytes uploaded to `buffer`, if any.
    pub fn buffer_bytes(&self, buffer: BufferId) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(|(bytes, _)| bytes.as_slice())
    }

    pub fn upload_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, GlCall::BufferData { .. })).count()
    }

    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, GlCall::DrawArrays { .. })).count()
    }

    pub fn delete_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    GlCall::DeleteShader { .. }
                        | GlCall::DeleteProgram { .. }
                        | GlCall::DeleteBuffer { .. }
                )
            })
            .count()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GlContext for RecordingGl {
    fn compile_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<ShaderId, GlError> {
        if let Some((failing, message)) = &self.fail_compile {
            if *failing == stage {
                return Err(GlError::new(message.clone()));
            }
        }
        let id = ShaderId(self.next());
        self.calls.push(GlCall::CompileShader { stage, id });
        Ok(id)
    }

    fn link_program(
        &mut self,
        _vertex: ShaderId,
        _fragment: ShaderId,
    ) -> Result<ProgramId, GlError> {
        if let Some(message) = &self.fail_link {
            return Err(GlError::new(message.clone()));
        }
        let id = ProgramId(self.next());
        self.calls.push(GlCall::LinkProgram { id });
        Ok(id)
    }

    fn attrib_location(&mut self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        if self.hidden_names.iter().any(|n| n == name) {
            return None;
        }
        let key = (program, name.to_string());
        if let Some(loc) = self.attribs.get(&key) {
            return Some(*loc);
        }
        let loc = AttribLocation(self.next());
        self.attribs.insert(key, loc);
        Some(loc)
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        if self.hidden_names.iter().any(|n| n == name) {
            return None;
        }
        let key = (program, name.to_string());
        if let Some(loc) = self.uniforms.get(&key) {
            return Some(*loc);
        }
        let loc = UniformLocation(self.next());
        self.uniforms.insert(key, loc);
        Some(loc)
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next());
        self.calls.push(GlCall::CreateBuffer { id });
        id
    }

    fn buffer_data(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage) {
        self.buffers.insert(buffer, (data.to_vec(), usage));
        self.calls.push(GlCall::BufferData { buffer, len: data.len(), usage });
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(GlCall::UseProgram { program });
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.calls.push(GlCall::SetMat4 { location, value: *value });
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.calls.push(GlCall::SetVec4 { location, value });
    }

    fn bind_vec2_attrib(&mut self, buffer: BufferId, location: AttribLocation) {
        self.calls.push(GlCall::BindVec2Attrib { buffer, location });
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32) {
        self.calls.push(GlCall::DrawArrays { mode, first, count });
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.calls.push(GlCall::DeleteShader { id: shader });
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(GlCall::DeleteProgram { id: program });
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        self.calls.push(GlCall::DeleteBuffer { id: buffer });
    }
}

/// In-memory [`MapHost`] counting repaints and tracking live subscriptions.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next_token: u64,
    /// Repaint requests observed so far.
    pub repaints: usize,
    /// Live (token, event) pairs in subscription order.
    pub subscriptions: Vec<(Subscription, ContextEvent)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_subscribed(&self, event: ContextEvent) -> bool {
        self.subscriptions.iter().any(|(_, e)| *e == event)
    }
}

impl MapHost for RecordingHost {
    fn request_repaint(&mut self) {
        self.repaints += 1;
    }

    fn subscribe(&mut self, event: ContextEvent) -> Subscription {
        self.next_token += 1;
        let token = Subscription(self.next_token);
        self.subscriptions.push((token, event));
        token
    }

    fn unsubscribe(&mut self, token: Subscription) {
        self.subscriptions.retain(|(t, _)| *t != token);
    }
}
