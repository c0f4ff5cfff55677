//! CPU implementation of the layer-facing GL contract.
//!
//! Responsibilities:
//! - Compile/link "shaders" by scanning their declared attributes and
//!   uniforms (the bodies are never executed; the fixed pipeline below
//!   stands in for them).
//! - Keep buffer, program and uniform state keyed by the same opaque
//!   handles a real driver would hand out.
//! - Rasterize `vec2` geometry through the bound mat4 into an RGBA8
//!   framebuffer, blending premultiplied source-over.
//!
//! There is no depth, scissor or texture support; the viewer only needs
//! flat translucent fills over a CPU-drawn basemap.

use std::collections::HashMap;

use atoll_layer::gl::{
    AttribLocation, BufferId, BufferUsage, GlContext, GlError, PrimitiveMode, ProgramId, ShaderId,
    ShaderStage, UniformLocation,
};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum UniformKind {
    Mat4,
    Vec4,
    Other,
}

impl UniformKind {
    fn from_glsl(type_token: &str) -> Self {
        match type_token {
            "mat4" => UniformKind::Mat4,
            "vec4" => UniformKind::Vec4,
            _ => UniformKind::Other,
        }
    }
}

/// Attribute and uniform names declared by one shader source.
#[derive(Debug, Clone, Default)]
struct ShaderInterface {
    attributes: Vec<String>,
    uniforms: Vec<(String, UniformKind)>,
}

#[derive(Debug)]
struct ShaderData {
    stage: ShaderStage,
    interface: ShaderInterface,
}

#[derive(Debug, Default)]
struct ProgramData {
    attribs: HashMap<String, AttribLocation>,
    uniforms: HashMap<String, (UniformLocation, UniformKind)>,
}

impl ProgramData {
    fn uniform_of_kind(&self, kind: UniformKind) -> Option<UniformLocation> {
        self.uniforms.values().find(|(_, k)| *k == kind).map(|(location, _)| *location)
    }
}

/// Software GL context rendering into an owned RGBA8 framebuffer.
///
/// Shader sources are parsed for their interface only, so location lookups
/// answer truthfully for the declared names and `None` otherwise. Draws run
/// the one pipeline the circle needs: positions through the bound mat4
/// uniform, flat-filled with the bound vec4 uniform.
pub struct SoftGl {
    width: u32,
    height: u32,
    pixels: Vec<u8>,

    next_id: u32,
    shaders: HashMap<ShaderId, ShaderData>,
    programs: HashMap<ProgramId, ProgramData>,
    buffers: HashMap<BufferId, Vec<u8>>,

    bound_program: Option<ProgramId>,
    bound_attrib: Option<(BufferId, AttribLocation)>,
    mat4s: HashMap<UniformLocation, [f32; 16]>,
    vec4s: HashMap<UniformLocation, [f32; 4]>,
}

impl SoftGl {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            next_id: 0,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            bound_program: None,
            bound_attrib: None,
            mat4s: HashMap::new(),
            vec4s: HashMap::new(),
        }
    }

    /// Reallocates the framebuffer. Handles and uniform state survive; this
    /// is a viewport change, not a context loss.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![0; (width * height * 4) as usize];
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Clip position of one input vertex under `m`, mapped to pixel space
    /// with the usual viewport y flip.
    fn to_screen(&self, m: &[f32; 16], v: [f32; 2]) -> [f32; 2] {
        let x = m[0] * v[0] + m[4] * v[1] + m[12];
        let y = m[1] * v[0] + m[5] * v[1] + m[13];
        let w = m[3] * v[0] + m[7] * v[1] + m[15];
        let (x, y) = if w == 0.0 { (x, y) } else { (x / w, y / w) };
        [
            (x + 1.0) * 0.5 * self.width as f32,
            (1.0 - y) * 0.5 * self.height as f32,
        ]
    }

    fn fill_triangle(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], color: [f32; 4]) {
        if self.width == 0 || self.height == 0 || edge(a, b, c) == 0.0 {
            return;
        }

        let min_x = a[0].min(b[0]).min(c[0]).floor().max(0.0);
        let max_x = a[0].max(b[0]).max(c[0]).ceil().min((self.width - 1) as f32);
        let min_y = a[1].min(b[1]).min(c[1]).floor().max(0.0);
        let max_y = a[1].max(b[1]).max(c[1]).ceil().min((self.height - 1) as f32);
        if min_x > max_x || min_y > max_y {
            return;
        }

        for py in min_y as u32..=max_y as u32 {
            for px in min_x as u32..=max_x as u32 {
                let s = [px as f32 + 0.5, py as f32 + 0.5];
                let w0 = edge(b, c, s);
                let w1 = edge(c, a, s);
                let w2 = edge(a, b, s);
                // Accept either winding.
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if inside {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Premultiplied source-over: `out = src + dst * (1 - src.a)`.
    fn blend_pixel(&mut self, x: u32, y: u32, src: [f32; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        let inv = 1.0 - src[3];
        for (offset, s) in src.iter().enumerate() {
            let dst = f32::from(self.pixels[i + offset]) / 255.0;
            let out = (s + dst * inv).clamp(0.0, 1.0);
            self.pixels[i + offset] = (out * 255.0 + 0.5) as u8;
        }
    }
}

impl GlContext for SoftGl {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderId, GlError> {
        if !source.contains("void main") {
            return Err(GlError::new(format!("{stage} shader has no main entry point")));
        }
        let id = ShaderId(self.next());
        self.shaders.insert(id, ShaderData { stage, interface: scan_interface(source) });
        Ok(id)
    }

    fn link_program(&mut self, vertex: ShaderId, fragment: ShaderId) -> Result<ProgramId, GlError> {
        let Some(vs) = self.shaders.get(&vertex) else {
            return Err(GlError::new("link against a deleted vertex shader"));
        };
        let Some(fs) = self.shaders.get(&fragment) else {
            return Err(GlError::new("link against a deleted fragment shader"));
        };
        if vs.stage != ShaderStage::Vertex || fs.stage != ShaderStage::Fragment {
            return Err(GlError::new("link with swapped shader stages"));
        }

        // The linked interface is a snapshot; deleting the shaders afterwards
        // must not invalidate the program, same as a real driver.
        let mut data = ProgramData::default();
        for (slot, name) in vs.interface.attributes.iter().chain(&fs.interface.attributes).enumerate()
        {
            data.attribs.insert(name.clone(), AttribLocation(slot as u32));
        }
        let merged: Vec<(String, UniformKind)> =
            vs.interface.uniforms.iter().chain(&fs.interface.uniforms).cloned().collect();
        for (name, kind) in merged {
            let location = UniformLocation(self.next());
            data.uniforms.entry(name).or_insert((location, kind));
        }

        let id = ProgramId(self.next());
        self.programs.insert(id, data);
        Ok(id)
    }

    fn attrib_location(&mut self, program: ProgramId, name: &str) -> Option<AttribLocation> {
        self.programs.get(&program)?.attribs.get(name).copied()
    }

    fn uniform_location(&mut self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.programs.get(&program)?.uniforms.get(name).map(|(location, _)| *location)
    }

    fn create_buffer(&mut self) -> BufferId {
        let id = BufferId(self.next());
        self.buffers.insert(id, Vec::new());
        id
    }

    fn buffer_data(&mut self, buffer: BufferId, data: &[u8], _usage: BufferUsage) {
        let Some(contents) = self.buffers.get_mut(&buffer) else {
            log::warn!("upload to unknown buffer {buffer:?}");
            return;
        };
        contents.clear();
        contents.extend_from_slice(data);
    }

    fn use_program(&mut self, program: ProgramId) {
        if !self.programs.contains_key(&program) {
            log::warn!("use of unknown program {program:?}");
            return;
        }
        self.bound_program = Some(program);
    }

    fn set_uniform_mat4(&mut self, location: UniformLocation, value: &[f32; 16]) {
        self.mat4s.insert(location, *value);
    }

    fn set_uniform_vec4(&mut self, location: UniformLocation, value: [f32; 4]) {
        self.vec4s.insert(location, value);
    }

    fn bind_vec2_attrib(&mut self, buffer: BufferId, location: AttribLocation) {
        self.bound_attrib = Some((buffer, location));
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, first: u32, count: u32) {
        let Some(program) = self.bound_program.and_then(|id| self.programs.get(&id)) else {
            log::warn!("draw without a bound program");
            return;
        };
        let Some(data) = self.bound_attrib.and_then(|(buffer, _)| self.buffers.get(&buffer))
        else {
            log::warn!("draw without a bound vertex buffer");
            return;
        };
        let Some(matrix) =
            program.uniform_of_kind(UniformKind::Mat4).and_then(|l| self.mat4s.get(&l)).copied()
        else {
            log::warn!("draw with the matrix uniform unset");
            return;
        };
        let Some(color) =
            program.uniform_of_kind(UniformKind::Vec4).and_then(|l| self.vec4s.get(&l)).copied()
        else {
            log::warn!("draw with the color uniform unset");
            return;
        };

        let vertices: Vec<[f32; 2]> =
            data.chunks_exact(8).map(bytemuck::pod_read_unaligned).collect();
        let start = (first as usize).min(vertices.len());
        let end = (start + count as usize).min(vertices.len());
        if end - start < 3 {
            return;
        }
        let screen: Vec<[f32; 2]> =
            vertices[start..end].iter().map(|v| self.to_screen(&matrix, *v)).collect();

        match mode {
            PrimitiveMode::Triangles => {
                for t in screen.chunks_exact(3) {
                    self.fill_triangle(t[0], t[1], t[2], color);
                }
            }
            PrimitiveMode::TriangleStrip => {
                for i in 0..screen.len() - 2 {
                    self.fill_triangle(screen[i], screen[i + 1], screen[i + 2], color);
                }
            }
            PrimitiveMode::TriangleFan => {
                for i in 1..screen.len() - 1 {
                    self.fill_triangle(screen[0], screen[i], screen[i + 1], color);
                }
            }
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.shaders.remove(&shader);
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        if self.bound_program == Some(program) {
            self.bound_program = None;
        }
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.bound_attrib.is_some_and(|(b, _)| b == buffer) {
            self.bound_attrib = None;
        }
    }
}

/// Signed double area of `(p, q, r)`; sign encodes which side `r` lies on.
#[inline]
fn edge(p: [f32; 2], q: [f32; 2], r: [f32; 2]) -> f32 {
    (q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])
}

/// Collects `attribute`/`uniform` declarations, ignoring `//` comments.
fn scan_interface(source: &str) -> ShaderInterface {
    let mut code = String::new();
    for line in source.lines() {
        code.push_str(line.split("//").next().unwrap_or(""));
        code.push('\n');
    }

    let mut interface = ShaderInterface::default();
    for statement in code.split(';') {
        let mut words = statement.split_whitespace();
        let (Some(qualifier), Some(ty), Some(name)) = (words.next(), words.next(), words.next())
        else {
            continue;
        };
        match qualifier {
            "attribute" => interface.attributes.push(name.to_string()),
            "uniform" => interface.uniforms.push((name.to_string(), UniformKind::from_glsl(ty))),
            _ => {}
        }
    }
    interface
}
