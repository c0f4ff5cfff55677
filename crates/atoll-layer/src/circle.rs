use atoll_geo::{LngLat, Projector, WebMercator, circle_fan};
use bytemuck::{Pod, Zeroable};

use crate::color::Rgba;
use crate::defaults::{DEFAULT_CENTER, DEFAULT_FILL, DEFAULT_RADIUS_M, DEFAULT_SEGMENTS};
use crate::error::{ResourceError, ValidationError};
use crate::gl::{
    AttribLocation, BufferId, BufferUsage, GlContext, PrimitiveMode, ProgramId, ShaderId,
    build_program,
};
use crate::host::{ContextEvent, MapHost, Subscription};
use crate::layer::CustomLayer;

const VERTEX_SHADER: &str = include_str!("shaders/circle.vert");
const FRAGMENT_SHADER: &str = include_str!("shaders/circle.frag");

const POSITION_ATTRIB: &str = "a_pos";
const MATRIX_UNIFORM: &str = "u_matrix";
const COLOR_UNIFORM: &str = "u_color";

/// Construction-time property overrides for [`CircleLayer`].
///
/// `..Default::default()` fills the rest with the crate
/// [`defaults`](crate::defaults).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CircleOptions {
    pub center: LngLat,
    pub radius_m: f64,
    pub segments: u32,
    pub fill: Rgba,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            radius_m: DEFAULT_RADIUS_M,
            segments: DEFAULT_SEGMENTS,
            fill: DEFAULT_FILL,
        }
    }
}

/// GPU objects for one context incarnation.
#[derive(Debug, Copy, Clone)]
struct GpuResources {
    vertex_shader: ShaderId,
    fragment_shader: ShaderId,
    program: ProgramId,
    /// `None` when the linked program has no active position attribute.
    position: Option<AttribLocation>,
    buffer: BufferId,
}

#[derive(Debug, Copy, Clone)]
struct EventSubscriptions {
    lost: Subscription,
    restored: Subscription,
}

/// Vertex as uploaded: projected position, tightly packed.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Vertex {
    pos: [f32; 2],
}

/// A filled geographic circle rendered as a triangle fan.
///
/// Center and radius are geodetic (degrees, meters); vertices live in the
/// host's projected space and are rebuilt by [`circle_fan`] whenever a
/// geometry property changes. Rebuilds are deferred to `prerender` behind a
/// dirty flag, so any number of property edits between frames costs exactly
/// one rebuild and one upload.
///
/// Fill color is not part of the vertex stream; changing it repaints without
/// touching the flag.
#[derive(Debug)]
pub struct CircleLayer<P: Projector = WebMercator> {
    id: String,
    center: LngLat,
    radius_m: f64,
    segments: u32,
    fill: Rgba,
    projector: P,

    dirty: bool,
    resources: Option<GpuResources>,
    subscriptions: Option<EventSubscriptions>,
}

impl CircleLayer<WebMercator> {
    /// Creates a layer with the default properties (a 50 m circle at Tokyo
    /// Station, see [`defaults`](crate::defaults)).
    pub fn new(id: impl Into<String>) -> Self {
        Self::from_parts(id.into(), CircleOptions::default(), WebMercator)
    }

    /// Creates a layer with explicit properties.
    ///
    /// Validation failures reject the whole construction; no partially
    /// configured layer is ever observable.
    pub fn with_options(
        id: impl Into<String>,
        options: CircleOptions,
    ) -> Result<Self, ValidationError> {
        Self::with_projector(id, options, WebMercator)
    }
}

impl<P: Projector> CircleLayer<P> {
    /// Creates a layer for a host whose projected space is not web mercator.
    pub fn with_projector(
        id: impl Into<String>,
        options: CircleOptions,
        projector: P,
    ) -> Result<Self, ValidationError> {
        validate_center(options.center)?;
        validate_radius(options.radius_m)?;
        validate_segments(options.segments)?;
        Ok(Self::from_parts(id.into(), options, projector))
    }

    fn from_parts(id: String, options: CircleOptions, projector: P) -> Self {
        Self {
            id,
            center: options.center,
            radius_m: options.radius_m,
            segments: options.segments,
            fill: options.fill,
            projector,
            dirty: true,
            resources: None,
            subscriptions: None,
        }
    }

    // ── properties ─────────────────────────────────────────────────────────

    #[inline]
    pub fn center(&self) -> LngLat {
        self.center
    }

    #[inline]
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    #[inline]
    pub fn segments(&self) -> u32 {
        self.segments
    }

    #[inline]
    pub fn fill(&self) -> Rgba {
        self.fill
    }

    /// Moves the circle. On success the fan is rebuilt on the next
    /// `prerender` and a repaint is requested; on rejection nothing changes.
    pub fn set_center(
        &mut self,
        host: &mut dyn MapHost,
        center: LngLat,
    ) -> Result<(), ValidationError> {
        validate_center(center)?;
        self.center = center;
        self.mark_dirty(host);
        Ok(())
    }

    /// Resizes the circle (meters). Zero is valid and collapses the fan.
    pub fn set_radius_m(
        &mut self,
        host: &mut dyn MapHost,
        radius_m: f64,
    ) -> Result<(), ValidationError> {
        validate_radius(radius_m)?;
        self.radius_m = radius_m;
        self.mark_dirty(host);
        Ok(())
    }

    /// Changes the fan's triangle count (minimum 3).
    pub fn set_segments(
        &mut self,
        host: &mut dyn MapHost,
        segments: u32,
    ) -> Result<(), ValidationError> {
        validate_segments(segments)?;
        self.segments = segments;
        self.mark_dirty(host);
        Ok(())
    }

    /// Restyles the fill. Color lives in a uniform, not the vertex stream,
    /// so this repaints without marking the geometry dirty.
    pub fn set_fill(&mut self, host: &mut dyn MapHost, fill: Rgba) {
        self.fill = fill;
        host.request_repaint();
    }

    fn mark_dirty(&mut self, host: &mut dyn MapHost) {
        self.dirty = true;
        host.request_repaint();
    }

    // ── resources ──────────────────────────────────────────────────────────

    /// Compiles, links, and allocates a fresh resource set, replacing
    /// whatever was stored. Shared by `on_add` and `context_restored`.
    fn create_resources(&mut self, gl: &mut dyn GlContext) -> Result<(), ResourceError> {
        let linked = build_program(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;

        let position = gl.attrib_location(linked.program, POSITION_ATTRIB);
        if position.is_none() {
            log::error!(
                "layer '{}': linked program has no active '{POSITION_ATTRIB}' attribute",
                self.id
            );
        }

        self.resources = Some(GpuResources {
            vertex_shader: linked.vertex,
            fragment_shader: linked.fragment,
            program: linked.program,
            position,
            buffer: gl.create_buffer(),
        });
        self.dirty = true;
        Ok(())
    }
}

impl<P: Projector> CustomLayer for CircleLayer<P> {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_add(
        &mut self,
        host: &mut dyn MapHost,
        gl: &mut dyn GlContext,
    ) -> Result<(), ResourceError> {
        if self.resources.is_some() {
            log::warn!("layer '{}': on_add while already attached, reallocating", self.id);
        }
        self.create_resources(gl)?;

        self.subscriptions = Some(EventSubscriptions {
            lost: host.subscribe(ContextEvent::Lost),
            restored: host.subscribe(ContextEvent::Restored),
        });
        Ok(())
    }

    fn on_remove(&mut self, host: &mut dyn MapHost, gl: &mut dyn GlContext) {
        if let Some(subs) = self.subscriptions.take() {
            host.unsubscribe(subs.lost);
            host.unsubscribe(subs.restored);
        }
        if let Some(res) = self.resources.take() {
            gl.delete_buffer(res.buffer);
            gl.delete_program(res.program);
            gl.delete_shader(res.vertex_shader);
            gl.delete_shader(res.fragment_shader);
        }
        self.dirty = true;
    }

    fn prerender(&mut self, gl: &mut dyn GlContext) {
        if !self.dirty {
            return;
        }
        let Some(res) = self.resources.as_ref() else {
            log::error!("layer '{}': prerender without resources, geometry deferred", self.id);
            return;
        };

        let ring = circle_fan(self.center, self.radius_m, self.segments, &self.projector);
        let vertices: Vec<Vertex> = ring
            .iter()
            .map(|p| Vertex { pos: [p.x as f32, p.y as f32] })
            .collect();

        gl.buffer_data(res.buffer, bytemuck::cast_slice(&vertices), BufferUsage::DynamicDraw);
        self.dirty = false;

        log::debug!(
            "layer '{}': rebuilt fan, {} vertices ({} triangles)",
            self.id,
            vertices.len(),
            self.segments
        );
    }

    fn render(&mut self, gl: &mut dyn GlContext, matrix: &[f64; 16]) {
        let Some(res) = self.resources.as_ref() else {
            log::error!("layer '{}': render without resources, skipping draw", self.id);
            return;
        };
        let Some(position) = res.position else {
            log::error!("layer '{}': no position attribute, skipping draw", self.id);
            return;
        };

        gl.use_program(res.program);

        // Locations are context-scoped; re-querying per frame keeps this
        // correct across context restores for free.
        let Some(u_matrix) = gl.uniform_location(res.program, MATRIX_UNIFORM) else {
            log::error!("layer '{}': uniform '{MATRIX_UNIFORM}' missing, skipping draw", self.id);
            return;
        };
        let Some(u_color) = gl.uniform_location(res.program, COLOR_UNIFORM) else {
            log::error!("layer '{}': uniform '{COLOR_UNIFORM}' missing, skipping draw", self.id);
            return;
        };

        let matrix: [f32; 16] = matrix.map(|v| v as f32);
        gl.set_uniform_mat4(u_matrix, &matrix);
        gl.set_uniform_vec4(u_color, self.fill.premultiplied());

        gl.bind_vec2_attrib(res.buffer, position);
        gl.draw_arrays(PrimitiveMode::TriangleFan, 0, self.segments + 2);
    }

    fn context_lost(&mut self) {
        // The handles died with the context; deleting them now would poke a
        // dead context. Subscriptions are host-side state and survive.
        self.resources = None;
        log::debug!("layer '{}': context lost, resources dropped", self.id);
    }

    fn context_restored(&mut self, gl: &mut dyn GlContext) -> Result<(), ResourceError> {
        self.create_resources(gl)
    }
}

// ── validation ─────────────────────────────────────────────────────────────

fn validate_center(center: LngLat) -> Result<(), ValidationError> {
    if center.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::Center { lng: center.lng, lat: center.lat })
    }
}

fn validate_radius(radius_m: f64) -> Result<(), ValidationError> {
    if radius_m.is_finite() && radius_m >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::Radius { value: radius_m })
    }
}

fn validate_segments(segments: u32) -> Result<(), ValidationError> {
    if segments >= 3 { Ok(()) } else { Err(ValidationError::Segments { value: segments }) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::ShaderStage;
    use crate::testing::{GlCall, RecordingGl, RecordingHost};

    const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    fn attached() -> (CircleLayer, RecordingHost, RecordingGl) {
        let mut layer = CircleLayer::new("circle");
        let mut host = RecordingHost::new();
        let mut gl = RecordingGl::new();
        layer.on_add(&mut host, &mut gl).unwrap();
        (layer, host, gl)
    }

    fn rendered() -> (CircleLayer, RecordingHost, RecordingGl) {
        let (mut layer, host, mut gl) = attached();
        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);
        (layer, host, gl)
    }

    fn linked_programs(gl: &RecordingGl) -> Vec<ProgramId> {
        gl.calls
            .iter()
            .filter_map(|c| match c {
                GlCall::LinkProgram { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_uses_documented_defaults() {
        let layer = CircleLayer::new("circle");
        assert_eq!(layer.id(), "circle");
        assert_eq!(layer.center(), DEFAULT_CENTER);
        assert_eq!(layer.radius_m(), DEFAULT_RADIUS_M);
        assert_eq!(layer.segments(), DEFAULT_SEGMENTS);
        assert_eq!(layer.fill(), DEFAULT_FILL);
        assert!(layer.dirty);
    }

    #[test]
    fn kind_is_custom() {
        assert_eq!(CircleLayer::new("circle").kind(), "custom");
    }

    #[test]
    fn with_options_overrides_every_field() {
        let layer = CircleLayer::with_options(
            "circle",
            CircleOptions {
                center: LngLat::new(11.0, 48.0),
                radius_m: 120.5,
                segments: 6,
                fill: Rgba::new(1.0, 0.0, 0.0, 1.0),
            },
        )
        .unwrap();
        assert_eq!(layer.center(), LngLat::new(11.0, 48.0));
        assert_eq!(layer.radius_m(), 120.5);
        assert_eq!(layer.segments(), 6);
        assert_eq!(layer.fill(), Rgba::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn with_options_rejects_negative_radius() {
        let err = CircleLayer::with_options(
            "circle",
            CircleOptions { radius_m: -1.0, ..CircleOptions::default() },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Radius { value: -1.0 });
    }

    #[test]
    fn with_options_rejects_two_segments() {
        let err = CircleLayer::with_options(
            "circle",
            CircleOptions { segments: 2, ..CircleOptions::default() },
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::Segments { value: 2 });
    }

    #[test]
    fn with_options_rejects_nonfinite_center() {
        let err = CircleLayer::with_options(
            "circle",
            CircleOptions { center: LngLat::new(f64::NAN, 0.0), ..CircleOptions::default() },
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::Center { .. }));
    }

    #[test]
    fn with_options_accepts_zero_radius() {
        let layer = CircleLayer::with_options(
            "circle",
            CircleOptions { radius_m: 0.0, ..CircleOptions::default() },
        )
        .unwrap();
        assert_eq!(layer.radius_m(), 0.0);
    }

    // ── attach ────────────────────────────────────────────────────────────

    #[test]
    fn on_add_allocates_and_subscribes() {
        let (layer, host, gl) = attached();

        assert!(layer.resources.is_some());
        assert!(layer.dirty);

        let kinds: Vec<_> = gl.calls.iter().take(4).collect();
        assert!(matches!(kinds[0], GlCall::CompileShader { stage: ShaderStage::Vertex, .. }));
        assert!(matches!(kinds[1], GlCall::CompileShader { stage: ShaderStage::Fragment, .. }));
        assert!(matches!(kinds[2], GlCall::LinkProgram { .. }));
        assert!(matches!(kinds[3], GlCall::CreateBuffer { .. }));

        assert!(host.is_subscribed(ContextEvent::Lost));
        assert!(host.is_subscribed(ContextEvent::Restored));
        assert_eq!(host.subscriptions.len(), 2);
    }

    #[test]
    fn failed_compile_leaves_layer_unattached() {
        let mut layer = CircleLayer::new("circle");
        let mut host = RecordingHost::new();
        let mut gl = RecordingGl::new();
        gl.fail_compile(ShaderStage::Vertex, "syntax error");

        let err = layer.on_add(&mut host, &mut gl).unwrap_err();
        assert!(matches!(err, ResourceError::ShaderCompile { stage: ShaderStage::Vertex, .. }));
        assert!(layer.resources.is_none());
        assert!(host.subscriptions.is_empty());

        // Detach after the failed attach must be a no-op, not a crash.
        layer.render(&mut gl, &IDENTITY);
        layer.on_remove(&mut host, &mut gl);
        assert_eq!(gl.draw_count(), 0);
        assert_eq!(gl.delete_count(), 0);
    }

    // ── property contract ─────────────────────────────────────────────────

    #[test]
    fn setter_stores_marks_dirty_and_repaints() {
        let (mut layer, mut host, _gl) = rendered();
        assert!(!layer.dirty);

        layer.set_radius_m(&mut host, 80.0).unwrap();
        assert_eq!(layer.radius_m(), 80.0);
        assert!(layer.dirty);
        assert_eq!(host.repaints, 1);

        layer.set_center(&mut host, LngLat::new(2.3522, 48.8566)).unwrap();
        layer.set_segments(&mut host, 16).unwrap();
        assert_eq!(host.repaints, 3);
    }

    #[test]
    fn rejected_setter_keeps_value_and_stays_quiet() {
        let (mut layer, mut host, _gl) = rendered();

        assert_eq!(
            layer.set_radius_m(&mut host, -5.0),
            Err(ValidationError::Radius { value: -5.0 })
        );
        assert_eq!(
            layer.set_radius_m(&mut host, f64::INFINITY),
            Err(ValidationError::Radius { value: f64::INFINITY })
        );
        assert_eq!(layer.set_segments(&mut host, 2), Err(ValidationError::Segments { value: 2 }));
        assert!(layer.set_center(&mut host, LngLat::new(0.0, f64::NAN)).is_err());

        assert_eq!(layer.radius_m(), DEFAULT_RADIUS_M);
        assert_eq!(layer.segments(), DEFAULT_SEGMENTS);
        assert_eq!(layer.center(), DEFAULT_CENTER);
        assert!(!layer.dirty);
        assert_eq!(host.repaints, 0);
    }

    #[test]
    fn set_fill_repaints_without_dirtying_geometry() {
        let (mut layer, mut host, mut gl) = rendered();

        layer.set_fill(&mut host, Rgba::new(0.0, 1.0, 0.0, 1.0));
        assert_eq!(host.repaints, 1);
        assert!(!layer.dirty);

        // Next frame re-uses the buffer untouched.
        let uploads_before = gl.upload_count();
        layer.prerender(&mut gl);
        assert_eq!(gl.upload_count(), uploads_before);
    }

    // ── prerender ─────────────────────────────────────────────────────────

    #[test]
    fn prerender_uploads_once_until_dirtied_again() {
        let (mut layer, _host, mut gl) = attached();

        layer.prerender(&mut gl);
        assert_eq!(gl.upload_count(), 1);
        assert!(!layer.dirty);

        layer.prerender(&mut gl);
        layer.prerender(&mut gl);
        assert_eq!(gl.upload_count(), 1);
    }

    #[test]
    fn prerender_uploads_the_whole_fan() {
        let (mut layer, _host, mut gl) = attached();
        layer.prerender(&mut gl);

        let buffer = layer.resources.as_ref().unwrap().buffer;
        let bytes = gl.buffer_bytes(buffer).unwrap();
        // segments + 2 vertices, two f32 each.
        assert_eq!(bytes.len(), (DEFAULT_SEGMENTS as usize + 2) * 8);

        let floats: Vec<f32> = bytemuck::pod_collect_to_vec(bytes);
        let center = atoll_geo::WebMercator::forward(DEFAULT_CENTER);
        assert_eq!(floats[0], center.x as f32);
        assert_eq!(floats[1], center.y as f32);
        // Closing vertex duplicates the first rim vertex.
        let n = floats.len();
        assert_eq!(floats[n - 2], floats[2]);
        assert_eq!(floats[n - 1], floats[3]);
    }

    #[test]
    fn prerender_without_resources_is_a_noop() {
        let mut layer = CircleLayer::new("circle");
        let mut gl = RecordingGl::new();
        layer.prerender(&mut gl);
        assert!(gl.calls.is_empty());
        assert!(layer.dirty);
    }

    // ── render ────────────────────────────────────────────────────────────

    #[test]
    fn render_issues_the_full_draw_sequence() {
        let (_layer, _host, gl) = rendered();

        let tail: Vec<_> = gl
            .calls
            .iter()
            .skip_while(|c| !matches!(c, GlCall::UseProgram { .. }))
            .collect();
        assert!(matches!(tail[0], GlCall::UseProgram { .. }));
        assert!(matches!(tail[1], GlCall::SetMat4 { .. }));
        assert!(matches!(tail[2], GlCall::SetVec4 { .. }));
        assert!(matches!(tail[3], GlCall::BindVec2Attrib { .. }));
        assert_eq!(
            *tail[4],
            GlCall::DrawArrays {
                mode: PrimitiveMode::TriangleFan,
                first: 0,
                count: DEFAULT_SEGMENTS + 2,
            }
        );

        // The fill reaches the GPU premultiplied.
        let GlCall::SetVec4 { value, .. } = tail[2] else { unreachable!() };
        assert_eq!(*value, [0.125, 0.125, 0.25, 0.5]);
    }

    #[test]
    fn render_casts_the_matrix_to_f32() {
        let (mut layer, _host, mut gl) = attached();
        layer.prerender(&mut gl);

        let mut matrix = IDENTITY;
        matrix[0] = 2.5;
        matrix[12] = -0.75;
        layer.render(&mut gl, &matrix);

        let recorded = gl.calls.iter().find_map(|c| match c {
            GlCall::SetMat4 { value, .. } => Some(*value),
            _ => None,
        });
        let expected: [f32; 16] = matrix.map(|v| v as f32);
        assert_eq!(recorded, Some(expected));
    }

    #[test]
    fn render_without_resources_draws_nothing() {
        let mut layer = CircleLayer::new("circle");
        let mut gl = RecordingGl::new();
        layer.render(&mut gl, &IDENTITY);
        assert!(gl.calls.is_empty());
    }

    #[test]
    fn render_with_missing_uniform_skips_the_draw() {
        let (mut layer, _host, mut gl) = attached();
        layer.prerender(&mut gl);
        gl.hide_name("u_color");

        layer.render(&mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), 0);
        assert!(!gl.calls.iter().any(|c| matches!(c, GlCall::SetMat4 { .. })));
    }

    #[test]
    fn render_with_missing_attrib_skips_the_draw() {
        let mut layer = CircleLayer::new("circle");
        let mut host = RecordingHost::new();
        let mut gl = RecordingGl::new();
        gl.hide_name("a_pos");

        layer.on_add(&mut host, &mut gl).unwrap();
        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), 0);
    }

    #[test]
    fn segment_change_resizes_the_next_draw() {
        let (mut layer, mut host, mut gl) = rendered();

        layer.set_segments(&mut host, 6).unwrap();
        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);

        let last_draw = gl.calls.iter().rev().find_map(|c| match c {
            GlCall::DrawArrays { count, .. } => Some(*count),
            _ => None,
        });
        assert_eq!(last_draw, Some(8));

        let buffer = layer.resources.as_ref().unwrap().buffer;
        assert_eq!(gl.buffer_bytes(buffer).unwrap().len(), 8 * 8);
    }

    // ── context loss ──────────────────────────────────────────────────────

    #[test]
    fn context_loss_then_restore_reallocates_everything() {
        let (mut layer, host, mut gl) = rendered();
        let old_program = linked_programs(&gl)[0];

        layer.context_lost();
        assert!(layer.resources.is_none());
        // Subscriptions are host-side and must survive the loss.
        assert_eq!(host.subscriptions.len(), 2);

        layer.context_restored(&mut gl).unwrap();
        assert!(layer.dirty);

        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), 2);

        let programs = linked_programs(&gl);
        assert_eq!(programs.len(), 2);
        assert_ne!(programs[1], old_program);
    }

    #[test]
    fn lost_context_renders_nothing_until_restored() {
        let (mut layer, _host, mut gl) = rendered();
        layer.context_lost();

        let draws_before = gl.draw_count();
        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), draws_before);
    }

    // ── detach ────────────────────────────────────────────────────────────

    #[test]
    fn on_remove_releases_everything_and_is_idempotent() {
        let (mut layer, mut host, mut gl) = rendered();

        layer.on_remove(&mut host, &mut gl);
        assert!(host.subscriptions.is_empty());
        assert!(layer.resources.is_none());
        assert!(layer.dirty);
        // Buffer, program, and both shaders.
        assert_eq!(gl.delete_count(), 4);

        layer.on_remove(&mut host, &mut gl);
        assert_eq!(gl.delete_count(), 4);
    }

    #[test]
    fn remove_then_add_matches_a_first_attach() {
        let (mut layer, mut host, mut gl) = rendered();

        layer.on_remove(&mut host, &mut gl);
        layer.on_add(&mut host, &mut gl).unwrap();
        assert_eq!(host.subscriptions.len(), 2);

        layer.prerender(&mut gl);
        layer.render(&mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), 2);
        assert_eq!(gl.upload_count(), 2);
    }
}
