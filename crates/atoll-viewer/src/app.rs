//! winit application driving the map, the layer host, and presentation.
//!
//! Responsibilities:
//! - Own the window plus the per-window state: software GL context, layer
//!   host, circle layer, and camera.
//! - Translate input into camera moves and layer property edits.
//! - Render frames on demand: CPU basemap, layer frame, wgpu present.

use std::sync::Arc;

use anyhow::{Context, Result};
use atoll_geo::{LngLat, WebMercator};
use atoll_layer::{CircleLayer, ContextEvent, Rgba};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::gpu::{Gpu, SurfaceErrorAction};
use crate::host::LayerHost;
use crate::map::MapView;
use crate::raster::Canvas;
use crate::softgl::SoftGl;

const INITIAL_ZOOM: f64 = 16.0;
const RADIUS_STEP: f64 = 1.25;

const BACKGROUND: [u8; 4] = [24, 26, 31, 255];
const GRID: [u8; 4] = [52, 58, 70, 255];

/// Fills cycled by the `c` key; the first entry matches the layer default.
const FILL_PALETTE: [Rgba; 4] = [
    Rgba::new(0.25, 0.25, 0.5, 0.5),
    Rgba::new(0.8, 0.2, 0.2, 0.45),
    Rgba::new(0.15, 0.6, 0.3, 0.45),
    Rgba::new(0.9, 0.7, 0.1, 0.4),
];

pub fn run() -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut viewer = Viewer::new();

    event_loop
        .run_app(&mut viewer)
        .context("winit event loop terminated with error")?;

    match viewer.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Viewer {
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    gl: SoftGl,

    host: LayerHost,
    circle: CircleLayer,
    attached: bool,

    view: MapView,
    pointer: Option<PhysicalPosition<f64>>,
    dragging: bool,
    fill_index: usize,

    failure: Option<anyhow::Error>,
}

impl Viewer {
    fn new() -> Self {
        let circle = CircleLayer::new("circle");
        let view = MapView::new(circle.center(), INITIAL_ZOOM);
        Self {
            window: None,
            gpu: None,
            gl: SoftGl::new(1, 1),
            host: LayerHost::new(),
            circle,
            attached: false,
            view,
            pointer: None,
            dragging: false,
            fill_index: 0,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        event_loop.exit();
    }

    fn redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Tears the software context down and brings a fresh one up, the way a
    /// browser tab would on a GPU reset. Old handles die with the old
    /// context; subscribed layers recreate their resources on the new one.
    fn drop_context(&mut self) {
        self.host
            .notify_context(ContextEvent::Lost, &mut [&mut self.circle], &mut self.gl);
        self.gl = SoftGl::new(self.gl.width(), self.gl.height());
        self.host
            .notify_context(ContextEvent::Restored, &mut [&mut self.circle], &mut self.gl);
        log::info!("context dropped and restored");
    }

    fn on_key(&mut self, event_loop: &ActiveEventLoop, key: PhysicalKey) {
        let PhysicalKey::Code(code) = key else { return };

        let result = match code {
            KeyCode::Escape => {
                event_loop.exit();
                return;
            }
            KeyCode::Equal | KeyCode::NumpadAdd => {
                let radius = self.circle.radius_m() * RADIUS_STEP;
                self.circle.set_radius_m(self.host.as_map_host(), radius)
            }
            KeyCode::Minus | KeyCode::NumpadSubtract => {
                let radius = self.circle.radius_m() / RADIUS_STEP;
                self.circle.set_radius_m(self.host.as_map_host(), radius)
            }
            KeyCode::BracketRight => {
                let segments = self.circle.segments().saturating_add(1);
                self.circle.set_segments(self.host.as_map_host(), segments)
            }
            KeyCode::BracketLeft => {
                let segments = self.circle.segments().saturating_sub(1).max(3);
                self.circle.set_segments(self.host.as_map_host(), segments)
            }
            KeyCode::KeyC => {
                self.fill_index = (self.fill_index + 1) % FILL_PALETTE.len();
                self.circle
                    .set_fill(self.host.as_map_host(), FILL_PALETTE[self.fill_index]);
                Ok(())
            }
            KeyCode::KeyX => {
                self.drop_context();
                self.redraw();
                return;
            }
            _ => return,
        };

        if let Err(err) = result {
            log::warn!("rejected property change: {err}");
        }
        if self.host.take_repaint() {
            self.redraw();
        }
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else { return };
        let (width, height) = (self.gl.width(), self.gl.height());

        let mut canvas = Canvas::new(self.gl.pixels_mut(), width, height);
        canvas.fill(BACKGROUND);
        draw_graticule(&mut canvas, self.view, width, height);

        if self.attached {
            let matrix = self.view.clip_matrix(f64::from(width), f64::from(height));
            self.host.frame(&mut [&mut self.circle], &mut self.gl, &matrix);
        }

        if let Err(err) = gpu.present(self.gl.pixels(), width, height) {
            match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Reconfigured => self.redraw(),
                SurfaceErrorAction::SkipFrame => {}
                SurfaceErrorAction::Fatal => {
                    self.fail(event_loop, anyhow::anyhow!("wgpu surface out of memory"));
                    return;
                }
            }
        }

        // Layer callbacks may have asked for another frame.
        if self.host.take_repaint() {
            self.redraw();
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("atoll viewer")
            .with_inner_size(LogicalSize::new(1024.0, 768.0));
        let window = match event_loop
            .create_window(attrs)
            .map(Arc::new)
            .context("failed to create window")
        {
            Ok(window) => window,
            Err(err) => return self.fail(event_loop, err),
        };

        let gpu = match pollster::block_on(Gpu::new(window.clone())) {
            Ok(gpu) => gpu,
            Err(err) => return self.fail(event_loop, err),
        };

        let size = window.inner_size();
        self.gl.resize(size.width.max(1), size.height.max(1));
        if !self.attached {
            self.attached = self.host.attach(&mut self.circle, &mut self.gl);
        }

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.redraw();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size);
                }
                self.gl.resize(new_size.width.max(1), new_size.height.max(1));
                self.redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let new_size = window.inner_size();
                    if let Some(gpu) = self.gpu.as_mut() {
                        gpu.resize(new_size);
                    }
                    self.gl.resize(new_size.width.max(1), new_size.height.max(1));
                    self.redraw();
                }
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.on_key(event_loop, event.physical_key);
            }

            WindowEvent::MouseInput { state, button: MouseButton::Left, .. } => {
                self.dragging = state == ElementState::Pressed;
            }

            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some(prev) = self.pointer {
                        self.view.pan(position.x - prev.x, position.y - prev.y);
                        self.redraw();
                    }
                }
                self.pointer = Some(position);
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                self.dragging = false;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => f64::from(y),
                    MouseScrollDelta::PixelDelta(p) => p.y / 40.0,
                };
                self.view.zoom_by(steps);
                self.redraw();
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}

/// Whole-degree-ish graticule under the layers, spaced for roughly five
/// lines across the viewport.
fn draw_graticule(canvas: &mut Canvas<'_>, view: MapView, width: u32, height: u32) {
    let (w, h) = (f64::from(width), f64::from(height));
    let world = view.world_px();
    let center = WebMercator::forward(view.center);

    let span_lng = w / world * 360.0;
    let step = grid_step(span_lng);

    let west = view.center.lng - span_lng / 2.0;
    let east = view.center.lng + span_lng / 2.0;
    let mut lng = (west / step).ceil() * step;
    while lng <= east {
        let p = WebMercator::forward(LngLat::new(lng, view.center.lat));
        let (x, _) = view.to_screen(p, w, h);
        canvas.line(x as i64, 0, x as i64, i64::from(height) - 1, GRID);
        lng += step;
    }

    // Latitude bounds come from the projected viewport edges; mercator y is
    // not linear in degrees.
    let north = WebMercator::inverse(atoll_geo::ProjectedPoint::new(
        center.x,
        center.y - (h / 2.0) / world,
    ))
    .lat;
    let south = WebMercator::inverse(atoll_geo::ProjectedPoint::new(
        center.x,
        center.y + (h / 2.0) / world,
    ))
    .lat;
    let mut lat = (south / step).ceil() * step;
    while lat <= north {
        let p = WebMercator::forward(LngLat::new(view.center.lng, lat));
        let (_, y) = view.to_screen(p, w, h);
        canvas.line(0, y as i64, i64::from(width) - 1, y as i64, GRID);
        lat += step;
    }
}

/// Rounds `span / 5` up to a 1/2/5 decade step.
fn grid_step(span_deg: f64) -> f64 {
    let raw = (span_deg / 5.0).max(f64::MIN_POSITIVE);
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    if norm <= 2.0 {
        2.0 * mag
    } else if norm <= 5.0 {
        5.0 * mag
    } else {
        10.0 * mag
    }
}
