//! The hosting side of the layer contract.
//!
//! Responsibilities:
//! - Implement [`MapHost`] for attached layers: repaint scheduling and
//!   context-event subscriptions attributed to the layer being serviced.
//! - Drive the lifecycle calls in the promised order: attach, per-frame
//!   prerender-then-render across all layers, context notifications to
//!   subscribers only, detach.

use std::collections::HashMap;
use std::mem;

use atoll_layer::gl::GlContext;
use atoll_layer::{ContextEvent, CustomLayer, MapHost, Subscription};

/// Host services handed to layer callbacks.
///
/// Subscriptions are attributed to the layer whose callback is running, so
/// context events can later be routed to subscribers only.
#[derive(Debug, Default)]
struct HostServices {
    next_token: u64,
    /// Layer currently being serviced; owner of new subscriptions.
    active_layer: String,
    subscriptions: HashMap<u64, (String, ContextEvent)>,
    repaint_requested: bool,
}

impl HostServices {
    fn is_subscribed(&self, layer_id: &str, event: ContextEvent) -> bool {
        self.subscriptions.values().any(|(id, e)| id == layer_id && *e == event)
    }
}

impl MapHost for HostServices {
    fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    fn subscribe(&mut self, event: ContextEvent) -> Subscription {
        self.next_token += 1;
        self.subscriptions.insert(self.next_token, (self.active_layer.clone(), event));
        Subscription(self.next_token)
    }

    fn unsubscribe(&mut self, token: Subscription) {
        self.subscriptions.remove(&token.0);
    }
}

/// Owns the host services and sequences layer callbacks.
#[derive(Debug, Default)]
pub struct LayerHost {
    services: HostServices,
}

impl LayerHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The [`MapHost`] view, for calls made outside a layer callback (the
    /// viewer's own setter invocations).
    pub fn as_map_host(&mut self) -> &mut dyn MapHost {
        &mut self.services
    }

    /// Attaches a layer. On failure the layer is given its cleanup call and
    /// reported unattached.
    pub fn attach(&mut self, layer: &mut dyn CustomLayer, gl: &mut dyn GlContext) -> bool {
        self.services.active_layer = layer.id().to_string();
        match layer.on_add(&mut self.services, gl) {
            Ok(()) => {
                log::info!("layer {:?} attached", layer.id());
                true
            }
            Err(err) => {
                log::error!("layer {:?} failed to attach: {err}", layer.id());
                layer.on_remove(&mut self.services, gl);
                false
            }
        }
    }

    pub fn detach(&mut self, layer: &mut dyn CustomLayer, gl: &mut dyn GlContext) {
        self.services.active_layer = layer.id().to_string();
        layer.on_remove(&mut self.services, gl);
        log::info!("layer {:?} detached", layer.id());
    }

    /// Runs one frame: every layer prerenders before any layer renders.
    pub fn frame(
        &mut self,
        layers: &mut [&mut dyn CustomLayer],
        gl: &mut dyn GlContext,
        matrix: &[f64; 16],
    ) {
        for layer in layers.iter_mut() {
            layer.prerender(gl);
        }
        for layer in layers.iter_mut() {
            layer.render(gl, matrix);
        }
    }

    /// Delivers `event` to the layers subscribed to it.
    pub fn notify_context(
        &mut self,
        event: ContextEvent,
        layers: &mut [&mut dyn CustomLayer],
        gl: &mut dyn GlContext,
    ) {
        for layer in layers.iter_mut() {
            if !self.services.is_subscribed(layer.id(), event) {
                continue;
            }
            match event {
                ContextEvent::Lost => layer.context_lost(),
                ContextEvent::Restored => {
                    if let Err(err) = layer.context_restored(gl) {
                        log::error!("layer {:?} failed to restore: {err}", layer.id());
                    }
                }
            }
        }
    }

    /// True if any layer asked for a repaint since the last call.
    pub fn take_repaint(&mut self) -> bool {
        mem::take(&mut self.services.repaint_requested)
    }
}

#[cfg(test)]
mod tests {
    use atoll_layer::testing::{GlCall, RecordingGl};
    use atoll_layer::{CircleLayer, ResourceError};

    use super::*;

    const IDENTITY: [f64; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    /// Layer that never subscribes and counts what reaches it anyway.
    #[derive(Default)]
    struct Inert {
        lost_seen: usize,
    }

    impl CustomLayer for Inert {
        fn id(&self) -> &str {
            "inert"
        }

        fn on_add(
            &mut self,
            _host: &mut dyn MapHost,
            _gl: &mut dyn GlContext,
        ) -> Result<(), ResourceError> {
            Ok(())
        }

        fn on_remove(&mut self, _host: &mut dyn MapHost, _gl: &mut dyn GlContext) {}

        fn render(&mut self, _gl: &mut dyn GlContext, _matrix: &[f64; 16]) {}

        fn context_lost(&mut self) {
            self.lost_seen += 1;
        }
    }

    #[test]
    fn attach_records_subscriptions_for_the_layer() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut circle = CircleLayer::new("circle");

        assert!(host.attach(&mut circle, &mut gl));
        assert!(host.services.is_subscribed("circle", ContextEvent::Lost));
        assert!(host.services.is_subscribed("circle", ContextEvent::Restored));
    }

    #[test]
    fn failed_attach_reports_false_and_leaves_no_subscriptions() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        gl.fail_link("varying mismatch");
        let mut circle = CircleLayer::new("circle");

        assert!(!host.attach(&mut circle, &mut gl));
        assert!(host.services.subscriptions.is_empty());
    }

    #[test]
    fn detach_releases_the_subscriptions() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut circle = CircleLayer::new("circle");

        host.attach(&mut circle, &mut gl);
        host.detach(&mut circle, &mut gl);
        assert!(host.services.subscriptions.is_empty());
    }

    #[test]
    fn frame_finishes_every_upload_before_the_first_draw() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut inner = CircleLayer::new("inner");
        let mut outer = CircleLayer::new("outer");
        host.attach(&mut inner, &mut gl);
        host.attach(&mut outer, &mut gl);

        host.frame(&mut [&mut inner, &mut outer], &mut gl, &IDENTITY);

        let last_upload =
            gl.calls.iter().rposition(|c| matches!(c, GlCall::BufferData { .. })).unwrap();
        let first_draw =
            gl.calls.iter().position(|c| matches!(c, GlCall::DrawArrays { .. })).unwrap();
        assert!(last_upload < first_draw);
        assert_eq!(gl.draw_count(), 2);
    }

    #[test]
    fn context_loss_reaches_subscribers_only() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut circle = CircleLayer::new("circle");
        let mut inert = Inert::default();
        host.attach(&mut circle, &mut gl);
        host.attach(&mut inert, &mut gl);

        host.notify_context(ContextEvent::Lost, &mut [&mut circle, &mut inert], &mut gl);

        // The unsubscribed layer was skipped; the circle dropped its
        // resources and renders as a no-op until restored.
        assert_eq!(inert.lost_seen, 0);
        host.frame(&mut [&mut circle], &mut gl, &IDENTITY);
        assert_eq!(gl.draw_count(), 0);
    }

    #[test]
    fn restore_rebuilds_subscribers() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut circle = CircleLayer::new("circle");
        host.attach(&mut circle, &mut gl);
        host.notify_context(ContextEvent::Lost, &mut [&mut circle], &mut gl);

        // Fresh context stands in for the real swap the viewer performs.
        let mut fresh = RecordingGl::new();
        host.notify_context(ContextEvent::Restored, &mut [&mut circle], &mut fresh);

        host.frame(&mut [&mut circle], &mut fresh, &IDENTITY);
        assert_eq!(fresh.draw_count(), 1);
    }

    #[test]
    fn repaint_request_is_consumed_once() {
        let mut host = LayerHost::new();
        let mut gl = RecordingGl::new();
        let mut circle = CircleLayer::new("circle");
        host.attach(&mut circle, &mut gl);

        circle.set_radius_m(host.as_map_host(), 120.0).unwrap();
        assert!(host.take_repaint());
        assert!(!host.take_repaint());
    }
}
