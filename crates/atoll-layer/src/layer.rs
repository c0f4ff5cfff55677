use crate::error::ResourceError;
use crate::gl::GlContext;
use crate::host::MapHost;

/// Layer contract a hosting map engine drives.
///
/// Ordering the host guarantees: `on_add` precedes the first
/// `prerender`/`render`; within a frame, `prerender` runs for every layer
/// before any layer renders; `on_remove` is the final call. All callbacks run
/// synchronously on the host's render thread.
pub trait CustomLayer {
    /// Stable identifier, unique among the host's layers.
    fn id(&self) -> &str;

    /// Layer kind tag the host dispatches on.
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Called once when the layer is attached; GPU resources are created
    /// here. An error aborts the attach as a whole and the host drops the
    /// layer without further callbacks (an `on_remove` for cleanup excepted).
    fn on_add(
        &mut self,
        host: &mut dyn MapHost,
        gl: &mut dyn GlContext,
    ) -> Result<(), ResourceError>;

    /// Called once when the layer is detached. Must be idempotent and safe
    /// even after a failed `on_add`.
    fn on_remove(&mut self, host: &mut dyn MapHost, gl: &mut dyn GlContext);

    /// Called every frame before any layer renders; deferred work (geometry
    /// rebuilds, uploads) belongs here.
    fn prerender(&mut self, gl: &mut dyn GlContext) {
        let _ = gl;
    }

    /// Called every frame to draw. `matrix` maps projected coordinates to
    /// clip space, column-major.
    fn render(&mut self, gl: &mut dyn GlContext, matrix: &[f64; 16]);

    /// Delivered when the GPU context is lost, if subscribed. Handles are
    /// already invalid; no delete calls may be issued.
    fn context_lost(&mut self) {}

    /// Delivered when a fresh GPU context is live, if subscribed.
    fn context_restored(&mut self, gl: &mut dyn GlContext) -> Result<(), ResourceError> {
        let _ = gl;
        Ok(())
    }
}
