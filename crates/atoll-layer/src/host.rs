/// GPU context lifecycle notification a layer can subscribe to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContextEvent {
    /// The context died. Every handle issued before this moment is invalid
    /// and must not be deleted or otherwise touched.
    Lost,
    /// A fresh context is live; resources may be recreated.
    Restored,
}

/// Opaque subscription token issued by [`MapHost::subscribe`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Subscription(pub u64);

/// Services a hosting map engine offers its layers.
///
/// Calls made while the host is running a layer callback are attributed to
/// that layer; in particular, subscribed [`ContextEvent`]s are delivered back
/// to the subscribing layer only.
pub trait MapHost {
    /// Schedules a repaint. Requests may coalesce, but at least one new
    /// frame (prerender + render) follows.
    fn request_repaint(&mut self);

    /// Subscribes the current layer to `event` until unsubscribed.
    fn subscribe(&mut self, event: ContextEvent) -> Subscription;

    /// Releases a subscription. Unknown tokens are ignored.
    fn unsubscribe(&mut self, token: Subscription);
}
