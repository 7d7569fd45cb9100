use std::sync::Arc;

use futures_lite::future::Boxed as BoxFuture;

/// Queueing hint passed to the pool when no resource is immediately
/// available. Lower numbers mean higher priority; the range is defined by the
/// pool.
pub type Priority = u32;

/// The contract a resource pool must offer to be used by a
/// [`Decorator`](crate::Decorator).
///
/// Sizing, queueing, health checks and acquire timeouts are the pool's
/// concern. A timed out or otherwise failed request is reported through the
/// `Err` side of the future returned by `acquire`.
pub trait ResourcePool: Send + Sync + 'static {
    /// The pooled resource handle
    type Resource: Send + 'static;
    /// The error produced when a resource cannot be supplied
    type Error: Send + 'static;

    /// Request a resource, waiting as long as the pool decides.
    fn acquire(&self, priority: Option<Priority>) -> BoxFuture<Result<Self::Resource, Self::Error>>;

    /// Return a previously acquired resource. Must not fail.
    fn release(&self, resource: Self::Resource);
}

impl<P: ResourcePool> ResourcePool for Arc<P> {
    type Resource = P::Resource;
    type Error = P::Error;

    fn acquire(&self, priority: Option<Priority>) -> BoxFuture<Result<Self::Resource, Self::Error>> {
        (**self).acquire(priority)
    }

    fn release(&self, resource: Self::Resource) {
        (**self).release(resource)
    }
}
