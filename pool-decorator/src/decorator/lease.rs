use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::{debug, warn};

use super::{DecoratorInner, Error, Handler};
use crate::pool::ResourcePool;

/// An acquired resource together with the completion handler for one
/// invocation of a [`Wrapped`](crate::Wrapped) task.
///
/// The lease dereferences to the pooled resource. Calling
/// [`complete`](Lease::complete) returns the resource to the pool and then
/// forwards the result to the caller's handler, if any. A lease which is
/// dropped without being completed still returns its resource, and the caller
/// receives [`Error::Abandoned`].
pub struct Lease<P: ResourcePool, R, E: From<Error<P::Error>>> {
    handler: Option<Handler<R, E>>,
    inner: Arc<DecoratorInner<P>>,
    resource: Option<P::Resource>,
}

impl<P: ResourcePool, R, E: From<Error<P::Error>>> Lease<P, R, E> {
    pub(crate) fn new(
        inner: Arc<DecoratorInner<P>>,
        resource: P::Resource,
        handler: Option<Handler<R, E>>,
    ) -> Self {
        Self {
            handler,
            inner,
            resource: Some(resource),
        }
    }

    /// Release the resource, then pass `result` to the caller.
    pub fn complete(mut self, result: Result<R, E>) {
        self.finish(result)
    }

    /// Check whether the caller supplied a completion handler.
    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    fn finish(&mut self, result: Result<R, E>) {
        if let Some(resource) = self.resource.take() {
            self.inner.release(resource);
        }
        if let Some(handler) = self.handler.take() {
            (handler)(result)
        } else {
            debug!(
                failed = result.is_err(),
                "task completed with no completion handler, dropping result"
            );
        }
    }
}

impl<P, R, E> Debug for Lease<P, R, E>
where
    P: ResourcePool,
    P::Resource: Debug,
    E: From<Error<P::Error>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("resource", &self.resource)
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

impl<P: ResourcePool, R, E: From<Error<P::Error>>> Deref for Lease<P, R, E> {
    type Target = P::Resource;
    fn deref(&self) -> &Self::Target {
        // note: only taken when the lease is consumed
        self.resource.as_ref().unwrap()
    }
}

impl<P: ResourcePool, R, E: From<Error<P::Error>>> DerefMut for Lease<P, R, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // note: only taken when the lease is consumed
        self.resource.as_mut().unwrap()
    }
}

impl<P: ResourcePool, R, E: From<Error<P::Error>>> Drop for Lease<P, R, E> {
    fn drop(&mut self) {
        if self.resource.is_some() {
            warn!("lease dropped without completion, releasing resource");
            self.finish(Err(E::from(Error::Abandoned)));
        }
    }
}
