use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_channel::oneshot;
use futures_lite::future::Boxed as BoxFuture;
use tracing::trace;

use super::wrapped::{CallContext, Wrapped};
use super::{Error, Lease};
use crate::pool::ResourcePool;

pub(crate) fn abandoned<PE, E: From<Error<PE>>>() -> E {
    E::from(Error::Abandoned)
}

/// A Future driving one call of a [`Wrapped`] task.
///
/// It resolves once the task has been started with an acquired resource, or
/// once an acquisition failure has been delivered. The task may complete its
/// lease later. Dropping the future before the pool responds abandons the
/// acquisition and drops the caller's handler unanswered.
pub struct Invocation<P: ResourcePool, A, R, E: From<Error<P::Error>>> {
    acquire: BoxFuture<Result<P::Resource, P::Error>>,
    context: Option<CallContext<A, R, E>>,
    wrapped: Wrapped<P, A, R, E>,
}

impl<P, A, R, E> Invocation<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    pub(crate) fn new(wrapped: Wrapped<P, A, R, E>, context: CallContext<A, R, E>) -> Self {
        let acquire = wrapped.inner.acquire(wrapped.priority);
        Self {
            acquire,
            context: Some(context),
            wrapped,
        }
    }

    /// Check if the acquisition has been resolved.
    pub fn is_terminated(&self) -> bool {
        self.context.is_none()
    }

    fn start(&self, resource: P::Resource, context: CallContext<A, R, E>) {
        let (args, handler) = context.into_parts();
        trace!("resource acquired, starting task");
        let lease = Lease::new(self.wrapped.inner.clone(), resource, handler);
        (self.wrapped.task)(lease, args)
    }

    fn fail(&self, err: P::Error, context: CallContext<A, R, E>) {
        let (_, handler) = context.into_parts();
        if let Some(handler) = handler {
            (handler)(Err(E::from(Error::Acquire(err))))
        } else {
            self.wrapped.inner.handle_error(err)
        }
    }
}

// the captured arguments are never pinned
impl<P, A, R, E> Unpin for Invocation<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
}

impl<P, A, R, E> Debug for Invocation<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("priority", &self.wrapped.priority)
            .field("terminated", &self.is_terminated())
            .finish()
    }
}

impl<P, A, R, E> Future for Invocation<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.context.is_none() {
            // future already completed
            return Poll::Ready(());
        }

        match self.acquire.as_mut().poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => {
                if let Some(context) = self.context.take() {
                    match result {
                        Ok(resource) => self.start(resource, context),
                        Err(err) => self.fail(err, context),
                    }
                }
                Poll::Ready(())
            }
        }
    }
}

/// A Future resolving to the outcome of a call started with
/// [`Wrapped::run`].
pub struct Run<R, E> {
    abandoned: fn() -> E,
    receiver: oneshot::Receiver<Result<R, E>>,
}

impl<R, E> Run<R, E> {
    pub(crate) fn new(receiver: oneshot::Receiver<Result<R, E>>, abandoned: fn() -> E) -> Self {
        Self {
            abandoned,
            receiver,
        }
    }
}

impl<R, E> Debug for Run<R, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Run").finish()
    }
}

impl<R, E> Future for Run<R, E> {
    type Output = Result<R, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            // the invocation was dropped before delivering an outcome
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err((self.abandoned)())),
        }
    }
}
