use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use futures_lite::future::FutureExt;

use super::invocation::{abandoned, Invocation, Run};
use super::{DecoratorInner, Error, Lease};
use crate::pool::{Priority, ResourcePool};

/// A caller's completion handler, receiving the task's outcome or an
/// acquisition failure.
pub type Handler<R, E> = Box<dyn FnOnce(Result<R, E>) + Send>;

pub(crate) type TaskFn<P, A, R, E> = dyn Fn(Lease<P, R, E>, A) + Send + Sync;

/// The arguments of a single call to a [`Wrapped`] task, captured at entry,
/// and the caller's completion handler if one was supplied.
pub struct CallContext<A, R, E> {
    args: A,
    handler: Option<Handler<R, E>>,
}

impl<A, R, E> CallContext<A, R, E> {
    pub fn new(args: A, handler: Option<Handler<R, E>>) -> Self {
        Self { args, handler }
    }

    /// A call without a completion handler. Any failure will be dropped.
    pub fn detached(args: A) -> Self {
        Self::new(args, None)
    }

    pub fn with_handler<H>(args: A, handler: H) -> Self
    where
        H: FnOnce(Result<R, E>) + Send + 'static,
    {
        Self::new(args, Some(Box::new(handler)))
    }

    pub fn args(&self) -> &A {
        &self.args
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub(crate) fn into_parts(self) -> (A, Option<Handler<R, E>>) {
        (self.args, self.handler)
    }
}

impl<A: Debug, R, E> Debug for CallContext<A, R, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("args", &self.args)
            .field("has_handler", &self.has_handler())
            .finish()
    }
}

/// A task which acquires its resource from the pool when called.
///
/// Wrapped tasks hold no per-call state and may be cloned and called
/// concurrently; every call is an independent [`Invocation`].
pub struct Wrapped<P: ResourcePool, A, R, E: From<Error<P::Error>>> {
    pub(crate) inner: Arc<DecoratorInner<P>>,
    pub(crate) priority: Option<Priority>,
    pub(crate) task: Arc<TaskFn<P, A, R, E>>,
}

impl<P, A, R, E> Wrapped<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    pub(crate) fn new(
        inner: Arc<DecoratorInner<P>>,
        task: Arc<TaskFn<P, A, R, E>>,
        priority: Option<Priority>,
    ) -> Self {
        Self {
            inner,
            priority,
            task,
        }
    }

    /// The priority passed to the pool on each acquisition.
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Start an invocation and return the future which drives it. The
    /// resource is requested immediately; the future must be polled for the
    /// task to run.
    pub fn invoke(&self, context: CallContext<A, R, E>) -> Invocation<P, A, R, E> {
        Invocation::new(self.clone(), context)
    }
}

impl<P, A, R, E> Wrapped<P, A, R, E>
where
    P: ResourcePool,
    A: Send + 'static,
    R: 'static,
    E: From<Error<P::Error>> + 'static,
{
    /// Call the task with `args`, passing its outcome to `handler` once the
    /// resource has been returned to the pool.
    pub fn call<H>(&self, args: A, handler: H)
    where
        H: FnOnce(Result<R, E>) + Send + 'static,
    {
        self.spawn(CallContext::with_handler(args, handler))
    }

    /// Call the task with `args` and no completion handler. Failures,
    /// including acquisition errors, are dropped.
    pub fn call_detached(&self, args: A) {
        self.spawn(CallContext::detached(args))
    }

    /// Call the task with `args` and return a future resolving to its
    /// outcome.
    pub fn run(&self, args: A) -> Run<R, E>
    where
        R: Send,
        E: Send,
    {
        let (sender, receiver) = futures_channel::oneshot::channel();
        self.call(args, move |result| {
            // the receiver may have been dropped
            sender.send(result).unwrap_or(())
        });
        Run::new(receiver, abandoned::<P::Error, E>)
    }

    fn spawn(&self, context: CallContext<A, R, E>) {
        self.inner.spawn(self.invoke(context).boxed())
    }
}

impl<P, A, R, E> Clone for Wrapped<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            priority: self.priority,
            task: self.task.clone(),
        }
    }
}

impl<P, A, R, E> Debug for Wrapped<P, A, R, E>
where
    P: ResourcePool,
    E: From<Error<P::Error>>,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("priority", &self.priority)
            .finish()
    }
}
