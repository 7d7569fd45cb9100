use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use futures_lite::future::Boxed as BoxFuture;
use tracing::{debug, trace};

use crate::executor::Executor;
use crate::pool::{Priority, ResourcePool};

mod config;
pub use config::DecoratorConfig;

mod error;
pub use error::{ConfigError, Error};

mod invocation;
pub use invocation::{Invocation, Run};

mod lease;
pub use lease::Lease;

mod wrapped;
pub use wrapped::{CallContext, Handler, Wrapped};

pub type ErrorFn<E> = Box<dyn Fn(E) + Send + Sync>;

pub(crate) struct DecoratorInner<P: ResourcePool> {
    executor: Box<dyn Executor>,
    handle_error: Option<ErrorFn<P::Error>>,
    pool: P,
}

impl<P: ResourcePool> DecoratorInner<P> {
    pub fn acquire(&self, priority: Option<Priority>) -> BoxFuture<Result<P::Resource, P::Error>> {
        trace!(?priority, "requesting resource");
        self.pool.acquire(priority)
    }

    pub fn release(&self, resource: P::Resource) {
        trace!("returning resource to pool");
        self.pool.release(resource)
    }

    pub fn handle_error(&self, err: P::Error) {
        debug!("resource acquisition failed with no completion handler, dropping error");
        if let Some(handler) = self.handle_error.as_ref() {
            (handler)(err)
        }
    }

    pub fn spawn(&self, task: BoxFuture<()>) {
        self.executor.spawn_obj(task)
    }
}

/// Produces [`Wrapped`] tasks which borrow their resource from a shared pool.
pub struct Decorator<P: ResourcePool> {
    pub(crate) inner: Arc<DecoratorInner<P>>,
}

impl<P: ResourcePool> Decorator<P> {
    /// Create a decorator for `pool` using the default executor.
    pub fn new(pool: P) -> Result<Self, ConfigError> {
        DecoratorConfig::new(pool).build()
    }

    /// Start configuring a decorator for `pool`.
    pub fn config(pool: P) -> DecoratorConfig<P> {
        DecoratorConfig::new(pool)
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &P {
        &self.inner.pool
    }

    /// Wrap `task` so that each call acquires a resource from the pool
    /// with no priority preference.
    ///
    /// Nothing is acquired until the returned task is called.
    pub fn decorate<A, R, E, F>(&self, task: F) -> Wrapped<P, A, R, E>
    where
        F: Fn(Lease<P, R, E>, A) + Send + Sync + 'static,
        E: From<Error<P::Error>>,
    {
        Wrapped::new(self.inner.clone(), Arc::new(task), None)
    }

    /// Wrap `task`, passing `priority` to the pool on every acquisition.
    /// The value is not validated here.
    pub fn decorate_with_priority<A, R, E, F>(
        &self,
        task: F,
        priority: Priority,
    ) -> Wrapped<P, A, R, E>
    where
        F: Fn(Lease<P, R, E>, A) + Send + Sync + 'static,
        E: From<Error<P::Error>>,
    {
        Wrapped::new(self.inner.clone(), Arc::new(task), Some(priority))
    }
}

impl<P: ResourcePool> Clone for Decorator<P> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<P: ResourcePool> Debug for Decorator<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("handle_error", &self.inner.handle_error.is_some())
            .finish()
    }
}
