use std::sync::Arc;

use super::{ConfigError, Decorator, DecoratorInner, ErrorFn};
use crate::executor::{default_executor, Executor};
use crate::pool::ResourcePool;

/// Builder for a [`Decorator`].
pub struct DecoratorConfig<P: ResourcePool> {
    executor: Option<Box<dyn Executor>>,
    handle_error: Option<ErrorFn<P::Error>>,
    pool: P,
}

impl<P: ResourcePool> DecoratorConfig<P> {
    pub fn new(pool: P) -> Self {
        Self {
            executor: None,
            handle_error: None,
            pool,
        }
    }

    /// Set the executor used to drive invocations started with
    /// [`Wrapped::call`](crate::Wrapped::call).
    pub fn executor<X>(mut self, executor: X) -> Self
    where
        X: Executor + 'static,
    {
        self.executor.replace(Box::new(executor));
        self
    }

    /// Observe acquisition errors which would otherwise be dropped because
    /// the caller supplied no completion handler.
    pub fn handle_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(P::Error) + Send + Sync + 'static,
    {
        self.handle_error.replace(Box::new(handler));
        self
    }

    pub fn build(self) -> Result<Decorator<P>, ConfigError> {
        let executor = match self.executor {
            Some(exec) => exec,
            None => default_executor()?,
        };
        Ok(Decorator {
            inner: Arc::new(DecoratorInner {
                executor,
                handle_error: self.handle_error,
                pool: self.pool,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use futures_lite::future::{self, Boxed as BoxFuture, FutureExt};

    use super::*;
    use crate::pool::Priority;

    struct Refusing;

    type RefusingLease = crate::Lease<Refusing, (), crate::Error<&'static str>>;

    impl ResourcePool for Refusing {
        type Resource = ();
        type Error = &'static str;

        fn acquire(&self, _priority: Option<Priority>) -> BoxFuture<Result<(), &'static str>> {
            future::ready(Err("pool closed")).boxed()
        }

        fn release(&self, _resource: ()) {}
    }

    #[test]
    fn custom_executor_receives_invocations() {
        let spawned = Arc::new(AtomicUsize::new(0));
        let counter = spawned.clone();
        let decorator = DecoratorConfig::new(Refusing)
            .executor(move |task: BoxFuture<()>| {
                counter.fetch_add(1, Ordering::SeqCst);
                future::block_on(task);
            })
            .build()
            .unwrap();
        let wrapped = decorator.decorate(|lease: RefusingLease, _: ()| lease.complete(Ok(())));
        wrapped.call_detached(());
        wrapped.call_detached(());
        assert_eq!(spawned.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropped_acquire_errors_reach_hook() {
        let seen = Arc::new(AtomicUsize::new(0));
        let hook = seen.clone();
        let decorator = DecoratorConfig::new(Refusing)
            .executor(|task: BoxFuture<()>| future::block_on(task))
            .handle_error(move |err| {
                assert_eq!(err, "pool closed");
                hook.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();
        let wrapped = decorator.decorate(|lease: RefusingLease, _: ()| lease.complete(Ok(())));

        // a handler sees the error, so the hook is not involved
        wrapped.call((), |result| assert!(result.is_err()));
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        wrapped.call_detached(());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }
}
