//! Decorate tasks so that they run with a resource borrowed from an
//! asynchronous pool.
//!
//! A [`Decorator`] holds a reference to a [`ResourcePool`]. Each call to
//! [`Decorator::decorate`] produces a [`Wrapped`] task which, when called,
//! acquires a resource at the configured priority, invokes the task with a
//! [`Lease`] over that resource, and returns the resource to the pool once the
//! task completes the lease. The task's outcome is then forwarded to the
//! caller's completion handler, if one was supplied.
//!
//! ```no_run
//! use pool_decorator::{Decorator, Error, Lease, Priority, ResourcePool};
//! use futures_lite::future::{self, Boxed as BoxFuture, FutureExt};
//!
//! struct Connections;
//!
//! impl ResourcePool for Connections {
//!     type Resource = u32;
//!     type Error = String;
//!
//!     fn acquire(&self, _priority: Option<Priority>) -> BoxFuture<Result<u32, String>> {
//!         future::ready(Ok(1)).boxed()
//!     }
//!
//!     fn release(&self, _resource: u32) {}
//! }
//!
//! let decorator = Decorator::new(Connections).unwrap();
//! let query = decorator.decorate(|conn: Lease<Connections, u32, Error<String>>, offset: u32| {
//!     let value = *conn + offset;
//!     conn.complete(Ok(value));
//! });
//! query.call(41, |result| assert_eq!(result.unwrap(), 42));
//! ```

mod decorator;
pub use self::decorator::{
    CallContext, ConfigError, Decorator, DecoratorConfig, Error, Handler, Invocation, Lease, Run,
    Wrapped,
};

mod executor;
#[cfg(feature = "global-exec")]
pub use self::executor::GlobalExecutor;
pub use self::executor::{default_executor, Executor};

mod pool;
pub use self::pool::{Priority, ResourcePool};
