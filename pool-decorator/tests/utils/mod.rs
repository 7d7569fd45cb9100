use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use concurrent_queue::ConcurrentQueue;
use futures_channel::oneshot;
use futures_lite::future::{self, Boxed as BoxFuture, FutureExt};

use pool_decorator::{Error, Priority, ResourcePool};

pub struct AtomicCounter {
    count: AtomicUsize,
}

#[allow(unused)]
impl AtomicCounter {
    pub fn new(val: usize) -> Self {
        Self {
            count: AtomicUsize::new(val),
        }
    }

    pub fn increment(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn value(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

impl Default for AtomicCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Conn {
    pub id: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolError(pub String);

impl Display for PoolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The error type seen by callers in these tests.
#[derive(Debug, PartialEq, Eq)]
pub enum CallError {
    Abandoned,
    Pool(String),
    Task(String),
}

impl From<Error<PoolError>> for CallError {
    fn from(err: Error<PoolError>) -> Self {
        match err {
            Error::Acquire(err) => Self::Pool(err.to_string()),
            Error::Abandoned => Self::Abandoned,
        }
    }
}

enum Mode {
    Ready,
    Reject(String),
    Gated,
}

/// A pool which hands out numbered connections, recording every request
/// and release.
pub struct TestPool {
    created: AtomicCounter,
    idle: ConcurrentQueue<Conn>,
    mode: Mode,
    pending: ConcurrentQueue<oneshot::Sender<Conn>>,
    priorities: Mutex<Vec<Option<Priority>>>,
    released: AtomicCounter,
}

#[allow(unused)]
impl TestPool {
    fn with_mode(mode: Mode) -> Self {
        Self {
            created: AtomicCounter::default(),
            idle: ConcurrentQueue::unbounded(),
            mode,
            pending: ConcurrentQueue::unbounded(),
            priorities: Mutex::new(vec![]),
            released: AtomicCounter::default(),
        }
    }

    /// Every request resolves immediately.
    pub fn ready() -> Self {
        Self::with_mode(Mode::Ready)
    }

    /// Every request fails with `message`.
    pub fn rejecting(message: &str) -> Self {
        Self::with_mode(Mode::Reject(message.to_owned()))
    }

    /// Requests wait until `grant` is called.
    pub fn gated() -> Self {
        Self::with_mode(Mode::Gated)
    }

    /// Answer the oldest waiting request with a new connection.
    pub fn grant(&self) -> bool {
        match self.pending.pop() {
            Ok(sender) => sender.send(self.create()).is_ok(),
            Err(_) => false,
        }
    }

    /// Take the waiting requests in arrival order.
    pub fn take_pending(&self) -> Vec<oneshot::Sender<Conn>> {
        let mut waiting = vec![];
        while let Ok(sender) = self.pending.pop() {
            waiting.push(sender);
        }
        waiting
    }

    pub fn create(&self) -> Conn {
        Conn {
            id: self.created.increment(),
        }
    }

    pub fn created(&self) -> usize {
        self.created.value()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn priorities(&self) -> Vec<Option<Priority>> {
        self.priorities.lock().unwrap().clone()
    }

    pub fn released(&self) -> usize {
        self.released.value()
    }

    pub fn requests(&self) -> usize {
        self.priorities.lock().unwrap().len()
    }
}

impl ResourcePool for TestPool {
    type Resource = Conn;
    type Error = PoolError;

    fn acquire(&self, priority: Option<Priority>) -> BoxFuture<Result<Conn, PoolError>> {
        self.priorities.lock().unwrap().push(priority);
        match &self.mode {
            Mode::Ready => {
                let conn = self.idle.pop().unwrap_or_else(|_| self.create());
                future::ready(Ok(conn)).boxed()
            }
            Mode::Reject(message) => future::ready(Err(PoolError(message.clone()))).boxed(),
            Mode::Gated => {
                let (sender, receiver) = oneshot::channel();
                self.pending
                    .push(sender)
                    .unwrap_or_else(|_| panic!("Pending queue closed"));
                async move {
                    receiver
                        .await
                        .map_err(|_| PoolError("request canceled".to_owned()))
                }
                .boxed()
            }
        }
    }

    fn release(&self, conn: Conn) {
        self.released.increment();
        self.idle.push(conn).unwrap_or(());
    }
}
