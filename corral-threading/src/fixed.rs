use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::host::HostThreads;
use crate::pool::{DEFAULT_KEEP_ALIVE, Pool, SubmitError, Task, run_task};
use crate::source::{Acquisition, ThreadSource};

/// Fixed-size worker pool with an unbounded FIFO backlog.
///
/// The pool runs at most `size` workers; work beyond that queues instead of
/// spilling, trading latency for never losing work while all workers are
/// transiently busy. Workers are started lazily through the [`ThreadSource`]
/// and reclaimed after sitting idle for the keep-alive window.
///
/// Tasks are handed to workers in submission order; completion order across
/// workers is undefined. Dropping the pool closes intake, after which workers
/// drain the backlog and exit.
pub struct FixedPool<H> {
    tx: flume::Sender<Task>,
    inner: Arc<Inner<H>>,
}

struct Inner<H> {
    source: ThreadSource<H>,
    rx: flume::Receiver<Task>,
    state: Mutex<State>,
    size: usize,
    keep_alive: Duration,
}

#[derive(Default)]
struct State {
    total: usize,
    idle: usize,
}

impl<H: HostThreads + 'static> FixedPool<H> {
    /// Creates a pool of exactly `size` workers over the given source.
    pub fn new(source: ThreadSource<H>, size: NonZeroUsize) -> Self {
        Self::with_keep_alive(source, size, DEFAULT_KEEP_ALIVE)
    }

    /// Creates a pool with a custom idle keep-alive window.
    pub fn with_keep_alive(
        source: ThreadSource<H>,
        size: NonZeroUsize,
        keep_alive: Duration,
    ) -> Self {
        let (tx, rx) = flume::unbounded();

        Self {
            tx,
            inner: Arc::new(Inner {
                source,
                rx,
                state: Mutex::new(State::default()),
                size: size.get(),
                keep_alive,
            }),
        }
    }

    /// Submits a task, starting a worker if one is needed and the cap allows.
    ///
    /// When all workers are busy the task queues on the unbounded backlog.
    /// The submission is rejected only if the pool needs a worker, the host
    /// refuses to provide one, and no worker is alive to drain the backlog
    /// later, since the task would then never run.
    pub fn submit(&self, task: Task) -> Result<(), SubmitError> {
        let mut state = self.inner.state.lock();

        if state.idle == 0 && state.total < self.inner.size {
            let inner = Arc::clone(&self.inner);
            match self.inner.source.acquire(Box::new(move || Inner::run_worker(inner))) {
                Acquisition::Acquired => state.total += 1,
                Acquisition::Unavailable if state.total == 0 => {
                    return Err(SubmitError::RejectedFixed);
                }
                // Live workers will still drain the backlog.
                Acquisition::Unavailable => {}
            }
        }

        assert!(
            self.tx.send(task).is_ok(),
            "pool holds the backlog receiver while alive"
        );
        Ok(())
    }
}

impl<H: HostThreads + 'static> Pool for FixedPool<H> {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        FixedPool::submit(self, task)
    }
}

impl<H: HostThreads + 'static> Inner<H> {
    fn run_worker(inner: Arc<Self>) {
        loop {
            inner.state.lock().idle += 1;

            let task = loop {
                match inner.rx.recv_timeout(inner.keep_alive) {
                    Ok(task) => break task,
                    Err(flume::RecvTimeoutError::Timeout) => {
                        let mut state = inner.state.lock();
                        // A task may have been enqueued while timing out;
                        // reclaim only once the backlog is drained.
                        if inner.rx.is_empty() {
                            state.idle -= 1;
                            state.total -= 1;
                            return;
                        }
                    }
                    Err(flume::RecvTimeoutError::Disconnected) => {
                        let mut state = inner.state.lock();
                        state.idle -= 1;
                        state.total -= 1;
                        return;
                    }
                }
            };

            inner.state.lock().idle -= 1;
            run_task(task);
        }
    }
}
