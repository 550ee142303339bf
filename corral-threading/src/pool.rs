use std::time::Duration;

/// A unit of work submitted to a pool.
///
/// Pools never inspect a task, they only run it. A task is submitted once and
/// either runs to completion, fails inside its own code, or is rejected
/// before it starts.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Default cap for elastic pools.
///
/// Matches the maximum number of request-scoped threads the host allows, so
/// an elastic pool saturates exactly when the host quota does.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// How long an idle worker waits for more work before it is reclaimed.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_millis(500);

/// Pool handle handed to the framework.
///
/// Every pool accepts a task or rejects it synchronously; accepted tasks are
/// never silently dropped. There is no cancellation handle: once a task is
/// accepted, stopping early is the task's own business.
pub trait Pool: Send + Sync {
    /// Submits a task for execution.
    fn submit(&self, task: Task) -> Result<(), SubmitError>;
}

/// Admission failures raised by pools.
///
/// Rejections are specific about their cause so operators can tell "need more
/// workers" from "need to provision infrastructure" from caller misuse.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A fixed pool needed a new worker, the host refused to provide one, and
    /// no worker was alive to pick the task up later.
    #[error("fixed pool cannot start a worker: no host thread available")]
    RejectedFixed,

    /// An elastic pool declined the task.
    #[error(transparent)]
    RejectedElastic(#[from] ElasticReject),
}

/// Why an elastic pool rejected a task.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ElasticReject {
    /// The pool is at its cap and the host will not let it grow further.
    #[error(
        "elastic pool is at its cap of {cap} workers; \
         use a fixed-size pool or a pre-sized group instead of relying on elastic growth"
    )]
    AtCapacity {
        /// The configured cap.
        cap: usize,
    },

    /// The host refused to provide the thread the pool wanted to grow with.
    #[error("elastic pool cannot grow: no host thread available")]
    NoHostThread,
}

/// Runs a task, isolating the worker from its panics.
///
/// A panicking task must not take the worker's bookkeeping down with it.
pub(crate) fn run_task(task: Task) {
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).is_err() {
        tracing::error!("pool task panicked");
    }
}
