use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use corral_dispatch::{DispatchTimer, DurableQueue, ScheduleError, TimerTask};
use corral_threading::{HostThreads, Pool, Provisioner};

/// Process-wide factory for pools, consumed by the framework.
pub trait PoolFactory: Send + Sync {
    /// Creates a fresh pool for the requested degree of parallelism.
    ///
    /// `daemon` is accepted for interface compatibility and ignored: worker
    /// lifetime is the host's business, not the pool's.
    fn create_pool(&self, daemon: bool, size: Option<NonZeroUsize>) -> Arc<dyn Pool>;
}

/// A timer the framework can schedule delayed work on.
pub trait Timer: Send + Sync {
    /// Schedules `task` to run after `delay`.
    fn schedule(&self, task: &dyn TimerTask, delay: Duration) -> Result<(), ScheduleError>;
}

/// Process-wide factory for timers, consumed by the framework.
pub trait TimerFactory: Send + Sync {
    /// Returns a timer.
    ///
    /// `name` and `daemon` are accepted for interface compatibility and
    /// ignored: there is one queue-backed timer per process.
    fn create_timer(&self, name: &str, daemon: bool) -> Arc<dyn Timer>;
}

impl<H: HostThreads + 'static> PoolFactory for Provisioner<H> {
    fn create_pool(&self, _daemon: bool, size: Option<NonZeroUsize>) -> Arc<dyn Pool> {
        self.provide(size)
    }
}

impl<Q: DurableQueue + 'static> Timer for DispatchTimer<Q> {
    fn schedule(&self, task: &dyn TimerTask, delay: Duration) -> Result<(), ScheduleError> {
        DispatchTimer::schedule(self, task, delay)
    }
}

/// Timer factory that hands out the one queue-backed timer regardless of the
/// requested name or daemon flag.
pub struct QueueTimerFactory<Q> {
    timer: Arc<DispatchTimer<Q>>,
}

impl<Q: DurableQueue + 'static> QueueTimerFactory<Q> {
    /// Wraps the shared timer.
    pub fn new(timer: Arc<DispatchTimer<Q>>) -> Self {
        Self { timer }
    }
}

impl<Q: DurableQueue + 'static> TimerFactory for QueueTimerFactory<Q> {
    fn create_timer(&self, _name: &str, _daemon: bool) -> Arc<dyn Timer> {
        self.timer.clone()
    }
}
