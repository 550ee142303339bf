use std::sync::{Arc, OnceLock};

use corral_dispatch::{DispatchTimer, DurableQueue};
use corral_threading::{HostThreads, Provisioner};

use crate::factory::{PoolFactory, QueueTimerFactory, TimerFactory};

/// Process-wide factory slots with set-once semantics.
///
/// Each slot is an atomic set-if-absent: the first registration wins and
/// everything later is a no-op, so explicit user configuration always beats
/// the adapter defaults regardless of call order. Register at application
/// start, before any pool-dependent feature runs; registering later has no
/// effect on pools and timers already handed out.
#[derive(Default)]
pub struct Registry {
    pool: OnceLock<Arc<dyn PoolFactory>>,
    timer: OnceLock<Arc<dyn TimerFactory>>,
}

impl Registry {
    /// Creates a registry with empty slots.
    pub const fn new() -> Self {
        Self {
            pool: OnceLock::new(),
            timer: OnceLock::new(),
        }
    }

    /// Registers `factory` as the pool factory if none is set.
    ///
    /// Returns whether this call installed it.
    pub fn set_pool_factory(&self, factory: Arc<dyn PoolFactory>) -> bool {
        self.pool.set(factory).is_ok()
    }

    /// Registers `factory` as the timer factory if none is set.
    ///
    /// Returns whether this call installed it.
    pub fn set_timer_factory(&self, factory: Arc<dyn TimerFactory>) -> bool {
        self.timer.set(factory).is_ok()
    }

    /// The registered pool factory, if any.
    pub fn pool_factory(&self) -> Option<Arc<dyn PoolFactory>> {
        self.pool.get().map(Arc::clone)
    }

    /// The registered timer factory, if any.
    pub fn timer_factory(&self) -> Option<Arc<dyn TimerFactory>> {
        self.timer.get().map(Arc::clone)
    }

    /// Registers the sandbox pool and timer adapters into this registry.
    ///
    /// Idempotent: slots that are already taken keep their registration.
    pub fn install<H, Q>(&self, host: Arc<H>, queue: Q)
    where
        H: HostThreads + 'static,
        Q: DurableQueue + 'static,
    {
        if !self.set_pool_factory(Arc::new(Provisioner::new(host))) {
            tracing::debug!("pool factory already registered, keeping the existing one");
        }

        let timer = Arc::new(DispatchTimer::new(queue));
        if !self.set_timer_factory(Arc::new(QueueTimerFactory::new(timer))) {
            tracing::debug!("timer factory already registered, keeping the existing one");
        }
    }
}

static GLOBAL: Registry = Registry::new();

/// The process-wide registry.
pub fn global() -> &'static Registry {
    &GLOBAL
}

/// Registers the sandbox adapters as the process-wide pool and timer
/// factories.
///
/// Call once at application start, before the framework builds pools or
/// timers; an earlier explicit registration always wins and a repeated call
/// is a no-op.
pub fn install<H, Q>(host: Arc<H>, queue: Q)
where
    H: HostThreads + 'static,
    Q: DurableQueue + 'static,
{
    GLOBAL.install(host, queue);
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    use corral_dispatch::{MemoryQueue, Relocatable};
    use corral_threading::{Pool, StdThreads};
    use serde::{Deserialize, Serialize};

    use crate::factory::Timer;

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Noop;

    impl Relocatable for Noop {
        const KIND: &'static str = "noop";

        fn run(self) {}
    }

    fn installed() -> (Registry, Arc<MemoryQueue>) {
        let registry = Registry::new();
        let queue = Arc::new(MemoryQueue::new());
        registry.install(Arc::new(StdThreads), Arc::clone(&queue));
        (registry, queue)
    }

    #[test]
    fn test_install_fills_both_slots() {
        let (registry, _queue) = installed();

        assert!(registry.pool_factory().is_some());
        assert!(registry.timer_factory().is_some());
    }

    #[test]
    fn test_install_is_idempotent() {
        let (registry, _queue) = installed();
        let pool = registry.pool_factory().unwrap();
        let timer = registry.timer_factory().unwrap();

        registry.install(Arc::new(StdThreads), MemoryQueue::new());

        assert!(Arc::ptr_eq(&pool, &registry.pool_factory().unwrap()));
        assert!(Arc::ptr_eq(&timer, &registry.timer_factory().unwrap()));
    }

    #[test]
    fn test_prior_registration_wins() {
        struct UserFactory;

        impl PoolFactory for UserFactory {
            fn create_pool(&self, _daemon: bool, _size: Option<NonZeroUsize>) -> Arc<dyn Pool> {
                Provisioner::new(Arc::new(StdThreads)).provide(None)
            }
        }

        let registry = Registry::new();
        let user: Arc<dyn PoolFactory> = Arc::new(UserFactory);
        assert!(registry.set_pool_factory(Arc::clone(&user)));

        registry.install(Arc::new(StdThreads), MemoryQueue::new());

        assert!(Arc::ptr_eq(&user, &registry.pool_factory().unwrap()));
        // A second explicit registration is refused as well.
        assert!(!registry.set_pool_factory(Arc::new(UserFactory)));
    }

    #[test]
    fn test_registered_factories_are_usable_end_to_end() {
        let (registry, queue) = installed();

        // Pools from the registered factory run work.
        let pool = registry
            .pool_factory()
            .unwrap()
            .create_pool(true, NonZeroUsize::new(2));
        let counter = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = mpsc::channel();
        for _ in 0..3 {
            let counter = Arc::clone(&counter);
            let done_tx = done_tx.clone();
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                done_tx.send(()).unwrap();
            }))
            .unwrap();
        }
        for _ in 0..3 {
            done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);

        // Timers from the registered factory land envelopes on the queue,
        // whatever name or daemon flag was asked for.
        let timer = registry
            .timer_factory()
            .unwrap()
            .create_timer("ignored", true);
        timer.schedule(&Noop, Duration::from_secs(1)).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_global_install_is_idempotent() {
        install(Arc::new(StdThreads), MemoryQueue::new());
        let pool = global().pool_factory().unwrap();

        install(Arc::new(StdThreads), MemoryQueue::new());

        assert!(Arc::ptr_eq(&pool, &global().pool_factory().unwrap()));
    }
}
