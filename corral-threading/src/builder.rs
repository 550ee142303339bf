use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use crate::elastic::ElasticPool;
use crate::fixed::FixedPool;
use crate::host::HostThreads;
use crate::pool::{DEFAULT_KEEP_ALIVE, DEFAULT_POOL_SIZE};
use crate::source::ThreadSource;

/// Configures and builds worker pools over a host.
///
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
///
/// use corral_threading::{PoolBuilder, StdThreads};
///
/// let pool = PoolBuilder::new(StdThreads)
///     .keep_alive(Duration::from_millis(200))
///     .fixed(NonZeroUsize::new(4).unwrap());
/// ```
pub struct PoolBuilder<H> {
    host: Arc<H>,
    keep_alive: Duration,
}

impl<H: HostThreads + 'static> PoolBuilder<H> {
    /// Starts a builder over the given host.
    pub fn new(host: H) -> Self {
        Self::with_host(Arc::new(host))
    }

    /// Starts a builder over an already shared host.
    pub fn with_host(host: Arc<H>) -> Self {
        Self {
            host,
            keep_alive: DEFAULT_KEEP_ALIVE,
        }
    }

    /// Overrides how long idle workers linger before reclamation.
    pub fn keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Builds a fixed pool of exactly `size` workers.
    pub fn fixed(self, size: NonZeroUsize) -> FixedPool<H> {
        FixedPool::with_keep_alive(ThreadSource::new(self.host), size, self.keep_alive)
    }

    /// Builds an elastic pool capped at [`DEFAULT_POOL_SIZE`] workers.
    pub fn elastic(self) -> ElasticPool<H> {
        self.elastic_with_cap(DEFAULT_POOL_SIZE)
    }

    /// Builds an elastic pool with a custom cap.
    pub fn elastic_with_cap(self, cap: usize) -> ElasticPool<H> {
        ElasticPool::with_config(ThreadSource::new(self.host), cap, self.keep_alive)
    }
}
