use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder::PoolBuilder;
use crate::elastic::ElasticPool;
use crate::fixed::FixedPool;
use crate::host::HostThreads;
use crate::pool::{DEFAULT_KEEP_ALIVE, DEFAULT_POOL_SIZE, Pool};

/// Sizing request for a pool, immutable once a pool is built from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolSpec {
    /// A fixed pool of exactly `size` workers.
    Fixed {
        /// The requested worker count.
        size: NonZeroUsize,
    },
    /// An elastic pool growing up to the configured cap.
    Elastic,
}

/// Pool tuning knobs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Idle worker keep-alive in milliseconds.
    pub keep_alive_ms: u64,
    /// Cap for elastic pools.
    pub elastic_cap: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            keep_alive_ms: DEFAULT_KEEP_ALIVE.as_millis() as u64,
            elastic_cap: DEFAULT_POOL_SIZE,
        }
    }
}

/// Decides which pool a parallelism request gets.
///
/// A requested size yields a fixed pool of that size; no size yields an
/// elastic pool at the configured cap. Every call builds a fresh pool: the
/// provisioner caches nothing, and sharing or disposing of a pool is the
/// caller's business.
#[derive(Debug)]
pub struct Provisioner<H> {
    host: Arc<H>,
    config: PoolConfig,
}

impl<H: HostThreads + 'static> Provisioner<H> {
    /// Creates a provisioner with default tuning.
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, PoolConfig::default())
    }

    /// Creates a provisioner with custom tuning.
    pub fn with_config(host: Arc<H>, config: PoolConfig) -> Self {
        Self { host, config }
    }

    /// Returns a fresh pool for the requested degree of parallelism.
    pub fn provide(&self, size: Option<NonZeroUsize>) -> Arc<dyn Pool> {
        match size {
            Some(size) => Arc::new(self.fixed(size)),
            None => Arc::new(self.elastic()),
        }
    }

    /// Same decision, driven by a [`PoolSpec`].
    pub fn provide_spec(&self, spec: PoolSpec) -> Arc<dyn Pool> {
        match spec {
            PoolSpec::Fixed { size } => self.provide(Some(size)),
            PoolSpec::Elastic => self.provide(None),
        }
    }

    /// Builds a concrete fixed pool of exactly `size` workers.
    pub fn fixed(&self, size: NonZeroUsize) -> FixedPool<H> {
        self.builder().fixed(size)
    }

    /// Builds a concrete elastic pool at the configured cap.
    pub fn elastic(&self) -> ElasticPool<H> {
        let cap = self.config.elastic_cap;
        self.builder().elastic_with_cap(cap)
    }

    fn builder(&self) -> PoolBuilder<H> {
        PoolBuilder::with_host(Arc::clone(&self.host))
            .keep_alive(Duration::from_millis(self.config.keep_alive_ms))
    }
}
