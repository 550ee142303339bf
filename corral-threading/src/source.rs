use std::sync::Arc;

use crate::host::{ExecutionContext, HostError, HostThreads, Work};

/// Outcome of a thread acquisition attempt.
///
/// Pools treat [`Unavailable`](Acquisition::Unavailable) as "the host cannot
/// provide a thread right now": recoverable through the backlog for a fixed
/// pool, a synchronous rejection for an elastic one. It is never an error to
/// propagate, and it is never raised as a panic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Acquisition {
    /// The host accepted the work and started a thread for it.
    Acquired,
    /// The host declined to provide a thread.
    Unavailable,
}

/// Normalizes the host's thread allocators into a non-throwing source.
///
/// The execution context is queried on every call since it can change between
/// calls. A refusal is immediate and final for that call; there is no retry.
#[derive(Debug)]
pub struct ThreadSource<H> {
    host: Arc<H>,
}

impl<H> Clone for ThreadSource<H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
        }
    }
}

impl<H: HostThreads> ThreadSource<H> {
    /// Creates a source over the given host allocators.
    pub fn new(host: Arc<H>) -> Self {
        Self { host }
    }

    /// Asks the host to start a thread running `work`.
    ///
    /// Quota refusals and unexpected host faults both come back as
    /// [`Acquisition::Unavailable`]; unexpected faults are additionally
    /// logged. A fault from the background allocator is a host
    /// misconfiguration, since that allocator is expected to always succeed.
    pub fn acquire(&self, work: Work) -> Acquisition {
        match self.host.execution_context() {
            ExecutionContext::Background => match self.host.spawn_background(work) {
                Ok(()) => Acquisition::Acquired,
                Err(error) => {
                    tracing::error!("background allocator failed to provide a thread: {error}");
                    Acquisition::Unavailable
                }
            },
            ExecutionContext::Foreground => match self.host.spawn_foreground(work) {
                Ok(()) => Acquisition::Acquired,
                Err(HostError::QuotaExceeded) => Acquisition::Unavailable,
                Err(error) => {
                    tracing::warn!("foreground allocator failed to provide a thread: {error}");
                    Acquisition::Unavailable
                }
            },
        }
    }
}
