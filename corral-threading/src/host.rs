/// Work handed to a host allocator. The host never inspects it.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Execution context reported by the host at thread-acquisition time.
///
/// The context can change between calls, so it is queried fresh on every
/// acquisition and never cached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionContext {
    /// Request-scoped execution: time-boxed, with a hard cap on concurrently
    /// active threads per request.
    Foreground,
    /// Background execution: no cap on thread count, threads may outlive the
    /// request that started them.
    Background,
}

/// Failure signal raised by a host thread allocator.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The per-request thread quota is exhausted.
    #[error("host thread quota exceeded")]
    QuotaExceeded,
    /// Any other fault reported by the host.
    #[error("host allocator fault: {0}")]
    Fault(String),
}

/// The host's thread allocators.
///
/// Implementations are black boxes whose only contract is "start a thread for
/// the given work or signal refusal". The foreground allocator is entitled to
/// refuse with [`HostError::QuotaExceeded`] once the per-request quota is
/// spent; the background allocator is expected to always succeed.
pub trait HostThreads: Send + Sync {
    /// Reports the context the host is currently executing in.
    fn execution_context(&self) -> ExecutionContext;

    /// Starts a thread through the request-scoped allocator.
    fn spawn_foreground(&self, work: Work) -> Result<(), HostError>;

    /// Starts a thread through the background allocator.
    fn spawn_background(&self, work: Work) -> Result<(), HostError>;
}

/// Host backed by plain OS threads.
///
/// Outside the sandbox there is no request scope and no quota, so both
/// allocators delegate to [`std::thread`]. Useful for local runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdThreads;

impl HostThreads for StdThreads {
    fn execution_context(&self) -> ExecutionContext {
        ExecutionContext::Background
    }

    fn spawn_foreground(&self, work: Work) -> Result<(), HostError> {
        self.spawn_background(work)
    }

    fn spawn_background(&self, work: Work) -> Result<(), HostError> {
        std::thread::Builder::new()
            .name("corral-worker".to_owned())
            .spawn(work)
            .map(drop)
            .map_err(|error| HostError::Fault(error.to_string()))
    }
}
