use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::host::HostThreads;
use crate::pool::{
    DEFAULT_KEEP_ALIVE, DEFAULT_POOL_SIZE, ElasticReject, Pool, SubmitError, Task, run_task,
};
use crate::source::{Acquisition, ThreadSource};

/// Worker pool that grows on demand up to a hard cap.
///
/// There is no backlog: a task is handed directly to a worker that is already
/// waiting, or a fresh worker is started for it. At the cap the pool rejects
/// immediately with an error naming the cap, since the host will not let it
/// grow further and a backlog would only delay, not prevent, that rejection.
///
/// Idle workers are reclaimed after the keep-alive window; the pool shrinks
/// back to zero when unused. No dispatch-order guarantee holds once more than
/// one worker exists.
pub struct ElasticPool<H> {
    tx: flume::Sender<Task>,
    inner: Arc<Inner<H>>,
}

struct Inner<H> {
    source: ThreadSource<H>,
    rx: flume::Receiver<Task>,
    total: Mutex<usize>,
    cap: usize,
    keep_alive: Duration,
}

impl<H: HostThreads + 'static> ElasticPool<H> {
    /// Creates a pool capped at [`DEFAULT_POOL_SIZE`] workers.
    pub fn new(source: ThreadSource<H>) -> Self {
        Self::with_config(source, DEFAULT_POOL_SIZE, DEFAULT_KEEP_ALIVE)
    }

    /// Creates a pool with a custom cap and keep-alive window.
    pub fn with_config(source: ThreadSource<H>, cap: usize, keep_alive: Duration) -> Self {
        // Zero capacity makes the channel a pure handoff: a send succeeds
        // only when a worker is already waiting on the other side.
        let (tx, rx) = flume::bounded(0);

        Self {
            tx,
            inner: Arc::new(Inner {
                source,
                rx,
                total: Mutex::new(0),
                cap,
                keep_alive,
            }),
        }
    }

    /// Submits a task, growing the pool if no worker is waiting.
    ///
    /// Never blocks: the task is either handed off, started on a fresh
    /// worker, or rejected synchronously.
    pub fn submit(&self, task: Task) -> Result<(), SubmitError> {
        let task = match self.tx.try_send(task) {
            Ok(()) => return Ok(()),
            Err(flume::TrySendError::Full(task)) => task,
            Err(flume::TrySendError::Disconnected(_)) => {
                unreachable!("pool holds the handoff receiver while alive")
            }
        };

        let mut total = self.inner.total.lock();
        if *total >= self.inner.cap {
            return Err(ElasticReject::AtCapacity { cap: self.inner.cap }.into());
        }

        let inner = Arc::clone(&self.inner);
        match self
            .inner
            .source
            .acquire(Box::new(move || Inner::run_worker(inner, task)))
        {
            Acquisition::Acquired => {
                *total += 1;
                Ok(())
            }
            Acquisition::Unavailable => Err(ElasticReject::NoHostThread.into()),
        }
    }
}

impl<H: HostThreads + 'static> Pool for ElasticPool<H> {
    fn submit(&self, task: Task) -> Result<(), SubmitError> {
        ElasticPool::submit(self, task)
    }
}

impl<H: HostThreads + 'static> Inner<H> {
    fn run_worker(inner: Arc<Self>, first: Task) {
        run_task(first);

        loop {
            match inner.rx.recv_timeout(inner.keep_alive) {
                Ok(task) => run_task(task),
                // Timed out or the pool was dropped: reclaim, the minimum
                // pool size is zero.
                Err(_) => {
                    *inner.total.lock() -= 1;
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    use crate::host::{ExecutionContext, HostError, StdThreads, Work};

    use super::*;

    const WAIT: Duration = Duration::from_secs(5);

    struct RefusingHost;

    impl HostThreads for RefusingHost {
        fn execution_context(&self) -> ExecutionContext {
            ExecutionContext::Foreground
        }

        fn spawn_foreground(&self, _work: Work) -> Result<(), HostError> {
            Err(HostError::QuotaExceeded)
        }

        fn spawn_background(&self, _work: Work) -> Result<(), HostError> {
            Err(HostError::QuotaExceeded)
        }
    }

    /// Background host counting every spawned thread.
    struct CountingHost {
        spawned: AtomicUsize,
    }

    impl CountingHost {
        fn new() -> Self {
            Self {
                spawned: AtomicUsize::new(0),
            }
        }

        fn spawned(&self) -> usize {
            self.spawned.load(Ordering::SeqCst)
        }
    }

    impl HostThreads for CountingHost {
        fn execution_context(&self) -> ExecutionContext {
            ExecutionContext::Background
        }

        fn spawn_foreground(&self, work: Work) -> Result<(), HostError> {
            self.spawn_background(work)
        }

        fn spawn_background(&self, work: Work) -> Result<(), HostError> {
            self.spawned.fetch_add(1, Ordering::SeqCst);
            std::thread::spawn(work);
            Ok(())
        }
    }

    fn pool() -> ElasticPool<StdThreads> {
        ElasticPool::new(ThreadSource::new(Arc::new(StdThreads)))
    }

    /// Saturates `pool` with `count` tasks parked on the returned barrier.
    fn saturate(pool: &ElasticPool<StdThreads>, count: usize) -> Arc<Barrier> {
        let barrier = Arc::new(Barrier::new(count + 1));
        let (started_tx, started_rx) = mpsc::channel();

        for _ in 0..count {
            let barrier = Arc::clone(&barrier);
            let started_tx = started_tx.clone();
            pool.submit(Box::new(move || {
                started_tx.send(()).unwrap();
                barrier.wait();
            }))
            .unwrap();
        }
        for _ in 0..count {
            started_rx.recv_timeout(WAIT).unwrap();
        }

        barrier
    }

    #[test]
    fn test_rejects_at_cap_with_advisory_error() {
        let pool = pool();
        let barrier = saturate(&pool, DEFAULT_POOL_SIZE);

        let result = pool.submit(Box::new(|| ()));

        match result {
            Err(SubmitError::RejectedElastic(reject)) => {
                assert_eq!(reject, ElasticReject::AtCapacity { cap: 10 });
                assert!(reject.to_string().contains("fixed-size pool"));
            }
            other => panic!("expected an elastic rejection, got {other:?}"),
        }

        barrier.wait();
    }

    #[test]
    fn test_rejects_when_host_refuses_growth() {
        let pool = ElasticPool::new(ThreadSource::new(Arc::new(RefusingHost)));

        let result = pool.submit(Box::new(|| ()));

        assert!(matches!(
            result,
            Err(SubmitError::RejectedElastic(ElasticReject::NoHostThread))
        ));
    }

    #[test]
    fn test_runs_all_tasks() {
        let pool = pool();
        let counter = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = mpsc::channel();

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            let done_tx = done_tx.clone();
            pool.submit(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                done_tx.send(()).unwrap();
            }))
            .unwrap();
        }

        for _ in 0..8 {
            done_rx.recv_timeout(WAIT).unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn test_waiting_worker_is_reused_instead_of_growing() {
        let host = Arc::new(CountingHost::new());
        let pool = ElasticPool::with_config(
            ThreadSource::new(Arc::clone(&host)),
            DEFAULT_POOL_SIZE,
            Duration::from_secs(10),
        );
        let (done_tx, done_rx) = mpsc::channel();

        let done_tx1 = done_tx.clone();
        pool.submit(Box::new(move || done_tx1.send(()).unwrap()))
            .unwrap();
        done_rx.recv_timeout(WAIT).unwrap();

        // The worker needs a moment to park on the handoff channel before a
        // direct handoff can succeed.
        std::thread::sleep(Duration::from_millis(200));

        pool.submit(Box::new(move || done_tx.send(()).unwrap()))
            .unwrap();
        done_rx.recv_timeout(WAIT).unwrap();

        assert_eq!(host.spawned(), 1);
    }

    #[test]
    fn test_shrinks_back_to_zero_after_keep_alive() {
        let host = Arc::new(CountingHost::new());
        let pool = ElasticPool::with_config(
            ThreadSource::new(Arc::clone(&host)),
            DEFAULT_POOL_SIZE,
            Duration::from_millis(50),
        );
        let (done_tx, done_rx) = mpsc::channel();

        let done_tx1 = done_tx.clone();
        pool.submit(Box::new(move || done_tx1.send(()).unwrap()))
            .unwrap();
        done_rx.recv_timeout(WAIT).unwrap();

        std::thread::sleep(Duration::from_millis(500));
        assert_eq!(*pool.inner.total.lock(), 0);

        // The next task grows the pool again from zero.
        pool.submit(Box::new(move || done_tx.send(()).unwrap()))
            .unwrap();
        done_rx.recv_timeout(WAIT).unwrap();
        assert_eq!(host.spawned(), 2);
    }
}
