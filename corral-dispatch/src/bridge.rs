use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::message::{DispatchMessage, TIMER_QUEUE};
use crate::queue::{DurableQueue, QueueError};
use crate::task::TimerTask;

/// Errors from [`DispatchTimer::schedule`].
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// The task has no relocatable form; it is pinned to this process. A
    /// caller error, never retried.
    #[error("only relocatable tasks can be scheduled on the dispatch queue")]
    NotRelocatable,

    /// The task claims to be relocatable but failed to encode.
    #[error("failed to encode task for dispatch")]
    Encode(#[from] serde_json::Error),

    /// The dispatch queue is missing from the deployment. A configuration
    /// error, never retried locally.
    #[error(
        "dispatch queue `{queue}` does not exist, \
         declare it in the deployment's queue configuration"
    )]
    DispatchUnavailable {
        /// The queue that was addressed.
        queue: String,
        /// The underlying refusal.
        #[source]
        source: QueueError,
    },

    /// The queue exists but refused the hand-off.
    #[error("failed to hand task to the dispatch queue")]
    Dispatch(#[source] QueueError),
}

/// Dispatch tuning knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Logical queue for deferred execution.
    pub queue: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue: TIMER_QUEUE.to_owned(),
        }
    }
}

/// Timer that converts delayed execution into durable queue messages.
///
/// "Run this after `delay`" becomes an envelope on the dispatch queue; the
/// queue owns the envelope from acceptance on. Nothing is tracked locally,
/// nothing is retried, no deduplication happens, and no ordering holds
/// between two schedules beyond what the queue itself gives.
#[derive(Debug)]
pub struct DispatchTimer<Q> {
    queue: Q,
    config: DispatchConfig,
}

impl<Q: DurableQueue> DispatchTimer<Q> {
    /// Creates a timer over the given queue client, addressing
    /// [`TIMER_QUEUE`].
    pub fn new(queue: Q) -> Self {
        Self::with_config(queue, DispatchConfig::default())
    }

    /// Creates a timer with custom tuning.
    pub fn with_config(queue: Q, config: DispatchConfig) -> Self {
        Self { queue, config }
    }

    /// Schedules `task` to run after `delay`.
    ///
    /// The relocatability check runs before any queue traffic: a pinned task
    /// fails fast and the queue never sees it. A zero delay means "as soon as
    /// the dispatcher services it", not synchronous execution. The call
    /// blocks for the duration of the queue hand-off and no longer.
    pub fn schedule(&self, task: &dyn TimerTask, delay: Duration) -> Result<(), ScheduleError> {
        let payload = task.relocate()?;

        let message = DispatchMessage {
            queue: self.config.queue.clone(),
            countdown_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            payload,
        };

        self.queue.enqueue(message).map_err(|error| match error {
            QueueError::NotProvisioned { .. } => {
                tracing::error!("dispatch queue `{}` is not provisioned", self.config.queue);
                ScheduleError::DispatchUnavailable {
                    queue: self.config.queue.clone(),
                    source: error,
                }
            }
            other => ScheduleError::Dispatch(other),
        })
    }
}
