use std::sync::Arc;

use parking_lot::Mutex;

use crate::message::DispatchMessage;

/// Errors reported by a durable queue client.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The queue is not declared in the deployment.
    #[error("queue `{name}` is not provisioned")]
    NotProvisioned {
        /// The logical queue name that was addressed.
        name: String,
    },
    /// The queue exists but did not accept the message.
    #[error("queue transport failed: {0}")]
    Transport(String),
}

/// An external durable queue, seen as an append-only sink.
///
/// The queue owns an accepted message: durability, the countdown, and
/// redelivery are its business. There is no read-back and no retry here;
/// retry policy belongs to the queue's own client.
pub trait DurableQueue: Send + Sync {
    /// Appends a message to the queue.
    fn enqueue(&self, message: DispatchMessage) -> Result<(), QueueError>;
}

impl<Q: DurableQueue + ?Sized> DurableQueue for Arc<Q> {
    fn enqueue(&self, message: DispatchMessage) -> Result<(), QueueError> {
        (**self).enqueue(message)
    }
}

impl<Q: DurableQueue + ?Sized> DurableQueue for &Q {
    fn enqueue(&self, message: DispatchMessage) -> Result<(), QueueError> {
        (**self).enqueue(message)
    }
}

/// In-process queue for local runs and tests.
///
/// Accepted envelopes are held in order until drained. Countdowns are stored,
/// not honored: redelivery timing belongs to a real dispatcher.
#[derive(Debug, Default)]
pub struct MemoryQueue {
    messages: Mutex<Vec<DispatchMessage>>,
}

impl MemoryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all accepted envelopes, oldest first.
    pub fn drain(&self) -> Vec<DispatchMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Number of envelopes currently held.
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Whether the queue holds no envelopes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DurableQueue for MemoryQueue {
    fn enqueue(&self, message: DispatchMessage) -> Result<(), QueueError> {
        self.messages.lock().push(message);
        Ok(())
    }
}
