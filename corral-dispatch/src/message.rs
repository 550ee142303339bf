use serde::{Deserialize, Serialize};

/// Logical name of the queue reserved for deferred execution.
///
/// The queue must be declared in the deployment's queue configuration; it is
/// never created on demand.
pub const TIMER_QUEUE: &str = "timer";

/// Relocatable form of a task, ready for transport.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedTask {
    /// Stable wire name of the task type, used to find the decoder on the
    /// receiving side.
    pub kind: String,
    /// Serialized task state.
    pub body: serde_json::Value,
}

/// Envelope placed on the durable queue.
///
/// Once the queue accepts an envelope it owns it: the sender keeps no
/// reference and does no acknowledgment tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchMessage {
    /// Logical queue the envelope is addressed to.
    pub queue: String,
    /// Delay before redelivery, in milliseconds. Zero means "as soon as the
    /// dispatcher can service it", not synchronous execution.
    pub countdown_ms: u64,
    /// The relocated task.
    pub payload: EncodedTask,
}
