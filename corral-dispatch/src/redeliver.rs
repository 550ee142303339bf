use std::collections::BTreeMap;

use crate::message::{DispatchMessage, EncodedTask};
use crate::task::{Relocatable, TimerTask};

/// Errors from [`TaskRegistry::redeliver`].
#[derive(Debug, thiserror::Error)]
pub enum RedeliverError {
    /// The payload names a task kind this process never registered.
    #[error("unknown task kind `{kind}`")]
    UnknownKind {
        /// The wire name found in the payload.
        kind: String,
    },
    /// The payload body does not decode as the registered type.
    #[error("failed to decode task payload")]
    Decode(#[from] serde_json::Error),
}

type DecodeFn = fn(serde_json::Value) -> Result<Box<dyn TimerTask>, serde_json::Error>;

/// Receiving-side decoder table for redelivered envelopes.
///
/// Every task type that travels on the dispatch queue must be registered in
/// the process that receives it, keyed by its wire
/// [`KIND`](Relocatable::KIND).
#[derive(Debug, Default)]
pub struct TaskRegistry {
    decoders: BTreeMap<&'static str, DecodeFn>,
}

impl TaskRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the decoder for `T`.
    pub fn register<T: Relocatable>(&mut self) {
        self.decoders.insert(T::KIND, decode::<T>);
    }

    /// Unwraps a redelivered envelope and runs its task synchronously on the
    /// calling thread.
    ///
    /// The countdown was the queue's job; no delay logic applies here.
    pub fn redeliver(&self, message: DispatchMessage) -> Result<(), RedeliverError> {
        let EncodedTask { kind, body } = message.payload;
        let Some(decode) = self.decoders.get(kind.as_str()) else {
            return Err(RedeliverError::UnknownKind { kind });
        };
        decode(body)?.run();
        Ok(())
    }
}

fn decode<T: Relocatable>(
    body: serde_json::Value,
) -> Result<Box<dyn TimerTask>, serde_json::Error> {
    Ok(Box::new(serde_json::from_value::<T>(body)?))
}
