use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::bridge::ScheduleError;
use crate::message::EncodedTask;

/// A delayed callback handed to the timer.
///
/// The timer never runs a task locally: scheduling moves it onto the dispatch
/// queue, and [`relocate`](TimerTask::relocate) is the capability check
/// deciding whether it can make that trip. Tasks closing over process-local
/// state (open handles, channels, borrowed data) have no relocatable form and
/// must fail the check.
pub trait TimerTask: Send + 'static {
    /// Runs the task. Called on the redelivery side, on whatever thread the
    /// host gives that context.
    fn run(self: Box<Self>);

    /// Encodes the task for transport on the dispatch queue.
    fn relocate(&self) -> Result<EncodedTask, ScheduleError>;
}

/// Work that can be relocated to another process.
///
/// The serde bounds are the transport capability, and
/// [`KIND`](Relocatable::KIND) names the type on the wire so the receiving
/// side can find its decoder. Implementing this trait is all it takes to make
/// a task schedulable: [`TimerTask`] is provided on top of it.
pub trait Relocatable: Serialize + DeserializeOwned + Send + 'static {
    /// Stable wire name of this task type.
    const KIND: &'static str;

    /// Executes the task after redelivery.
    fn run(self);
}

impl<T: Relocatable> TimerTask for T {
    fn run(self: Box<Self>) {
        Relocatable::run(*self)
    }

    fn relocate(&self) -> Result<EncodedTask, ScheduleError> {
        Ok(EncodedTask {
            kind: T::KIND.to_owned(),
            body: serde_json::to_value(self)?,
        })
    }
}
