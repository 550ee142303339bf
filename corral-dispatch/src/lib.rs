//! Deferred execution over a durable dispatch queue.
//!
//! Sandboxed hosts have no delayed-execution primitive: nothing like a local
//! timer wheel survives the request that would park work on it. What the host
//! does offer is a durable queue that redelivers a message after a countdown.
//! This crate bridges the two: a "run this after `delay`" request becomes an
//! envelope on that queue, and the queue owns it from acceptance on.
//!
//! Only work that can leave the process may make that trip. The
//! [`TimerTask::relocate`] step is the capability check: it either produces
//! the task's wire form or fails with
//! [`NotRelocatable`](ScheduleError::NotRelocatable) before the queue is ever
//! contacted. Types that implement [`Relocatable`] get that step from serde.
//!
//! # Scheduling
//!
//! ```
//! use std::time::Duration;
//!
//! use corral_dispatch::{DispatchTimer, MemoryQueue, Relocatable};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Ping {
//!     target: String,
//! }
//!
//! impl Relocatable for Ping {
//!     const KIND: &'static str = "ping";
//!
//!     fn run(self) {
//!         // Runs on the redelivery side.
//!     }
//! }
//!
//! let queue = MemoryQueue::new();
//! let timer = DispatchTimer::new(queue);
//!
//! let task = Ping { target: "worker-1".to_owned() };
//! timer.schedule(&task, Duration::from_secs(30)).unwrap();
//! ```
//!
//! # Redelivery
//!
//! The receiving process registers every task type that travels on the queue
//! in a [`TaskRegistry`] and feeds redelivered envelopes to
//! [`TaskRegistry::redeliver`], which decodes the payload and runs it
//! synchronously. No delay logic applies at that point; the countdown was the
//! queue's job.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod bridge;
mod message;
mod queue;
mod redeliver;
mod task;

pub use self::bridge::*;
pub use self::message::*;
pub use self::queue::*;
pub use self::redeliver::*;
pub use self::task::*;
