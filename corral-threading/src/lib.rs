//! Worker pools for thread-quota constrained sandboxed hosts.
//!
//! Sandboxed hosts do not hand out threads freely: request-scoped execution is
//! time-boxed and capped at a small number of concurrently active threads, and
//! nothing guarantees that a thread can be created on demand. The pools in
//! this crate are built for that world:
//!
//! - [`FixedPool`] runs an exact number of workers and queues excess work on
//!   an unbounded FIFO backlog, failing loudly only when the host cannot
//!   produce workers at all.
//! - [`ElasticPool`] grows on demand up to a hard cap and rejects growth
//!   beyond it with an error that names the cap, steering callers towards
//!   fixed sizing.
//!
//! All thread creation goes through a [`ThreadSource`], which queries the
//! host's execution context on every acquisition and converts the host's
//! refusals into the non-throwing [`Acquisition`] outcome. [`Provisioner`] is
//! the single decision point mapping a requested degree of parallelism onto
//! one of the two pools.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//!
//! use corral_threading::{Pool, Provisioner, StdThreads};
//!
//! let provisioner = Provisioner::new(Arc::new(StdThreads));
//!
//! // A sized request gets a fixed pool, no size gets an elastic one.
//! let pool = provisioner.provide(NonZeroUsize::new(4));
//!
//! let (tx, rx) = std::sync::mpsc::channel();
//! pool.submit(Box::new(move || tx.send(2 + 2).unwrap())).unwrap();
//! assert_eq!(rx.recv().unwrap(), 4);
//! ```
//!
//! # Concurrency model
//!
//! There is no cooperative scheduler here: workers are host-provided OS
//! threads, and the host serializes its own quota accounting. Submission
//! never blocks waiting for a worker to free up. Once a pool accepts a task
//! there is no cancellation handle; stopping early is the task's own business.

#![warn(missing_docs)]

mod builder;
mod elastic;
mod fixed;
mod host;
mod pool;
mod provision;
mod source;

pub use self::builder::*;
pub use self::elastic::*;
pub use self::fixed::*;
pub use self::host::*;
pub use self::pool::*;
pub use self::provision::*;
pub use self::source::*;
