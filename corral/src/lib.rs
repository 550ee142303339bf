//! Pool and timer adapters for running a concurrency framework inside a
//! sandboxed host.
//!
//! Sandboxed hosts put hard limits on parallel work: a small quota of
//! request-scoped threads, a wall-clock deadline per unit of work, no
//! guarantee that a thread can be created on demand, and no local
//! delayed-execution primitive. This crate wires the two adapter layers built
//! for those limits — the worker pools of [`corral_threading`] and the
//! queue-backed timer of [`corral_dispatch`] — into the process-wide factory
//! slots a concurrency framework consumes.
//!
//! # Setup
//!
//! Register the adapters once at application start, before the framework
//! builds its first pool or timer:
//!
//! ```
//! use std::sync::Arc;
//!
//! use corral_dispatch::MemoryQueue;
//! use corral_threading::StdThreads;
//!
//! corral::install(Arc::new(StdThreads), MemoryQueue::new());
//! ```
//!
//! In a real deployment `StdThreads` is replaced by the host's thread
//! allocators and `MemoryQueue` by the host's durable queue client.
//!
//! Registration is idempotent: the first registration of each slot wins, so
//! explicit user configuration placed earlier is never overwritten, and a
//! repeated [`install`] is a no-op. Registering after the framework's first
//! use has no effect on pools and timers already handed out.

mod factory;
mod registry;

pub use self::factory::*;
pub use self::registry::*;

pub use corral_dispatch;
pub use corral_threading;
