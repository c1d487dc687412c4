//! drainq: a thread-safe, cancellable, dual-mode producer/consumer queue
//! with graceful, drainable shutdown.
//!
//! Every operation exists in a thread-occupying (blocking) form on
//! [`SyncDrainQueue`] and a thread-yielding (suspending) form on
//! [`AsyncDrainQueue`]; both are driven by the identical internal state
//! machine, so producers and consumers in the two modes interoperate freely
//! over one queue instance.
//!
//! Shutdown is two-phase: [`SyncDrainQueue::close`] (or its async twin)
//! stops all further enqueues, and the queue becomes *completed* the moment
//! the remaining buffered items drain. Any single pending operation can be
//! canceled through a [`CancelSignal`] without disturbing the rest.
//!
//! ```
//! use drainq::SyncDrainQueue;
//!
//! let queue = SyncDrainQueue::bounded(8);
//! queue.offer("job").unwrap();
//! queue.close();
//!
//! let drained: Vec<_> = queue.consuming_iter().collect();
//! assert_eq!(drained, vec!["job"]);
//! assert!(queue.is_completed());
//! ```

pub mod cancel;
pub mod queue;

pub use cancel::{CancelRegistration, CancelSignal, CancelSource};
pub use queue::{
  AsyncDrainQueue, AvailableFuture, ConsumingIter, OfferError, OfferFuture, PollError, PollFuture, SyncDrainQueue,
};
