//! The dual-mode queue engine and its blocking/suspending handles.
//!
//! One mutually-exclusive core per queue instance serializes every state
//! transition: buffered items, capacity, the two-phase completion protocol,
//! and the producer/consumer/observer waiter registries. The blocking and
//! suspending handles differ only in how a parked operation is resumed
//! (thread unparking vs. task waking); the state machine is identical.

mod async_queue;
mod available_future;
mod consuming_iter;
mod offer_error;
mod offer_future;
mod poll_error;
mod poll_future;
mod queue_core;
mod queue_state;
mod resume_signal;
mod sync_queue;
mod waiter;
mod waiter_registry;


pub use async_queue::AsyncDrainQueue;
pub use available_future::AvailableFuture;
pub use consuming_iter::ConsumingIter;
pub use offer_error::OfferError;
pub use offer_future::OfferFuture;
pub use poll_error::PollError;
pub use poll_future::PollFuture;
pub use sync_queue::SyncDrainQueue;
