//! External cancellation signals consumed by pending queue operations.
//!
//! A [`CancelSource`] fires at most once; [`CancelSignal`] handles observe it
//! and let a pending operation subscribe a one-shot callback that races
//! against ordinary fulfilment. The queue engine treats the signal as opaque:
//! it only ever queries [`CancelSignal::is_canceled`] and subscribes
//! callbacks, so timeouts and other triggers compose outside the engine.

mod registration;
mod signal;
mod source;
mod state;


pub use registration::CancelRegistration;
pub use signal::CancelSignal;
pub use source::CancelSource;
pub(crate) use state::CancelState;
