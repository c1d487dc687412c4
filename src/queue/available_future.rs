use core::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};
use std::sync::Arc;

use super::{
  poll_error::PollError,
  queue_state::{AvailabilityAttempt, QueueState},
  waiter::{Waiter, WaiterOutcome},
};
use crate::cancel::{CancelRegistration, CancelSignal};

/// Future returned by the suspending availability probes.
///
/// Resolves `true` the instant an item is buffered (without consuming or
/// reserving it) and `false` once the queue is completed. The observer is
/// transient: it never removes an item and competes with no consumer.
pub struct AvailableFuture<T> {
  state:        Arc<QueueState<T>>,
  signal:       Option<CancelSignal>,
  started:      bool,
  waiter:       Option<Arc<Waiter<bool>>>,
  registration: Option<CancelRegistration>,
}

impl<T: Send + 'static> AvailableFuture<T> {
  pub(crate) fn new(state: Arc<QueueState<T>>, signal: Option<CancelSignal>) -> Self {
    Self { state, signal, started: false, waiter: None, registration: None }
  }

  fn finish(&mut self) -> Result<bool, PollError> {
    self.registration = None;
    let waiter = match self.waiter.take() {
      | Some(waiter) => waiter,
      | None => unreachable!("availability future finished without a waiter"),
    };
    match waiter.outcome() {
      | WaiterOutcome::Fulfilled(Some(available)) => Ok(available),
      | WaiterOutcome::Fulfilled(None) => unreachable!("fulfilled observer carried no verdict"),
      | WaiterOutcome::Completed(_) => Ok(false),
      | WaiterOutcome::Canceled(_) => Err(PollError::Canceled),
    }
  }
}

impl<T> Unpin for AvailableFuture<T> {}

impl<T: Send + 'static> Future for AvailableFuture<T> {
  type Output = Result<bool, PollError>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();

    if this.waiter.is_none() {
      assert!(!this.started, "AvailableFuture polled after completion");
      this.started = true;
      match this.state.availability_attempt(this.signal.as_ref()) {
        | AvailabilityAttempt::Ready(available) => return Poll::Ready(Ok(available)),
        | AvailabilityAttempt::Canceled => return Poll::Ready(Err(PollError::Canceled)),
        | AvailabilityAttempt::Parked(waiter, registration) => {
          this.waiter = Some(waiter);
          this.registration = registration;
        },
      }
    }

    match this.waiter.as_ref() {
      | Some(waiter) => match waiter.poll_claimed(cx) {
        | Poll::Pending => Poll::Pending,
        | Poll::Ready(()) => Poll::Ready(this.finish()),
      },
      | None => unreachable!("availability future polled without a waiter"),
    }
  }
}

impl<T> Drop for AvailableFuture<T> {
  fn drop(&mut self) {
    if let Some(waiter) = &self.waiter {
      let _ = waiter.cancel();
    }
  }
}
