use core::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};
use std::sync::Arc;

use super::{
  poll_error::PollError,
  queue_state::{PollAttempt, QueueState},
  waiter::{Claim, Waiter, WaiterOutcome},
};
use crate::cancel::{CancelRegistration, CancelSignal};

/// Future returned by the suspending dequeue forms.
///
/// The first poll attempts the dequeue; on an empty, open queue a consumer
/// waiter is registered and the future suspends until the waiter's slot is
/// claimed with an item, completion, or cancellation.
///
/// Dropping the future after its waiter was fulfilled but before the item was
/// observed restores the item to the head of the buffer. On a bounded queue
/// that restore may hold one item above capacity until the next dequeue.
pub struct PollFuture<T> {
  state:        Arc<QueueState<T>>,
  signal:       Option<CancelSignal>,
  started:      bool,
  waiter:       Option<Arc<Waiter<T>>>,
  registration: Option<CancelRegistration>,
}

impl<T: Send + 'static> PollFuture<T> {
  pub(crate) fn new(state: Arc<QueueState<T>>, signal: Option<CancelSignal>) -> Self {
    Self { state, signal, started: false, waiter: None, registration: None }
  }

  fn finish(&mut self) -> Result<T, PollError> {
    self.registration = None;
    let waiter = match self.waiter.take() {
      | Some(waiter) => waiter,
      | None => unreachable!("poll future finished without a waiter"),
    };
    match waiter.outcome() {
      | WaiterOutcome::Fulfilled(Some(item)) => Ok(item),
      | WaiterOutcome::Fulfilled(None) => unreachable!("fulfilled consumer waiter carried no item"),
      | WaiterOutcome::Completed(_) => Err(PollError::Completed),
      | WaiterOutcome::Canceled(_) => Err(PollError::Canceled),
    }
  }
}

impl<T> Unpin for PollFuture<T> {}

impl<T: Send + 'static> Future for PollFuture<T> {
  type Output = Result<T, PollError>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();

    if this.waiter.is_none() {
      assert!(!this.started, "PollFuture polled after completion");
      this.started = true;
      match this.state.poll_attempt(this.signal.as_ref()) {
        | PollAttempt::Item(item) => return Poll::Ready(Ok(item)),
        | PollAttempt::Rejected(error) => return Poll::Ready(Err(error)),
        | PollAttempt::Parked(waiter, registration) => {
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
      | None => unreachable!("poll future polled without a waiter"),
    }
  }
}

impl<T> Drop for PollFuture<T> {
  fn drop(&mut self) {
    let Some(waiter) = self.waiter.take() else {
      return;
    };
    match waiter.cancel() {
      | Claim::Won(_) => {},
      | Claim::Lost => {
        // The slot was already claimed. A hand-off that was never observed
        // must give its item back so nothing is lost.
        if let WaiterOutcome::Fulfilled(Some(item)) = waiter.outcome() {
          self.state.restore_front(item);
        }
      },
    }
  }
}
