use core::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};
use std::sync::Arc;

use super::{
  offer_error::OfferError,
  queue_state::{OfferAttempt, QueueState},
  waiter::{Waiter, WaiterOutcome},
};
use crate::cancel::{CancelRegistration, CancelSignal};

/// Future returned by the suspending enqueue forms.
///
/// The first poll attempts the enqueue; when the queue is at capacity a
/// producer waiter is registered and the future suspends until the waiter's
/// slot is claimed. Dropping the future while the waiter is still pending
/// cancels it, withdrawing the uncommitted item.
pub struct OfferFuture<T> {
  state:        Arc<QueueState<T>>,
  item:         Option<T>,
  signal:       Option<CancelSignal>,
  waiter:       Option<Arc<Waiter<T>>>,
  registration: Option<CancelRegistration>,
}

impl<T: Send + 'static> OfferFuture<T> {
  pub(crate) fn new(state: Arc<QueueState<T>>, item: T, signal: Option<CancelSignal>) -> Self {
    Self { state, item: Some(item), signal, waiter: None, registration: None }
  }

  fn finish(&mut self) -> Result<(), OfferError<T>> {
    self.registration = None;
    let waiter = match self.waiter.take() {
      | Some(waiter) => waiter,
      | None => unreachable!("offer future finished without a waiter"),
    };
    match waiter.outcome() {
      | WaiterOutcome::Fulfilled(_) => Ok(()),
      | WaiterOutcome::Completed(Some(item)) => Err(OfferError::Closed(item)),
      | WaiterOutcome::Canceled(Some(item)) => Err(OfferError::Canceled(item)),
      | WaiterOutcome::Completed(None) | WaiterOutcome::Canceled(None) => {
        unreachable!("rejected producer waiter lost its item")
      },
    }
  }
}

impl<T> Unpin for OfferFuture<T> {}

impl<T: Send + 'static> Future for OfferFuture<T> {
  type Output = Result<(), OfferError<T>>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();

    if this.waiter.is_none() {
      let item = match this.item.take() {
        | Some(item) => item,
        | None => panic!("OfferFuture polled after completion"),
      };
      match this.state.offer_attempt(item, this.signal.as_ref()) {
        | OfferAttempt::Done => return Poll::Ready(Ok(())),
        | OfferAttempt::Rejected(error) => return Poll::Ready(Err(error)),
        | OfferAttempt::Parked(waiter, registration) => {
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
      | None => unreachable!("offer future polled without a waiter"),
    }
  }
}

impl<T> Drop for OfferFuture<T> {
  fn drop(&mut self) {
    if let Some(waiter) = &self.waiter {
      let _ = waiter.cancel();
    }
  }
}
