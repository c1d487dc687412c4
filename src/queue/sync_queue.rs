use std::sync::Arc;

use super::{
  async_queue::AsyncDrainQueue,
  consuming_iter::ConsumingIter,
  offer_error::OfferError,
  poll_error::PollError,
  queue_state::{AvailabilityAttempt, OfferAttempt, PollAttempt, QueueState},
  waiter::WaiterOutcome,
};
use crate::cancel::CancelSignal;

/// Blocking handle over a drainable producer/consumer queue.
///
/// Every verb occupies the calling thread while waiting. The handle is
/// cheaply cloneable and shares its state with any number of sync and async
/// handles; all of them compete for the same items.
pub struct SyncDrainQueue<T> {
  state: Arc<QueueState<T>>,
}

impl<T: Send + 'static> SyncDrainQueue<T> {
  /// Creates an unbounded queue.
  #[must_use]
  pub fn unbounded() -> Self {
    Self { state: Arc::new(QueueState::new(None, std::collections::VecDeque::new())) }
  }

  /// Creates a queue holding at most `capacity` buffered items.
  ///
  /// # Panics
  ///
  /// Panics when `capacity` is zero.
  #[must_use]
  pub fn bounded(capacity: usize) -> Self {
    Self { state: Arc::new(QueueState::new(Some(capacity), std::collections::VecDeque::new())) }
  }

  /// Creates an unbounded queue pre-filled with `items`, preserving order.
  #[must_use]
  pub fn with_items<I>(items: I) -> Self
  where
    I: IntoIterator<Item = T>, {
    Self { state: Arc::new(QueueState::new(None, items.into_iter().collect())) }
  }

  /// Creates a bounded queue pre-filled with `items`, preserving order.
  ///
  /// # Panics
  ///
  /// Panics when `capacity` is zero or `items` holds more than `capacity`
  /// elements.
  #[must_use]
  pub fn bounded_with_items<I>(items: I, capacity: usize) -> Self
  where
    I: IntoIterator<Item = T>, {
    Self { state: Arc::new(QueueState::new(Some(capacity), items.into_iter().collect())) }
  }

  pub(crate) fn from_state(state: Arc<QueueState<T>>) -> Self {
    Self { state }
  }

  /// Returns a suspending handle sharing this queue's state.
  #[must_use]
  pub fn to_async(&self) -> AsyncDrainQueue<T> {
    AsyncDrainQueue::from_state(self.state.clone())
  }

  /// Enqueues `item`, blocking while the queue is at capacity.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Closed` when adding has been completed, carrying
  /// the item back.
  pub fn offer(&self, item: T) -> Result<(), OfferError<T>> {
    self.offer_inner(item, None)
  }

  /// Enqueues `item`, blocking while the queue is at capacity, unless
  /// `signal` fires first.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Closed` when adding has been completed and
  /// `OfferError::Canceled` when the signal wins the race; both carry the
  /// item back.
  pub fn offer_with(&self, item: T, signal: &CancelSignal) -> Result<(), OfferError<T>> {
    self.offer_inner(item, Some(signal))
  }

  fn offer_inner(&self, item: T, signal: Option<&CancelSignal>) -> Result<(), OfferError<T>> {
    match self.state.offer_attempt(item, signal) {
      | OfferAttempt::Done => Ok(()),
      | OfferAttempt::Rejected(error) => Err(error),
      | OfferAttempt::Parked(waiter, _registration) => {
        waiter.block_until_claimed();
        match waiter.outcome() {
          | WaiterOutcome::Fulfilled(_) => Ok(()),
          | WaiterOutcome::Completed(Some(item)) => Err(OfferError::Closed(item)),
          | WaiterOutcome::Canceled(Some(item)) => Err(OfferError::Canceled(item)),
          | WaiterOutcome::Completed(None) | WaiterOutcome::Canceled(None) => {
            unreachable!("rejected producer waiter lost its item")
          },
        }
      },
    }
  }

  /// Enqueues `item` only when a slot is immediately available; never parks.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Full` when the queue is at capacity and
  /// `OfferError::Closed` when adding has been completed.
  pub fn try_offer(&self, item: T) -> Result<(), OfferError<T>> {
    self.state.try_offer(item)
  }

  /// Dequeues the next item, blocking while the queue is empty and open.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Completed` once adding has been completed and the
  /// buffer has drained.
  pub fn poll(&self) -> Result<T, PollError> {
    self.poll_inner(None)
  }

  /// Dequeues the next item, blocking while the queue is empty and open,
  /// unless `signal` fires first.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Completed` once the queue is completed and drained,
  /// or `PollError::Canceled` when the signal wins the race.
  pub fn poll_with(&self, signal: &CancelSignal) -> Result<T, PollError> {
    self.poll_inner(Some(signal))
  }

  fn poll_inner(&self, signal: Option<&CancelSignal>) -> Result<T, PollError> {
    match self.state.poll_attempt(signal) {
      | PollAttempt::Item(item) => Ok(item),
      | PollAttempt::Rejected(error) => Err(error),
      | PollAttempt::Parked(waiter, _registration) => {
        waiter.block_until_claimed();
        match waiter.outcome() {
          | WaiterOutcome::Fulfilled(Some(item)) => Ok(item),
          | WaiterOutcome::Fulfilled(None) => unreachable!("fulfilled consumer waiter carried no item"),
          | WaiterOutcome::Completed(_) => Err(PollError::Completed),
          | WaiterOutcome::Canceled(_) => Err(PollError::Canceled),
        }
      },
    }
  }

  /// Dequeues an item only when one is immediately buffered; never parks.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Empty` when the queue is open but empty, and
  /// `PollError::Completed` once it is completed and drained.
  pub fn try_poll(&self) -> Result<T, PollError> {
    self.state.try_poll()
  }

  /// Blocks until an item is buffered (`true`) or the queue completes
  /// (`false`), without consuming or reserving anything.
  #[must_use]
  pub fn output_available(&self) -> bool {
    match self.availability_inner(None) {
      | Ok(available) => available,
      | Err(_) => unreachable!("availability probe without a signal cannot be canceled"),
    }
  }

  /// Blocks until an item is buffered, the queue completes, or `signal`
  /// fires.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Canceled` when the signal wins the race.
  pub fn output_available_with(&self, signal: &CancelSignal) -> Result<bool, PollError> {
    self.availability_inner(Some(signal))
  }

  fn availability_inner(&self, signal: Option<&CancelSignal>) -> Result<bool, PollError> {
    match self.state.availability_attempt(signal) {
      | AvailabilityAttempt::Ready(available) => Ok(available),
      | AvailabilityAttempt::Canceled => Err(PollError::Canceled),
      | AvailabilityAttempt::Parked(waiter, _registration) => {
        waiter.block_until_claimed();
        match waiter.outcome() {
          | WaiterOutcome::Fulfilled(Some(available)) => Ok(available),
          | WaiterOutcome::Fulfilled(None) => unreachable!("fulfilled observer carried no verdict"),
          | WaiterOutcome::Completed(_) => Ok(false),
          | WaiterOutcome::Canceled(_) => Err(PollError::Canceled),
        }
      },
    }
  }

  /// Completes adding: no further enqueue ever succeeds. Idempotent, never
  /// blocks. Parked producers are released with their items returned;
  /// buffered items remain dequeueable until drained.
  pub fn close(&self) {
    self.state.close();
  }

  /// Returns an iterator that dequeues until the queue is completed and
  /// drained. Concurrent iterations compete for items.
  #[must_use]
  pub fn consuming_iter(&self) -> ConsumingIter<'_, T> {
    ConsumingIter::new(self, None)
  }

  /// Returns a consuming iterator that additionally ends when `signal`
  /// fires.
  #[must_use]
  pub fn consuming_iter_with(&self, signal: CancelSignal) -> ConsumingIter<'_, T> {
    ConsumingIter::new(self, Some(signal))
  }

  /// Number of currently buffered items.
  #[must_use]
  pub fn len(&self) -> usize {
    self.state.len()
  }

  /// Configured capacity; `None` means unbounded.
  #[must_use]
  pub fn capacity(&self) -> Option<usize> {
    self.state.capacity()
  }

  /// Indicates whether the buffer is currently empty.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.state.is_empty()
  }

  /// Indicates whether the buffer is currently at capacity.
  #[must_use]
  pub fn is_full(&self) -> bool {
    self.state.is_full()
  }

  /// Indicates whether adding has been completed.
  #[must_use]
  pub fn is_closed(&self) -> bool {
    self.state.is_closed()
  }

  /// Indicates whether adding has been completed and the buffer has drained.
  #[must_use]
  pub fn is_completed(&self) -> bool {
    self.state.is_completed()
  }
}

impl<T> Clone for SyncDrainQueue<T> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}
