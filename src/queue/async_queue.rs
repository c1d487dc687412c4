use std::sync::Arc;

use super::{
  available_future::AvailableFuture,
  offer_error::OfferError,
  offer_future::OfferFuture,
  poll_error::PollError,
  poll_future::PollFuture,
  queue_state::QueueState,
  sync_queue::SyncDrainQueue,
};
use crate::cancel::CancelSignal;

/// Suspending handle over a drainable producer/consumer queue.
///
/// Every verb yields to the task scheduler while waiting. The handle is
/// cheaply cloneable and shares its state with any number of sync and async
/// handles; both modes are driven by the identical state machine, so mixed
/// blocking and suspending callers interoperate freely.
pub struct AsyncDrainQueue<T> {
  state: Arc<QueueState<T>>,
}

impl<T: Send + 'static> AsyncDrainQueue<T> {
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

  /// Returns a blocking handle sharing this queue's state.
  #[must_use]
  pub fn to_sync(&self) -> SyncDrainQueue<T> {
    SyncDrainQueue::from_state(self.state.clone())
  }

  /// Enqueues `item`, suspending while the queue is at capacity.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Closed` when adding has been completed, carrying
  /// the item back.
  pub async fn offer(&self, item: T) -> Result<(), OfferError<T>> {
    OfferFuture::new(self.state.clone(), item, None).await
  }

  /// Enqueues `item`, suspending while the queue is at capacity, unless
  /// `signal` fires first.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Closed` when adding has been completed and
  /// `OfferError::Canceled` when the signal wins the race; both carry the
  /// item back.
  pub async fn offer_with(&self, item: T, signal: &CancelSignal) -> Result<(), OfferError<T>> {
    OfferFuture::new(self.state.clone(), item, Some(signal.clone())).await
  }

  /// Enqueues `item` only when a slot is immediately available; never
  /// suspends.
  ///
  /// # Errors
  ///
  /// Returns `OfferError::Full` when the queue is at capacity and
  /// `OfferError::Closed` when adding has been completed.
  pub fn try_offer(&self, item: T) -> Result<(), OfferError<T>> {
    self.state.try_offer(item)
  }

  /// Dequeues the next item, suspending while the queue is empty and open.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Completed` once adding has been completed and the
  /// buffer has drained.
  pub async fn poll(&self) -> Result<T, PollError> {
    PollFuture::new(self.state.clone(), None).await
  }

  /// Dequeues the next item, suspending while the queue is empty and open,
  /// unless `signal` fires first.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Completed` once the queue is completed and drained,
  /// or `PollError::Canceled` when the signal wins the race.
  pub async fn poll_with(&self, signal: &CancelSignal) -> Result<T, PollError> {
    PollFuture::new(self.state.clone(), Some(signal.clone())).await
  }

  /// Dequeues an item only when one is immediately buffered; never suspends.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Empty` when the queue is open but empty, and
  /// `PollError::Completed` once it is completed and drained.
  pub fn try_poll(&self) -> Result<T, PollError> {
    self.state.try_poll()
  }

  /// Suspends until an item is buffered (`true`) or the queue completes
  /// (`false`), without consuming or reserving anything.
  pub async fn output_available(&self) -> bool {
    match AvailableFuture::new(self.state.clone(), None).await {
      | Ok(available) => available,
      | Err(_) => unreachable!("availability probe without a signal cannot be canceled"),
    }
  }

  /// Suspends until an item is buffered, the queue completes, or `signal`
  /// fires.
  ///
  /// # Errors
  ///
  /// Returns `PollError::Canceled` when the signal wins the race.
  pub async fn output_available_with(&self, signal: &CancelSignal) -> Result<bool, PollError> {
    AvailableFuture::new(self.state.clone(), Some(signal.clone())).await
  }

  /// Completes adding: no further enqueue ever succeeds. Idempotent, never
  /// suspends. Parked producers are released with their items returned;
  /// buffered items remain dequeueable until drained.
  pub fn close(&self) {
    self.state.close();
  }

  /// Completion-signaling wrapper kept for interface compatibility; the
  /// transition itself is synchronous.
  #[deprecated(note = "completing adding is synchronous; call `close` instead")]
  pub async fn close_async(&self) {
    self.state.close();
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

impl<T> Clone for AsyncDrainQueue<T> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}
