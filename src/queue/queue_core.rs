use std::{collections::VecDeque, sync::Arc};

use super::{
  offer_error::OfferError, resume_signal::ResumeSignal, waiter::Waiter, waiter_registry::WaiterRegistry,
};

/// Step taken by an enqueue attempt.
pub(crate) enum OfferStep<T> {
  /// The item was buffered or handed directly to a pending consumer.
  Accepted,
  /// The queue refused the item; the error carries it back.
  Rejected(OfferError<T>),
  /// The queue is at capacity; the caller must park a producer waiter.
  MustWait(T),
}

/// Step taken by a dequeue attempt.
pub(crate) enum PollStep<T> {
  Item(T),
  /// Adding completed and the buffer is drained.
  Finished,
  /// The queue is empty but open; the caller must park a consumer waiter.
  MustWait,
}

/// Step taken by an availability probe.
pub(crate) enum AvailabilityStep {
  Ready(bool),
  MustWait,
}

/// The queue state machine: FIFO buffer, capacity bound, completion flag,
/// and the three waiter registries.
///
/// Everything here runs under the owning [`QueueState`](super::queue_state::QueueState)
/// lock. Transition methods commit slot claims and collect the extracted
/// resumption signals into `resumptions`; the caller fires them after the
/// lock is released so no waiter is ever woken inside the critical section.
pub(crate) struct QueueCore<T> {
  buffer:    VecDeque<T>,
  capacity:  Option<usize>,
  closed:    bool,
  producers: WaiterRegistry<T>,
  consumers: WaiterRegistry<T>,
  observers: WaiterRegistry<bool>,
}

impl<T> QueueCore<T> {
  pub(crate) fn new(capacity: Option<usize>, seed: VecDeque<T>) -> Self {
    Self {
      buffer: seed,
      capacity,
      closed: false,
      producers: WaiterRegistry::new(),
      consumers: WaiterRegistry::new(),
      observers: WaiterRegistry::new(),
    }
  }

  fn has_room(&self) -> bool {
    self.capacity.map_or(true, |capacity| self.buffer.len() < capacity)
  }

  fn check_bound(&self) {
    debug_assert!(self.capacity.map_or(true, |capacity| self.buffer.len() <= capacity));
  }

  pub(crate) fn offer_step(&mut self, item: T, resumptions: &mut Vec<ResumeSignal>) -> OfferStep<T> {
    if self.closed {
      return OfferStep::Rejected(OfferError::Closed(item));
    }
    // Direct hand-off: an already-pending consumer bypasses the buffer and
    // the capacity check entirely.
    match self.consumers.fulfill_next(item) {
      | Ok(signal) => {
        if let Some(signal) = signal {
          resumptions.push(signal);
        }
        OfferStep::Accepted
      },
      | Err(item) => {
        if self.has_room() {
          self.buffer.push_back(item);
          self.check_bound();
          self.observers.fulfill_all(true, resumptions);
          OfferStep::Accepted
        } else {
          OfferStep::MustWait(item)
        }
      },
    }
  }

  pub(crate) fn poll_step(&mut self, resumptions: &mut Vec<ResumeSignal>) -> PollStep<T> {
    match self.buffer.pop_front() {
      | Some(item) => {
        // Capacity freed: the earliest still-parked producer makes forward
        // progress one-for-one with consumption.
        if self.has_room() {
          if let Some((refill, signal)) = self.producers.claim_next_item() {
            self.buffer.push_back(refill);
            if let Some(signal) = signal {
              resumptions.push(signal);
            }
          }
        }
        self.check_bound();
        if self.closed && self.buffer.is_empty() {
          self.observers.fulfill_all(false, resumptions);
        }
        PollStep::Item(item)
      },
      | None => {
        if self.closed {
          PollStep::Finished
        } else {
          PollStep::MustWait
        }
      },
    }
  }

  /// Transitions into the adding-completed state. Idempotent.
  pub(crate) fn close_step(&mut self, resumptions: &mut Vec<ResumeSignal>) {
    if self.closed {
      return;
    }
    self.closed = true;
    // Parked producers can never enqueue again; their items travel back to
    // the callers inside the Closed error.
    self.producers.complete_all(resumptions);
    if self.buffer.is_empty() {
      self.consumers.complete_all(resumptions);
      self.observers.fulfill_all(false, resumptions);
    } else {
      // A consumer parks only on an empty buffer, so remaining buffered
      // items imply nobody is waiting for them.
      debug_assert!(!self.consumers.has_pending());
    }
  }

  /// Returns an item that was handed to a consumer that never observed it.
  ///
  /// The item re-enters at the head so FIFO order is preserved; when another
  /// consumer is already parked it is handed over directly instead.
  pub(crate) fn restore_front(&mut self, item: T, resumptions: &mut Vec<ResumeSignal>) {
    match self.consumers.fulfill_next(item) {
      | Ok(signal) => {
        if let Some(signal) = signal {
          resumptions.push(signal);
        }
      },
      | Err(item) => {
        self.buffer.push_front(item);
        self.observers.fulfill_all(true, resumptions);
      },
    }
  }

  pub(crate) fn availability_step(&self) -> AvailabilityStep {
    if !self.buffer.is_empty() {
      AvailabilityStep::Ready(true)
    } else if self.closed {
      AvailabilityStep::Ready(false)
    } else {
      AvailabilityStep::MustWait
    }
  }

  pub(crate) fn register_producer(&mut self, waiter: Arc<Waiter<T>>) {
    self.producers.push(waiter);
  }

  pub(crate) fn register_consumer(&mut self, waiter: Arc<Waiter<T>>) {
    self.consumers.push(waiter);
  }

  pub(crate) fn register_observer(&mut self, waiter: Arc<Waiter<bool>>) {
    self.observers.push(waiter);
  }

  pub(crate) fn len(&self) -> usize {
    self.buffer.len()
  }

  pub(crate) fn capacity(&self) -> Option<usize> {
    self.capacity
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub(crate) fn is_full(&self) -> bool {
    self.capacity.map_or(false, |capacity| self.buffer.len() >= capacity)
  }

  pub(crate) fn is_closed(&self) -> bool {
    self.closed
  }

  pub(crate) fn is_completed(&self) -> bool {
    self.closed && self.buffer.is_empty()
  }
}
