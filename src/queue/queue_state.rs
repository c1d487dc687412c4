use std::{collections::VecDeque, sync::Arc};

use spin::Mutex;

use super::{
  offer_error::OfferError,
  poll_error::PollError,
  queue_core::{AvailabilityStep, OfferStep, PollStep, QueueCore},
  resume_signal::ResumeSignal,
  waiter::{Claim, Waiter},
};
use crate::cancel::{CancelRegistration, CancelSignal};

/// Result of an enqueue attempt against the shared state.
pub(crate) enum OfferAttempt<T> {
  Done,
  Rejected(OfferError<T>),
  /// A producer waiter is registered; the caller parks in its own mode.
  Parked(Arc<Waiter<T>>, Option<CancelRegistration>),
}

/// Result of a dequeue attempt against the shared state.
pub(crate) enum PollAttempt<T> {
  Item(T),
  Rejected(PollError),
  Parked(Arc<Waiter<T>>, Option<CancelRegistration>),
}

/// Result of an availability probe against the shared state.
pub(crate) enum AvailabilityAttempt {
  Ready(bool),
  Canceled,
  Parked(Arc<Waiter<bool>>, Option<CancelRegistration>),
}

/// The exclusion domain of one queue instance.
///
/// Every state transition locks `core` for O(1) bookkeeping only; the lock is
/// never held across parking, and the resumption signals collected by a
/// transition are fired only after the guard is dropped.
pub(crate) struct QueueState<T> {
  core: Mutex<QueueCore<T>>,
}

fn fire_all(resumptions: Vec<ResumeSignal>) {
  for signal in resumptions {
    signal.resume();
  }
}

/// One-shot callback bridging an external cancellation signal to a waiter.
///
/// The slot claim is the arbiter: when it wins, the waiter is resumed with
/// the canceled outcome; when ordinary fulfilment got there first, the
/// callback is a no-op.
fn cancel_bridge<V: Send + 'static>(waiter: Arc<Waiter<V>>) -> impl FnOnce() + Send + 'static {
  move || {
    if let Claim::Won(signal) = waiter.cancel() {
      if let Some(signal) = signal {
        signal.resume();
      }
    }
  }
}

impl<T> QueueState<T> {
  /// Re-admits an item a consumer claimed but never observed. Called from
  /// drop glue, so it carries no bounds on `T`.
  pub(crate) fn restore_front(&self, item: T) {
    let mut resumptions = Vec::new();
    self.core.lock().restore_front(item, &mut resumptions);
    fire_all(resumptions);
  }
}

impl<T: Send + 'static> QueueState<T> {
  pub(crate) fn new(capacity: Option<usize>, seed: VecDeque<T>) -> Self {
    if let Some(capacity) = capacity {
      assert!(capacity >= 1, "bounded queue capacity must be at least 1");
      assert!(seed.len() <= capacity, "seed items exceed the queue capacity");
    }
    Self { core: Mutex::new(QueueCore::new(capacity, seed)) }
  }

  /// Non-parking enqueue primitive.
  pub(crate) fn try_offer(&self, item: T) -> Result<(), OfferError<T>> {
    let mut resumptions = Vec::new();
    let step = self.core.lock().offer_step(item, &mut resumptions);
    fire_all(resumptions);
    match step {
      | OfferStep::Accepted => Ok(()),
      | OfferStep::Rejected(error) => Err(error),
      | OfferStep::MustWait(item) => Err(OfferError::Full(item)),
    }
  }

  /// Parking enqueue primitive shared by the blocking and suspending forms.
  ///
  /// A signal already in the fired state short-circuits to the canceled
  /// outcome without the waiter ever entering the registry.
  pub(crate) fn offer_attempt(&self, item: T, signal: Option<&CancelSignal>) -> OfferAttempt<T> {
    let mut resumptions = Vec::new();
    let attempt = {
      let mut core = self.core.lock();
      match core.offer_step(item, &mut resumptions) {
        | OfferStep::Accepted => OfferAttempt::Done,
        | OfferStep::Rejected(error) => OfferAttempt::Rejected(error),
        | OfferStep::MustWait(item) => {
          if signal.is_some_and(CancelSignal::is_canceled) {
            OfferAttempt::Rejected(OfferError::Canceled(item))
          } else {
            let waiter = Arc::new(Waiter::with_item(item));
            core.register_producer(waiter.clone());
            OfferAttempt::Parked(waiter, None)
          }
        },
      }
    };
    fire_all(resumptions);
    match attempt {
      | OfferAttempt::Parked(waiter, None) => {
        let registration = signal.map(|signal| signal.subscribe(cancel_bridge(waiter.clone())));
        OfferAttempt::Parked(waiter, registration)
      },
      | other => other,
    }
  }

  /// Non-parking dequeue primitive.
  pub(crate) fn try_poll(&self) -> Result<T, PollError> {
    let mut resumptions = Vec::new();
    let step = self.core.lock().poll_step(&mut resumptions);
    fire_all(resumptions);
    match step {
      | PollStep::Item(item) => Ok(item),
      | PollStep::Finished => Err(PollError::Completed),
      | PollStep::MustWait => Err(PollError::Empty),
    }
  }

  /// Parking dequeue primitive shared by the blocking and suspending forms.
  pub(crate) fn poll_attempt(&self, signal: Option<&CancelSignal>) -> PollAttempt<T> {
    let mut resumptions = Vec::new();
    let attempt = {
      let mut core = self.core.lock();
      match core.poll_step(&mut resumptions) {
        | PollStep::Item(item) => PollAttempt::Item(item),
        | PollStep::Finished => PollAttempt::Rejected(PollError::Completed),
        | PollStep::MustWait => {
          if signal.is_some_and(CancelSignal::is_canceled) {
            PollAttempt::Rejected(PollError::Canceled)
          } else {
            let waiter = Arc::new(Waiter::new());
            core.register_consumer(waiter.clone());
            PollAttempt::Parked(waiter, None)
          }
        },
      }
    };
    fire_all(resumptions);
    match attempt {
      | PollAttempt::Parked(waiter, None) => {
        let registration = signal.map(|signal| signal.subscribe(cancel_bridge(waiter.clone())));
        PollAttempt::Parked(waiter, registration)
      },
      | other => other,
    }
  }

  /// Availability probe; parks a transient, non-consuming observer.
  pub(crate) fn availability_attempt(&self, signal: Option<&CancelSignal>) -> AvailabilityAttempt {
    let attempt = {
      let mut core = self.core.lock();
      match core.availability_step() {
        | AvailabilityStep::Ready(available) => AvailabilityAttempt::Ready(available),
        | AvailabilityStep::MustWait => {
          if signal.is_some_and(CancelSignal::is_canceled) {
            AvailabilityAttempt::Canceled
          } else {
            let waiter = Arc::new(Waiter::new());
            core.register_observer(waiter.clone());
            AvailabilityAttempt::Parked(waiter, None)
          }
        },
      }
    };
    match attempt {
      | AvailabilityAttempt::Parked(waiter, None) => {
        let registration = signal.map(|signal| signal.subscribe(cancel_bridge(waiter.clone())));
        AvailabilityAttempt::Parked(waiter, registration)
      },
      | other => other,
    }
  }

  /// Completes adding: synchronous, idempotent, never parks.
  pub(crate) fn close(&self) {
    let mut resumptions = Vec::new();
    self.core.lock().close_step(&mut resumptions);
    fire_all(resumptions);
  }

  pub(crate) fn len(&self) -> usize {
    self.core.lock().len()
  }

  pub(crate) fn capacity(&self) -> Option<usize> {
    self.core.lock().capacity()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.core.lock().is_empty()
  }

  pub(crate) fn is_full(&self) -> bool {
    self.core.lock().is_full()
  }

  pub(crate) fn is_closed(&self) -> bool {
    self.core.lock().is_closed()
  }

  pub(crate) fn is_completed(&self) -> bool {
    self.core.lock().is_completed()
  }
}
