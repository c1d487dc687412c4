use std::{collections::VecDeque, sync::Arc};

use super::{
  resume_signal::ResumeSignal,
  waiter::{Claim, Waiter},
};

/// Ordered collection of pending waiters of one kind.
///
/// Registration order is service order. Cancellation claims a waiter's slot
/// in place; the dead node is skipped and discarded by the next head pop, so
/// arbitrary-position removal stays amortized O(1) without disturbing the
/// relative order of the remainder.
pub(crate) struct WaiterRegistry<V> {
  entries: VecDeque<Arc<Waiter<V>>>,
}

impl<V> WaiterRegistry<V> {
  pub(crate) fn new() -> Self {
    Self { entries: VecDeque::new() }
  }

  pub(crate) fn push(&mut self, waiter: Arc<Waiter<V>>) {
    self.entries.push_back(waiter);
  }

  /// Fulfils the earliest still-pending waiter with `value`.
  ///
  /// Hands the value back when every registered waiter has already lost its
  /// slot to cancellation (or none is registered).
  pub(crate) fn fulfill_next(&mut self, value: V) -> Result<Option<ResumeSignal>, V> {
    let mut value = value;
    while let Some(waiter) = self.entries.pop_front() {
      match waiter.fulfill(value) {
        | Ok(signal) => return Ok(signal),
        | Err(returned) => value = returned,
      }
    }
    Err(value)
  }

  /// Claims the earliest still-pending waiter and takes its payload.
  pub(crate) fn claim_next_item(&mut self) -> Option<(V, Option<ResumeSignal>)> {
    while let Some(waiter) = self.entries.pop_front() {
      if let Some(claimed) = waiter.claim_item() {
        return Some(claimed);
      }
    }
    None
  }

  /// Claims every pending waiter with the queue-completed outcome.
  pub(crate) fn complete_all(&mut self, resumptions: &mut Vec<ResumeSignal>) {
    for waiter in self.entries.drain(..) {
      if let Claim::Won(Some(signal)) = waiter.complete() {
        resumptions.push(signal);
      }
    }
  }

  /// Fulfils every pending waiter with a clone of `value`.
  pub(crate) fn fulfill_all(&mut self, value: V, resumptions: &mut Vec<ResumeSignal>)
  where
    V: Clone, {
    for waiter in self.entries.drain(..) {
      if let Ok(Some(signal)) = waiter.fulfill(value.clone()) {
        resumptions.push(signal);
      }
    }
  }

  pub(crate) fn has_pending(&self) -> bool {
    self.entries.iter().any(|waiter| waiter.is_pending())
  }
}
