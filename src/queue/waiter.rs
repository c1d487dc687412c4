use core::task::{Context, Poll};
use std::thread;

use portable_atomic::{AtomicU8, Ordering};
use spin::Mutex;

use super::resume_signal::ResumeSignal;


const STATE_PENDING: u8 = 0;
const STATE_FULFILLED: u8 = 1;
const STATE_COMPLETED: u8 = 2;
const STATE_CANCELED: u8 = 3;

/// Result of attempting to claim a waiter's single-assignment slot.
pub(crate) enum Claim {
  /// Another path already wrote the slot; the attempt had no effect.
  Lost,
  /// The slot was claimed; carries the resumption signal if one was parked.
  Won(Option<ResumeSignal>),
}

/// Final state read by the parked party once its slot has been claimed.
pub(crate) enum WaiterOutcome<V> {
  Fulfilled(Option<V>),
  Completed(Option<V>),
  Canceled(Option<V>),
}

/// A single parked operation: one write-once result slot, one payload cell,
/// and one resumption handle.
///
/// Producers park with the cell full (the item travels inside the waiter);
/// consumers park with it empty and fulfilment writes the item. The slot
/// state is decided by one compare-exchange, so ordinary fulfilment, queue
/// completion, and cancellation race deterministically: exactly one wins and
/// the losers observe a no-op.
pub(crate) struct Waiter<V> {
  state:  AtomicU8,
  cell:   Mutex<Option<V>>,
  signal: Mutex<Option<ResumeSignal>>,
}

impl<V> Waiter<V> {
  /// Creates a waiter with an empty payload cell (consumer or observer side).
  pub(crate) fn new() -> Self {
    Self { state: AtomicU8::new(STATE_PENDING), cell: Mutex::new(None), signal: Mutex::new(None) }
  }

  /// Creates a waiter carrying a payload (producer side).
  pub(crate) fn with_item(item: V) -> Self {
    Self { state: AtomicU8::new(STATE_PENDING), cell: Mutex::new(Some(item)), signal: Mutex::new(None) }
  }

  pub(crate) fn is_pending(&self) -> bool {
    self.state.load(Ordering::Acquire) == STATE_PENDING
  }

  fn claim(&self, next: u8) -> Claim {
    if self.state.compare_exchange(STATE_PENDING, next, Ordering::AcqRel, Ordering::Acquire).is_err() {
      return Claim::Lost;
    }
    Claim::Won(self.signal.lock().take())
  }

  /// Fulfils the waiter with `value`, handing the value back on a lost race.
  pub(crate) fn fulfill(&self, value: V) -> Result<Option<ResumeSignal>, V> {
    let mut cell = self.cell.lock();
    if self.state.compare_exchange(STATE_PENDING, STATE_FULFILLED, Ordering::AcqRel, Ordering::Acquire).is_err() {
      return Err(value);
    }
    *cell = Some(value);
    drop(cell);
    Ok(self.signal.lock().take())
  }

  /// Claims the waiter as fulfilled and takes its payload (producer side).
  pub(crate) fn claim_item(&self) -> Option<(V, Option<ResumeSignal>)> {
    let mut cell = self.cell.lock();
    if self.state.compare_exchange(STATE_PENDING, STATE_FULFILLED, Ordering::AcqRel, Ordering::Acquire).is_err() {
      return None;
    }
    let item = cell.take();
    drop(cell);
    let signal = self.signal.lock().take();
    match item {
      | Some(item) => Some((item, signal)),
      | None => unreachable!("pending producer waiter must carry its item"),
    }
  }

  /// Claims the waiter with the queue-completed outcome.
  pub(crate) fn complete(&self) -> Claim {
    self.claim(STATE_COMPLETED)
  }

  /// Claims the waiter with the canceled outcome.
  pub(crate) fn cancel(&self) -> Claim {
    self.claim(STATE_CANCELED)
  }

  /// Reads the final outcome and takes whatever payload the winner left.
  ///
  /// Must only be called after the slot has been claimed.
  pub(crate) fn outcome(&self) -> WaiterOutcome<V> {
    let payload = self.cell.lock().take();
    match self.state.load(Ordering::Acquire) {
      | STATE_FULFILLED => WaiterOutcome::Fulfilled(payload),
      | STATE_COMPLETED => WaiterOutcome::Completed(payload),
      | STATE_CANCELED => WaiterOutcome::Canceled(payload),
      | _ => unreachable!("waiter outcome read before its slot was claimed"),
    }
  }

  /// Polls for slot claim, registering the task waker while pending.
  pub(crate) fn poll_claimed(&self, cx: &mut Context<'_>) -> Poll<()> {
    if self.state.load(Ordering::Acquire) != STATE_PENDING {
      return Poll::Ready(());
    }
    *self.signal.lock() = Some(ResumeSignal::Task(cx.waker().clone()));
    if self.state.load(Ordering::Acquire) != STATE_PENDING {
      Poll::Ready(())
    } else {
      Poll::Pending
    }
  }

  /// Parks the calling thread until the slot is claimed.
  pub(crate) fn block_until_claimed(&self) {
    *self.signal.lock() = Some(ResumeSignal::Thread(thread::current()));
    while self.state.load(Ordering::Acquire) == STATE_PENDING {
      thread::park();
    }
  }
}
