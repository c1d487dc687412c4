use super::sync_queue::SyncDrainQueue;
use crate::cancel::CancelSignal;

/// Lazy, finite-until-completion view over a queue's items.
///
/// Each step invokes the blocking dequeue, so concurrent iterations over the
/// same queue compete for items rather than duplicating them. The iterator
/// ends once the queue reports completion, or once its attached cancellation
/// signal fires.
pub struct ConsumingIter<'a, T> {
  queue:  &'a SyncDrainQueue<T>,
  signal: Option<CancelSignal>,
}

impl<'a, T: Send + 'static> ConsumingIter<'a, T> {
  pub(crate) fn new(queue: &'a SyncDrainQueue<T>, signal: Option<CancelSignal>) -> Self {
    Self { queue, signal }
  }
}

impl<T: Send + 'static> Iterator for ConsumingIter<'_, T> {
  type Item = T;

  fn next(&mut self) -> Option<T> {
    let polled = match &self.signal {
      | Some(signal) => self.queue.poll_with(signal),
      | None => self.queue.poll(),
    };
    polled.ok()
  }
}
