use std::sync::Arc;

use super::{CancelSignal, CancelState};

/// Owning side of a one-shot cancellation signal.
///
/// Dropping the source does not cancel; only [`CancelSource::cancel`] fires
/// the signal, and it fires at most once regardless of how many times it is
/// called.
pub struct CancelSource {
  state: Arc<CancelState>,
}

impl CancelSource {
  /// Creates a new, unfired cancellation source.
  #[must_use]
  pub fn new() -> Self {
    Self { state: Arc::new(CancelState::new()) }
  }

  /// Returns an observer handle bound to this source.
  #[must_use]
  pub fn signal(&self) -> CancelSignal {
    CancelSignal::new(self.state.clone())
  }

  /// Indicates whether the source has already fired.
  #[must_use]
  pub fn is_canceled(&self) -> bool {
    self.state.is_fired()
  }

  /// Fires the signal, invoking every subscribed callback exactly once.
  ///
  /// Callbacks run on the calling thread, outside the subscription lock, so
  /// a callback may itself subscribe or drop registrations freely.
  pub fn cancel(&self) {
    for callback in self.state.fire() {
      callback();
    }
  }
}

impl Default for CancelSource {
  fn default() -> Self {
    Self::new()
  }
}
