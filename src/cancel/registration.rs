use std::sync::Arc;

use super::CancelState;

/// Subscription handle returned by [`CancelSignal::subscribe`](super::CancelSignal::subscribe).
///
/// Dropping the registration removes the callback if it has not fired yet;
/// an already-fired or inert registration drops without effect.
pub struct CancelRegistration {
  state: Arc<CancelState>,
  key:   u64,
}

impl CancelRegistration {
  pub(crate) fn new(state: Arc<CancelState>, key: u64) -> Self {
    Self { state, key }
  }
}

impl Drop for CancelRegistration {
  fn drop(&mut self) {
    self.state.remove(self.key);
  }
}
