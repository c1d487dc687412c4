use std::sync::Arc;

use super::{state::INERT_KEY, CancelRegistration, CancelState};

/// Cloneable observer handle for a [`CancelSource`](super::CancelSource).
///
/// A signal supports exactly two observations: whether the source has fired,
/// and a one-shot callback subscription that fires when it does.
pub struct CancelSignal {
  state: Arc<CancelState>,
}

impl CancelSignal {
  pub(crate) fn new(state: Arc<CancelState>) -> Self {
    Self { state }
  }

  /// Indicates whether the associated source has already fired.
  #[must_use]
  pub fn is_canceled(&self) -> bool {
    self.state.is_fired()
  }

  /// Subscribes a callback invoked at most once when the source fires.
  ///
  /// When the source has already fired the callback runs inline, before this
  /// method returns. The returned registration deregisters the callback on
  /// drop; deregistering after the callback ran is a no-op.
  pub fn subscribe<F>(&self, callback: F) -> CancelRegistration
  where
    F: FnOnce() + Send + 'static, {
    match self.state.insert(Box::new(callback)) {
      | Ok(key) => CancelRegistration::new(self.state.clone(), key),
      | Err(callback) => {
        callback();
        CancelRegistration::new(self.state.clone(), INERT_KEY)
      },
    }
  }
}

impl Clone for CancelSignal {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}
