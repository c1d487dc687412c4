use core::fmt;

/// Errors produced by the enqueue side.
///
/// Every variant carries the rejected item back to the caller so nothing is
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferError<T> {
  /// The queue is at capacity and the operation does not park. Returned only
  /// by the `try` forms.
  Full(T),
  /// Adding has been completed; the queue accepts nothing further.
  Closed(T),
  /// The attached cancellation signal fired before the item was accepted.
  Canceled(T),
}

impl<T> OfferError<T> {
  /// Recovers the item the queue refused.
  #[must_use]
  pub fn into_item(self) -> T {
    match self {
      | Self::Full(item) | Self::Closed(item) | Self::Canceled(item) => item,
    }
  }
}

impl<T> fmt::Display for OfferError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Full(_) => write!(f, "queue is full"),
      | Self::Closed(_) => write!(f, "queue is closed for adding"),
      | Self::Canceled(_) => write!(f, "enqueue canceled before the item was accepted"),
    }
  }
}

impl<T: fmt::Debug> core::error::Error for OfferError<T> {}
