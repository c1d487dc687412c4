use core::fmt;

/// Errors produced by the dequeue side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
  /// The queue is empty but still open. Returned only by the `try` forms.
  Empty,
  /// Adding has been completed and the buffer has drained; nothing will ever
  /// arrive again.
  Completed,
  /// The attached cancellation signal fired before an item arrived.
  Canceled,
}

impl fmt::Display for PollError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Empty => write!(f, "queue has no items to consume"),
      | Self::Completed => write!(f, "queue is completed and fully drained"),
      | Self::Canceled => write!(f, "dequeue canceled before an item arrived"),
    }
  }
}

impl core::error::Error for PollError {}
