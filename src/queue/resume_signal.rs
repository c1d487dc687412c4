use core::task::Waker;
use std::thread::Thread;

/// Injected resumption mechanism for a parked operation.
///
/// The engine never cares which mode a caller waits in; claiming a waiter
/// extracts one of these and fires it after the queue lock is released.
pub(crate) enum ResumeSignal {
  /// A suspended future, resumed through its task waker.
  Task(Waker),
  /// A blocked OS thread, resumed by unparking it.
  Thread(Thread),
}

impl ResumeSignal {
  /// Resumes the parked party on whatever context its scheduler picks.
  pub(crate) fn resume(self) {
    match self {
      | Self::Task(waker) => waker.wake(),
      | Self::Thread(thread) => thread.unpark(),
    }
  }
}
