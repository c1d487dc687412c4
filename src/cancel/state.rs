use portable_atomic::{AtomicBool, Ordering};
use spin::Mutex;

type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Key reserved for registrations that never entered the table.
pub(crate) const INERT_KEY: u64 = 0;

/// Shared state behind a cancellation source and its signal handles.
pub(crate) struct CancelState {
  fired:     AtomicBool,
  callbacks: Mutex<CallbackTable>,
}

struct CallbackTable {
  next_key: u64,
  entries:  Vec<(u64, Callback)>,
}

impl CancelState {
  pub(crate) fn new() -> Self {
    Self {
      fired:     AtomicBool::new(false),
      callbacks: Mutex::new(CallbackTable { next_key: INERT_KEY + 1, entries: Vec::new() }),
    }
  }

  pub(crate) fn is_fired(&self) -> bool {
    self.fired.load(Ordering::Acquire)
  }

  /// Marks the state as fired and returns the callbacks to invoke.
  ///
  /// Later calls observe the already-fired flag and drain nothing, so every
  /// callback runs at most once.
  pub(crate) fn fire(&self) -> Vec<Callback> {
    if self.fired.swap(true, Ordering::AcqRel) {
      return Vec::new();
    }
    let mut table = self.callbacks.lock();
    let entries = core::mem::take(&mut table.entries);
    entries.into_iter().map(|(_, callback)| callback).collect()
  }

  /// Inserts a callback and returns its removal key, or gives the callback
  /// back when the state fired before the insertion could happen.
  pub(crate) fn insert(&self, callback: Callback) -> Result<u64, Callback> {
    let mut table = self.callbacks.lock();
    if self.fired.load(Ordering::Acquire) {
      return Err(callback);
    }
    let key = table.next_key;
    table.next_key += 1;
    table.entries.push((key, callback));
    Ok(key)
  }

  pub(crate) fn remove(&self, key: u64) {
    if key == INERT_KEY {
      return;
    }
    let mut table = self.callbacks.lock();
    if let Some(position) = table.entries.iter().position(|(entry_key, _)| *entry_key == key) {
      let _ = table.entries.remove(position);
    }
  }
}
