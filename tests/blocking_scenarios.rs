//! End-to-end scenarios for the blocking handle.

use std::{sync::mpsc, thread, time::Duration};

use drainq::{CancelSource, OfferError, PollError, SyncDrainQueue};

/// Long enough for a spawned thread to reach its parking point.
const NUDGE: Duration = Duration::from_millis(50);
const JOIN_LIMIT: Duration = Duration::from_secs(5);

#[test]
fn capacity_one_producer_blocks_until_consumed() {
  let queue = SyncDrainQueue::bounded(1);
  queue.offer("a").unwrap();

  let producer = {
    let queue = queue.clone();
    thread::spawn(move || queue.offer("b"))
  };
  thread::sleep(NUDGE);
  assert_eq!(queue.len(), 1, "the second offer must not have landed yet");

  assert_eq!(queue.poll().unwrap(), "a");
  producer.join().unwrap().unwrap();
  assert_eq!(queue.poll().unwrap(), "b");
}

#[test]
fn consumers_are_served_in_registration_order() {
  let queue = SyncDrainQueue::unbounded();
  let (reports, arrivals) = mpsc::channel();

  let first = {
    let queue = queue.clone();
    let reports = reports.clone();
    thread::spawn(move || reports.send(("c1", queue.poll().unwrap())).unwrap())
  };
  thread::sleep(NUDGE);
  let second = {
    let queue = queue.clone();
    let reports = reports.clone();
    thread::spawn(move || reports.send(("c2", queue.poll().unwrap())).unwrap())
  };
  thread::sleep(NUDGE);

  queue.offer(1).unwrap();
  assert_eq!(arrivals.recv_timeout(JOIN_LIMIT).unwrap(), ("c1", 1));

  queue.offer(2).unwrap();
  assert_eq!(arrivals.recv_timeout(JOIN_LIMIT).unwrap(), ("c2", 2));

  first.join().unwrap();
  second.join().unwrap();
}

#[test]
fn close_releases_parked_producers_with_their_items() {
  let queue = SyncDrainQueue::bounded(1);
  queue.offer(1).unwrap();

  let producer = {
    let queue = queue.clone();
    thread::spawn(move || queue.offer(2))
  };
  thread::sleep(NUDGE);
  queue.close();

  match producer.join().unwrap() {
    | Err(OfferError::Closed(item)) => assert_eq!(item, 2),
    | other => panic!("expected Closed, got {other:?}"),
  }

  // The buffered item still drains; the discarded one never appears.
  assert_eq!(queue.poll().unwrap(), 1);
  assert_eq!(queue.poll(), Err(PollError::Completed));
}

#[test]
fn close_releases_parked_consumers_once_drained() {
  let queue: SyncDrainQueue<u8> = SyncDrainQueue::unbounded();

  let consumer = {
    let queue = queue.clone();
    thread::spawn(move || queue.poll())
  };
  thread::sleep(NUDGE);
  queue.close();

  assert_eq!(consumer.join().unwrap(), Err(PollError::Completed));
  assert!(queue.is_completed());
}

#[test]
fn canceling_a_parked_consumer_leaves_the_queue_usable() {
  let queue: SyncDrainQueue<u32> = SyncDrainQueue::unbounded();
  let source = CancelSource::new();
  let signal = source.signal();

  let consumer = {
    let queue = queue.clone();
    thread::spawn(move || queue.poll_with(&signal))
  };
  thread::sleep(NUDGE);
  source.cancel();

  assert_eq!(consumer.join().unwrap(), Err(PollError::Canceled));
  assert!(!queue.is_closed());

  queue.offer(9).unwrap();
  assert_eq!(queue.poll().unwrap(), 9);
}

#[test]
fn canceling_a_parked_producer_returns_the_item() {
  let queue = SyncDrainQueue::bounded(1);
  queue.offer(1).unwrap();
  let source = CancelSource::new();
  let signal = source.signal();

  let producer = {
    let queue = queue.clone();
    thread::spawn(move || queue.offer_with(2, &signal))
  };
  thread::sleep(NUDGE);
  source.cancel();

  match producer.join().unwrap() {
    | Err(OfferError::Canceled(item)) => assert_eq!(item, 2),
    | other => panic!("expected Canceled, got {other:?}"),
  }

  // The rest of the queue is undisturbed.
  assert_eq!(queue.len(), 1);
  assert_eq!(queue.poll().unwrap(), 1);
  assert_eq!(queue.try_poll(), Err(PollError::Empty));
}

#[test]
fn concurrent_consuming_iterations_split_the_items() {
  let queue = SyncDrainQueue::unbounded();

  let drainers: Vec<_> = (0..2)
    .map(|_| {
      let queue = queue.clone();
      thread::spawn(move || queue.consuming_iter().collect::<Vec<u32>>())
    })
    .collect();

  for value in 0..100 {
    queue.offer(value).unwrap();
  }
  queue.close();

  let mut seen = Vec::new();
  for drainer in drainers {
    let taken = drainer.join().unwrap();
    // Each iteration observes a FIFO subsequence.
    assert!(taken.windows(2).all(|pair| pair[0] < pair[1]));
    seen.extend(taken);
  }
  seen.sort_unstable();
  assert_eq!(seen, (0..100).collect::<Vec<_>>());
}

#[test]
fn fired_signal_ends_a_consuming_iteration() {
  let queue = SyncDrainQueue::unbounded();
  queue.offer(1).unwrap();
  queue.offer(2).unwrap();
  let source = CancelSource::new();
  let signal = source.signal();

  let drainer = {
    let queue = queue.clone();
    thread::spawn(move || queue.consuming_iter_with(signal).collect::<Vec<u32>>())
  };
  thread::sleep(NUDGE);
  source.cancel();

  // The iteration drained what was buffered, then ended instead of parking.
  assert_eq!(drainer.join().unwrap(), vec![1, 2]);
  assert!(!queue.is_closed(), "cancellation must not close the queue");
}

#[test]
fn output_available_wakes_on_the_first_item() {
  let queue = SyncDrainQueue::unbounded();

  let watcher = {
    let queue = queue.clone();
    thread::spawn(move || queue.output_available())
  };
  thread::sleep(NUDGE);
  queue.offer(5).unwrap();

  assert!(watcher.join().unwrap());
  assert_eq!(queue.len(), 1, "the probe must not consume");
}

#[test]
fn canceling_a_parked_availability_probe_reports_canceled() {
  let queue: SyncDrainQueue<u8> = SyncDrainQueue::unbounded();
  let source = CancelSource::new();
  let signal = source.signal();

  let watcher = {
    let queue = queue.clone();
    thread::spawn(move || queue.output_available_with(&signal))
  };
  thread::sleep(NUDGE);
  source.cancel();

  assert_eq!(watcher.join().unwrap(), Err(PollError::Canceled));
  assert!(!queue.is_closed(), "cancellation must not touch the lifecycle");
}

#[test]
fn output_available_reports_false_after_completion() {
  let queue: SyncDrainQueue<u8> = SyncDrainQueue::unbounded();

  let watcher = {
    let queue = queue.clone();
    thread::spawn(move || queue.output_available())
  };
  thread::sleep(NUDGE);
  queue.close();

  assert!(!watcher.join().unwrap());
}
