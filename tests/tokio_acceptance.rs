//! Acceptance scenarios for the suspending handle on the tokio runtime.

use core::{
  future::Future,
  pin::pin,
  task::{Context, RawWaker, RawWakerVTable, Waker},
};
use std::time::Duration;

use drainq::{AsyncDrainQueue, CancelSource, OfferError, PollError};

fn noop_waker() -> Waker {
  const fn raw() -> RawWaker {
    RawWaker::new(core::ptr::null(), &VTABLE)
  }
  static VTABLE: RawWakerVTable = RawWakerVTable::new(|_| raw(), |_| {}, |_| {}, |_| {});
  unsafe { Waker::from_raw(raw()) }
}

/// Long enough for a spawned task to reach its suspension point.
const NUDGE: Duration = Duration::from_millis(50);

#[tokio::test]
async fn suspended_consumer_receives_a_direct_handoff() {
  let queue = AsyncDrainQueue::unbounded();

  let consumer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.poll().await })
  };
  tokio::time::sleep(NUDGE).await;

  queue.offer(7).await.unwrap();
  assert_eq!(consumer.await.unwrap(), Ok(7));
  assert!(queue.is_empty(), "a hand-off bypasses the buffer");
}

#[tokio::test]
async fn capacity_one_producer_suspends_until_consumed() {
  let queue = AsyncDrainQueue::bounded(1);
  queue.offer("a").await.unwrap();

  let producer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.offer("b").await })
  };
  tokio::time::sleep(NUDGE).await;
  assert_eq!(queue.len(), 1, "the second offer must not have landed yet");

  assert_eq!(queue.poll().await.unwrap(), "a");
  producer.await.unwrap().unwrap();
  assert_eq!(queue.poll().await.unwrap(), "b");
}

#[tokio::test]
async fn output_available_suspends_until_an_item_arrives() {
  let queue = AsyncDrainQueue::unbounded();

  let watcher = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.output_available().await })
  };
  tokio::time::sleep(NUDGE).await;
  queue.offer(3).await.unwrap();

  assert!(watcher.await.unwrap());
  assert_eq!(queue.len(), 1, "the probe must not consume");
}

#[tokio::test]
async fn output_available_resolves_false_on_completion() {
  let queue: AsyncDrainQueue<u8> = AsyncDrainQueue::unbounded();

  let watcher = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.output_available().await })
  };
  tokio::time::sleep(NUDGE).await;
  queue.close();

  assert!(!watcher.await.unwrap());
}

#[tokio::test]
async fn canceling_a_suspended_availability_probe_reports_canceled() {
  let queue: AsyncDrainQueue<u8> = AsyncDrainQueue::unbounded();
  let source = CancelSource::new();
  let signal = source.signal();

  let watcher = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.output_available_with(&signal).await })
  };
  tokio::time::sleep(NUDGE).await;
  source.cancel();

  assert_eq!(watcher.await.unwrap(), Err(PollError::Canceled));
  assert!(!queue.is_closed(), "cancellation must not touch the lifecycle");
}

#[tokio::test]
async fn canceling_a_suspended_poll_keeps_the_queue_open() {
  let queue: AsyncDrainQueue<u32> = AsyncDrainQueue::unbounded();
  let source = CancelSource::new();
  let signal = source.signal();

  let consumer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.poll_with(&signal).await })
  };
  tokio::time::sleep(NUDGE).await;
  source.cancel();

  assert_eq!(consumer.await.unwrap(), Err(PollError::Canceled));
  assert!(!queue.is_closed());

  queue.offer(9).await.unwrap();
  assert_eq!(queue.poll().await, Ok(9));
}

#[tokio::test]
async fn canceling_a_suspended_offer_returns_the_item() {
  let queue = AsyncDrainQueue::bounded(1);
  queue.offer(1).await.unwrap();
  let source = CancelSource::new();
  let signal = source.signal();

  let producer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.offer_with(2, &signal).await })
  };
  tokio::time::sleep(NUDGE).await;
  source.cancel();

  match producer.await.unwrap() {
    | Err(OfferError::Canceled(item)) => assert_eq!(item, 2),
    | other => panic!("expected Canceled, got {other:?}"),
  }
  assert_eq!(queue.poll().await, Ok(1));
}

#[tokio::test]
async fn closing_completes_suspended_consumers() {
  let queue: AsyncDrainQueue<u8> = AsyncDrainQueue::unbounded();

  let consumer = {
    let queue = queue.clone();
    tokio::spawn(async move { queue.poll().await })
  };
  tokio::time::sleep(NUDGE).await;
  queue.close();

  assert_eq!(consumer.await.unwrap(), Err(PollError::Completed));
  assert!(queue.is_completed());
}

#[tokio::test]
async fn dropping_a_pending_poll_releases_its_slot() {
  let queue = AsyncDrainQueue::unbounded();

  // The timeout abandons the suspended dequeue mid-wait.
  let elapsed = tokio::time::timeout(NUDGE, queue.poll()).await;
  assert!(elapsed.is_err());

  queue.offer(1).await.unwrap();
  assert_eq!(queue.try_poll(), Ok(1), "the dead waiter must not swallow the item");
}

#[tokio::test]
async fn dropping_a_fulfilled_but_unobserved_poll_restores_the_item() {
  let queue = AsyncDrainQueue::unbounded();

  let waker = noop_waker();
  let mut cx = Context::from_waker(&waker);
  {
    let mut pending = pin!(queue.poll());
    assert!(pending.as_mut().poll(&mut cx).is_pending());

    // The hand-off lands in the suspended consumer's slot, not the buffer.
    queue.try_offer(42).unwrap();
    assert!(queue.is_empty());
  }

  // The abandoned dequeue gave the item back.
  assert_eq!(queue.try_poll(), Ok(42));
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_and_suspending_handles_interoperate() {
  let queue = AsyncDrainQueue::bounded(2);
  let blocking = {
    let queue = queue.to_sync();
    tokio::task::spawn_blocking(move || queue.poll())
  };
  tokio::time::sleep(NUDGE).await;

  queue.offer("x").await.unwrap();
  assert_eq!(blocking.await.unwrap(), Ok("x"));
}

#[allow(deprecated)]
#[tokio::test]
async fn close_async_delegates_to_close() {
  let queue: AsyncDrainQueue<u8> = AsyncDrainQueue::unbounded();
  queue.close_async().await;
  assert!(queue.is_closed());
  assert_eq!(queue.try_poll(), Err(PollError::Completed));
}
