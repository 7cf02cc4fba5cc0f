//! A restartable single-shot delay, built on a background tokio task.

use std::time::Duration;

use futures_executor::block_on;
use tokio::{
  sync::mpsc::{
    self,
    Sender,
    error::TrySendError,
  },
  time::Instant,
};

/// Upper bound on how long [`send_blocking`] may stall the caller when the
/// hook's channel is full. Dropping an event is preferable to a visible
/// hitch in the UI thread.
const SEND_TIMEOUT: Duration = Duration::from_millis(2);

/// A debounced event consumer.
///
/// Implementors receive every event immediately via [`handle_event`] and
/// decide whether to act now, (re)arm a deadline, or cancel a pending one.
/// When an armed deadline expires with no further events,
/// [`finish_debounce`] runs exactly once and the hook returns to idle.
///
/// Re-arming always *replaces* the previous deadline; a burst of events
/// produces a single firing, never a queue of them.
///
/// [`handle_event`]: AsyncHook::handle_event
/// [`finish_debounce`]: AsyncHook::finish_debounce
pub trait AsyncHook: Sync + Send + 'static + Sized {
  type Event: Sync + Send + 'static;

  /// React to an incoming event. `deadline` is the currently armed deadline,
  /// if any. Return the deadline that should be armed afterwards, or `None`
  /// to leave the hook idle (cancelling any pending firing).
  fn handle_event(&mut self, event: Self::Event, deadline: Option<Instant>) -> Option<Instant>;

  /// Runs once per expired deadline.
  fn finish_debounce(&mut self);

  /// Spawn the hook onto the current tokio runtime and return the sender
  /// used to feed it events. Dropping every sender stops the task, which
  /// discards any pending deadline without firing it.
  fn spawn(self) -> mpsc::Sender<Self::Event> {
    // Generous capacity: the task drains events as fast as they arrive, but
    // rapid typing should never hit the send timeout.
    let (tx, rx) = mpsc::channel(128);
    // Outside a runtime (plain unit tests) the hook is inert; the sender
    // still works, events just go nowhere.
    if tokio::runtime::Handle::try_current().is_ok() {
      tokio::spawn(run(self, rx));
    }
    tx
  }
}

async fn run<Hook: AsyncHook>(mut hook: Hook, mut rx: mpsc::Receiver<Hook::Event>) {
  let mut deadline = None;
  loop {
    let event = match deadline {
      Some(armed) => match tokio::time::timeout_at(armed, rx.recv()).await {
        Ok(event) => event,
        Err(_) => {
          hook.finish_debounce();
          deadline = None;
          continue;
        },
      },
      None => rx.recv().await,
    };
    let Some(event) = event else {
      break;
    };
    deadline = hook.handle_event(event, deadline);
  }
}

/// Send an event to a hook from synchronous code.
///
/// Tries a non-blocking send first; if the channel is full, waits at most
/// [`SEND_TIMEOUT`] and then drops the event. A dropped event only delays
/// a debounced action until the next trigger, so this trade is safe.
pub fn send_blocking<T>(tx: &Sender<T>, event: T) {
  match tx.try_send(event) {
    Ok(()) => {},
    Err(TrySendError::Full(event)) => {
      let _ = block_on(tx.send_timeout(event, SEND_TIMEOUT));
    },
    Err(TrySendError::Closed(_)) => {
      log::warn!("event dropped: hook channel is closed");
    },
  }
}

/// Non-blocking send. Returns whether the event was accepted.
pub fn try_send<T>(tx: &Sender<T>, event: T) -> bool {
  tx.try_send(event).is_ok()
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{
      AtomicUsize,
      Ordering,
    },
  };

  use super::*;

  const QUIET: Duration = Duration::from_millis(50);

  enum Trigger {
    Arm,
    Cancel,
  }

  struct Counting {
    fired: Arc<AtomicUsize>,
  }

  impl AsyncHook for Counting {
    type Event = Trigger;

    fn handle_event(&mut self, event: Trigger, _deadline: Option<Instant>) -> Option<Instant> {
      match event {
        Trigger::Arm => Some(Instant::now() + QUIET),
        Trigger::Cancel => None,
      }
    }

    fn finish_debounce(&mut self) {
      self.fired.fetch_add(1, Ordering::SeqCst);
    }
  }

  fn spawn_counting() -> (mpsc::Sender<Trigger>, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let tx = Counting {
      fired: fired.clone(),
    }
    .spawn();
    (tx, fired)
  }

  #[tokio::test(start_paused = true)]
  async fn burst_fires_once() {
    let (tx, fired) = spawn_counting();
    for _ in 0..5 {
      tx.send(Trigger::Arm).await.unwrap();
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    tokio::time::sleep(QUIET * 2).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn rearming_extends_the_deadline() {
    let (tx, fired) = spawn_counting();
    tx.send(Trigger::Arm).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    tx.send(Trigger::Arm).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;
    // Neither window has elapsed uninterrupted yet.
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[tokio::test(start_paused = true)]
  async fn cancel_discards_pending_deadline() {
    let (tx, fired) = spawn_counting();
    tx.send(Trigger::Arm).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    tx.send(Trigger::Cancel).await.unwrap();
    tokio::time::sleep(QUIET * 4).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn try_send_reports_capacity() {
    let (tx, _rx) = mpsc::channel(1);
    assert!(try_send(&tx, Trigger::Arm));
    assert!(!try_send(&tx, Trigger::Arm));
  }

  #[test]
  fn full_channel_fallback_works_from_an_entered_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
      .enable_all()
      .build()
      .unwrap();
    let _enter = runtime.enter();
    let (tx, mut rx) = mpsc::channel(1);
    assert!(try_send(&tx, Trigger::Arm));
    // Channel full: the bounded wait must time out and drop the event,
    // not panic for want of a timer.
    send_blocking(&tx, Trigger::Arm);
    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err());
  }

  #[tokio::test(start_paused = true)]
  async fn idle_after_firing() {
    let (tx, fired) = spawn_counting();
    tx.send(Trigger::Arm).await.unwrap();
    tokio::time::sleep(QUIET * 2).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    // No retrigger, no second firing.
    tokio::time::sleep(QUIET * 4).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    tx.send(Trigger::Arm).await.unwrap();
    tokio::time::sleep(QUIET * 2).await;
    assert_eq!(fired.load(Ordering::SeqCst), 2);
  }
}
