use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

/// Latest known "connected" state, shared with everyone who cares.
pub struct Connectivity {
  tx: watch::Sender<bool>,
}

impl Connectivity {
  pub fn new(connected: bool) -> Self {
    let (tx, _) = watch::channel(connected);
    Self { tx }
  }

  /// Run `check` once to seed the initial state.
  pub async fn detect<F, Fut>(check: F) -> Self
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = bool>,
  {
    Self::new(check().await)
  }

  pub fn is_connected(&self) -> bool {
    *self.tx.borrow()
  }

  /// Publish a new state. Subscribers are only woken on actual changes.
  pub fn set(&self, connected: bool) {
    self.tx.send_if_modified(|current| {
      if *current == connected {
        return false;
      }
      *current = connected;
      info!(connected, "connectivity changed");
      true
    });
  }

  pub fn subscribe(&self) -> watch::Receiver<bool> {
    self.tx.subscribe()
  }
}

/// Re-run `check` every `every` and publish its result.
///
/// The task runs until its handle is aborted.
pub fn spawn_probe<F, Fut>(
  connectivity: std::sync::Arc<Connectivity>,
  every: Duration,
  check: F,
) -> JoinHandle<()>
where
  F: Fn() -> Fut + Send + 'static,
  Fut: Future<Output = bool> + Send,
{
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
      ticker.tick().await;
      connectivity.set(check().await);
    }
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, Ordering};
  use std::sync::Arc;

  #[tokio::test]
  async fn test_detect_seeds_state() {
    let connectivity = Connectivity::detect(|| async { false }).await;
    assert!(!connectivity.is_connected());
  }

  #[tokio::test]
  async fn test_subscribers_see_changes_only() {
    let connectivity = Connectivity::new(true);
    let mut rx = connectivity.subscribe();

    connectivity.set(true);
    assert!(!rx.has_changed().unwrap());

    connectivity.set(false);
    assert!(rx.has_changed().unwrap());
    assert!(!*rx.borrow_and_update());
  }

  #[tokio::test(start_paused = true)]
  async fn test_probe_publishes_results() {
    let connectivity = Arc::new(Connectivity::new(true));
    let mut rx = connectivity.subscribe();
    let online = Arc::new(AtomicBool::new(false));

    let flag = online.clone();
    let probe = spawn_probe(connectivity.clone(), Duration::from_secs(30), move || {
      let flag = flag.clone();
      async move { flag.load(Ordering::SeqCst) }
    });

    rx.changed().await.unwrap();
    assert!(!connectivity.is_connected());

    online.store(true, Ordering::SeqCst);
    rx.changed().await.unwrap();
    assert!(connectivity.is_connected());

    probe.abort();
  }
}
