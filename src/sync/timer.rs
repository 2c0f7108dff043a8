use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::orchestrator::{CycleOutcome, SyncOrchestrator, Trigger};

/// Owned handle to the periodic refresh.
///
/// Stopping (or dropping) the handle ends the schedule. A cycle that is
/// already running finishes on its own; if its receiver is gone by then the
/// outcome is discarded.
pub struct RefreshTimer {
  handle: JoinHandle<()>,
  every: Duration,
}

impl RefreshTimer {
  pub(crate) fn start(
    orchestrator: Arc<SyncOrchestrator>,
    every: Duration,
    outcomes: mpsc::UnboundedSender<CycleOutcome>,
  ) -> Self {
    let handle = tokio::spawn(async move {
      let mut ticker = interval_at(Instant::now() + every, every);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

      loop {
        ticker.tick().await;
        debug!("refresh timer fired");

        // Each cycle runs detached so stopping the timer never cuts one short.
        let orchestrator = Arc::clone(&orchestrator);
        let outcomes = outcomes.clone();
        tokio::spawn(async move {
          let outcome = orchestrator.run_cycle(Trigger::Timer).await;
          if outcomes.send(outcome).is_err() {
            debug!("refresh outcome dropped, receiver gone");
          }
        });
      }
    });

    Self { handle, every }
  }

  pub fn interval(&self) -> Duration {
    self.every
  }

  pub fn is_running(&self) -> bool {
    !self.handle.is_finished()
  }

  pub fn stop(self) {
    // Drop does the work
  }
}

impl Drop for RefreshTimer {
  fn drop(&mut self) {
    self.handle.abort();
  }
}
