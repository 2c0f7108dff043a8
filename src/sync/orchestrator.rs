//! One fetch cycle: network when possible, cache or demo data otherwise.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::cache::{ArticleCache, HistoryLedger};
use crate::db::SharedStore;
use crate::news::{demo_articles, Article, NewsSource};
use crate::prefs::{build_sources_param, SourcePreferences};

use super::timer::RefreshTimer;

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
  /// First load when the view comes up
  Initial,
  /// Periodic refresh
  Timer,
  /// User pulled the list down
  PullToRefresh,
  /// User pressed refresh
  Manual,
}

/// Observable progress of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
  Idle,
  Fetching,
  /// Fresh articles were fetched and persisted
  Success,
  /// Cached or demo articles are being shown
  Fallback,
}

/// Where the articles of a cycle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleOrigin {
  Network,
  Cache,
  Demo,
}

/// Result of one cycle, ready to display.
#[derive(Debug, Clone)]
pub struct CycleOutcome {
  pub trigger: Trigger,
  pub articles: Vec<Article>,
  pub is_demo: bool,
  pub origin: ArticleOrigin,
}

impl CycleOutcome {
  fn new(trigger: Trigger, articles: Vec<Article>, origin: ArticleOrigin) -> Self {
    Self {
      trigger,
      articles,
      is_demo: origin == ArticleOrigin::Demo,
      origin,
    }
  }
}

/// Decides, per trigger, whether to call the news source and how to fall
/// back when it can't.
///
/// Cycles are not serialized against each other: a manual refresh may race
/// the timer, and whichever write lands last wins.
pub struct SyncOrchestrator {
  news: Arc<dyn NewsSource>,
  cache: ArticleCache,
  history: HistoryLedger,
  prefs: SourcePreferences,
  connectivity: watch::Receiver<bool>,
  page_size: u32,
  state: watch::Sender<SyncState>,
}

impl SyncOrchestrator {
  pub fn new(
    store: SharedStore,
    news: Arc<dyn NewsSource>,
    connectivity: watch::Receiver<bool>,
    page_size: u32,
  ) -> Self {
    let (state, _) = watch::channel(SyncState::Idle);
    Self {
      news,
      cache: ArticleCache::new(store.clone()),
      history: HistoryLedger::new(store.clone()),
      prefs: SourcePreferences::new(store),
      connectivity,
      page_size,
      state,
    }
  }

  pub fn state(&self) -> SyncState {
    *self.state.borrow()
  }

  /// Watch state transitions, e.g. to show a syncing indicator.
  pub fn subscribe_state(&self) -> watch::Receiver<SyncState> {
    self.state.subscribe()
  }

  /// Run a full cycle. Never fails: the worst case is the demo set.
  ///
  /// Any cache and history writes of the cycle have completed when this
  /// returns.
  pub async fn run_cycle(&self, trigger: Trigger) -> CycleOutcome {
    self.state.send_replace(SyncState::Fetching);
    let connected = *self.connectivity.borrow();
    debug!(?trigger, connected, "sync cycle started");

    let outcome = if connected {
      self.fetch_online(trigger).await
    } else {
      self.read_offline(trigger).await
    };

    let settled = match outcome.origin {
      ArticleOrigin::Network => SyncState::Success,
      ArticleOrigin::Cache | ArticleOrigin::Demo => SyncState::Fallback,
    };
    self.state.send_replace(settled);
    debug!(
      ?trigger,
      origin = ?outcome.origin,
      count = outcome.articles.len(),
      "sync cycle finished"
    );
    self.state.send_replace(SyncState::Idle);

    outcome
  }

  /// Offline: cache, else demo. Demo data is not persisted here so a
  /// still-valid snapshot is never replaced by placeholders.
  async fn read_offline(&self, trigger: Trigger) -> CycleOutcome {
    match self.cache.load_snapshot().await {
      Some(articles) => CycleOutcome::new(trigger, articles, ArticleOrigin::Cache),
      None => CycleOutcome::new(trigger, demo_articles(Utc::now()), ArticleOrigin::Demo),
    }
  }

  async fn fetch_online(&self, trigger: Trigger) -> CycleOutcome {
    let selected = self.prefs.load_selected().await;
    let sources = build_sources_param(&selected);

    match self
      .news
      .top_headlines(sources.as_deref(), self.page_size)
      .await
    {
      Ok(articles) if !articles.is_empty() => {
        self.cache.save_snapshot(&articles).await;
        self.history.record_fetch(&articles).await;
        info!(count = articles.len(), sources = ?sources, "briefing synced");
        CycleOutcome::new(trigger, articles, ArticleOrigin::Network)
      }
      Ok(_) => {
        warn!("news source returned no articles");
        self.fall_back_online(trigger).await
      }
      Err(e) => {
        warn!(error = %e, "news fetch failed");
        self.fall_back_online(trigger).await
      }
    }
  }

  /// Online but the source failed: cache, else demo. Here the demo set is
  /// persisted so the next offline start has something to show.
  async fn fall_back_online(&self, trigger: Trigger) -> CycleOutcome {
    if let Some(articles) = self.cache.load_snapshot().await {
      return CycleOutcome::new(trigger, articles, ArticleOrigin::Cache);
    }

    let demo = demo_articles(Utc::now());
    self.cache.save_snapshot(&demo).await;
    self.history.record_fetch(&demo).await;
    CycleOutcome::new(trigger, demo, ArticleOrigin::Demo)
  }

  /// Start re-running cycles every `every`, sending each outcome to
  /// `outcomes`. Dropping or stopping the returned handle ends the timer.
  pub fn start_refresh_timer(
    self: &Arc<Self>,
    every: Duration,
    outcomes: mpsc::UnboundedSender<CycleOutcome>,
  ) -> RefreshTimer {
    RefreshTimer::start(Arc::clone(self), every, outcomes)
  }
}
