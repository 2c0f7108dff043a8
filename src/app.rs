use crate::cache::{ArticleCache, CacheInspector, HistoryLedger};
use crate::commands::{Command, FavoritesCommand, SourcesCommand};
use crate::config::Config;
use crate::dates::{relative_age, today_formatted};
use crate::db::{MemoryStore, SharedStore, SqliteStore};
use crate::favorites::Favorites;
use crate::locale::Locale;
use crate::news::{types::parse_timestamp, Article, ArticleFilter, NewsClient};
use crate::prefs::{sources_for, SourcePreferences};
use crate::sync::{spawn_probe, ArticleOrigin, Connectivity, CycleOutcome, SyncOrchestrator, Trigger};
use chrono::Local;
use color_eyre::{eyre::eyre, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// Command-line front end: owns the store, the client and, in watch mode,
/// the refresh timer.
pub struct App {
  config: Config,
  locale: Locale,
  store: SharedStore,
  client: NewsClient,
}

impl App {
  pub fn new(config: Config, ephemeral: bool) -> Result<Self> {
    let store: SharedStore = if ephemeral {
      Arc::new(MemoryStore::new())
    } else {
      match &config.database {
        Some(path) => Arc::new(SqliteStore::open_at(path)?),
        None => Arc::new(SqliteStore::open()?),
      }
    };

    let client = NewsClient::new(&config.news, Config::get_api_token())?;

    Ok(Self {
      locale: config.locale,
      config,
      store,
      client,
    })
  }

  pub async fn run(&self, command: Command) -> Result<()> {
    match command {
      Command::Fetch { offline, filter } => self.fetch(offline, &filter.to_filter()).await,
      Command::Watch { filter } => self.watch(&filter.to_filter()).await,
      Command::Cached { filter } => self.show_cached(&filter.to_filter()).await,
      Command::History => self.show_history().await,
      Command::Stats => self.show_stats().await,
      Command::Sources(cmd) => self.sources(cmd).await,
      Command::Favorites(cmd) => self.favorites(cmd).await,
    }
  }

  fn orchestrator(&self, connectivity: &Connectivity) -> SyncOrchestrator {
    SyncOrchestrator::new(
      self.store.clone(),
      Arc::new(self.client.clone()),
      connectivity.subscribe(),
      self.config.news.page_size,
    )
  }

  async fn detect_connectivity(&self) -> Connectivity {
    let client = self.client.clone();
    Connectivity::detect(|| async move { client.is_reachable().await }).await
  }

  async fn fetch(&self, offline: bool, filter: &ArticleFilter) -> Result<()> {
    let connectivity = if offline {
      Connectivity::new(false)
    } else {
      self.detect_connectivity().await
    };

    let outcome = self
      .orchestrator(&connectivity)
      .run_cycle(Trigger::Manual)
      .await;
    self
      .print_outcome(&outcome, connectivity.is_connected(), filter)
      .await;
    Ok(())
  }

  async fn watch(&self, filter: &ArticleFilter) -> Result<()> {
    let connectivity = Arc::new(self.detect_connectivity().await);
    let mut connected_rx = connectivity.subscribe();

    let client = self.client.clone();
    let probe = spawn_probe(
      connectivity.clone(),
      self.config.probe_interval(),
      move || {
        let client = client.clone();
        async move { client.is_reachable().await }
      },
    );

    let orchestrator = Arc::new(self.orchestrator(&connectivity));
    let outcome = orchestrator.run_cycle(Trigger::Initial).await;
    self
      .print_outcome(&outcome, connectivity.is_connected(), filter)
      .await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let timer = orchestrator.start_refresh_timer(self.config.refresh_interval(), tx);
    info!(interval_secs = timer.interval().as_secs(), "watching for updates");

    loop {
      tokio::select! {
        Some(outcome) = rx.recv() => {
          self
            .print_outcome(&outcome, connectivity.is_connected(), filter)
            .await;
        }
        Ok(()) = connected_rx.changed() => {
          let connected = *connected_rx.borrow_and_update();
          println!("{}", connection_banner(connected, self.locale));
        }
        _ = tokio::signal::ctrl_c() => break,
      }
    }

    timer.stop();
    probe.abort();
    Ok(())
  }

  async fn print_outcome(&self, outcome: &CycleOutcome, connected: bool, filter: &ArticleFilter) {
    println!("{}", today_formatted(self.locale));
    if !connected {
      println!("{}", connection_banner(false, self.locale));
    }
    match outcome.origin {
      ArticleOrigin::Demo => println!("{}", demo_banner(self.locale)),
      ArticleOrigin::Cache => {
        let synced = ArticleCache::new(self.store.clone()).last_sync_time().await;
        println!("{}", sync_line(synced.map(|t| relative_age(t, self.locale)), self.locale));
      }
      ArticleOrigin::Network => {}
    }
    println!();
    self.print_articles(&outcome.articles, filter);
    println!();
  }

  fn print_articles(&self, articles: &[Article], filter: &ArticleFilter) {
    let shown = filter.apply(articles);
    if shown.is_empty() && !filter.is_empty() {
      println!("{}", no_match(self.locale));
    }
    for article in shown {
      self.print_article(article);
    }
  }

  fn print_article(&self, article: &Article) {
    let age = article
      .published()
      .map(|t| relative_age(t, self.locale))
      .unwrap_or_default();
    let category = article.category_info();
    println!("  * {}", article.title);
    println!(
      "    {} {} | {} | {}",
      category.emoji(),
      category.label(self.locale),
      article.source.name,
      age
    );
    if !article.url.is_empty() {
      println!("    {}", article.url);
    }
  }

  async fn show_cached(&self, filter: &ArticleFilter) -> Result<()> {
    let cache = ArticleCache::new(self.store.clone());
    let Some(articles) = cache.load_snapshot().await else {
      println!("{}", sync_line(None, self.locale));
      return Ok(());
    };

    let synced = cache.last_sync_time().await;
    println!("{}", sync_line(synced.map(|t| relative_age(t, self.locale)), self.locale));
    println!();
    self.print_articles(&articles, filter);
    Ok(())
  }

  async fn show_history(&self) -> Result<()> {
    let ledger = HistoryLedger::new(self.store.clone()).load().await;
    if ledger.is_empty() {
      println!("{}", empty_history(self.locale));
      return Ok(());
    }

    for section in HistoryLedger::sections(&ledger, self.locale, Local::now()) {
      println!("{} ({})", section.label, section.articles.len());
      for article in &section.articles {
        let age = article
          .published_at
          .as_deref()
          .and_then(parse_timestamp)
          .map(|t| relative_age(t, self.locale))
          .unwrap_or_default();
        println!("  * {} | {} {}", article.title, article.source.name, age);
      }
      println!();
    }
    Ok(())
  }

  async fn show_stats(&self) -> Result<()> {
    let stats = CacheInspector::new(self.store.clone()).compute_stats().await;
    println!("size:     {} MB ({} bytes)", stats.approx_size_mb, stats.approx_size_bytes);
    println!("articles: {}", stats.total_articles);
    println!("days:     {}", stats.days);
    Ok(())
  }

  async fn sources(&self, cmd: SourcesCommand) -> Result<()> {
    let prefs = SourcePreferences::new(self.store.clone());
    match cmd {
      SourcesCommand::List => {
        let selected = prefs.load_selected().await;
        for source in sources_for(self.locale) {
          let mark = if selected.iter().any(|id| id == source.id) {
            "x"
          } else {
            " "
          };
          println!("[{}] {:<18} {} ({})", mark, source.id, source.name, source.country);
        }
        if selected.is_empty() {
          println!("all sources are followed");
        }
      }
      SourcesCommand::Set { ids } => {
        prefs.save_selected(&ids).await;
        println!("following {}", ids.join(", "));
      }
      SourcesCommand::Clear => {
        prefs.save_selected(&[]).await;
        println!("all sources are followed");
      }
    }
    Ok(())
  }

  async fn favorites(&self, cmd: FavoritesCommand) -> Result<()> {
    let favorites = Favorites::new(self.store.clone());
    match cmd {
      FavoritesCommand::List => {
        for favorite in favorites.load().await {
          self.print_article(&favorite.article);
        }
      }
      FavoritesCommand::Toggle { key } => {
        let article = self
          .find_article(&key)
          .await
          .ok_or_else(|| eyre!("No cached article matches {}", key))?;
        let starred = favorites.toggle(&article).await;
        println!(
          "{} {}",
          if starred { "starred" } else { "unstarred" },
          article.title
        );
      }
      FavoritesCommand::Categories => {
        for category in favorites.load_categories().await {
          println!("{} {}", category.emoji(), category.label(self.locale));
        }
      }
      FavoritesCommand::ToggleCategory { category } => {
        let followed = favorites.toggle_category(category).await;
        let verb = if followed.contains(&category) {
          "following"
        } else {
          "unfollowed"
        };
        println!("{} {}", verb, category.label(self.locale));
      }
    }
    Ok(())
  }

  /// Look an article up by identity in the snapshot, then in history.
  async fn find_article(&self, key: &str) -> Option<Article> {
    let snapshot = ArticleCache::new(self.store.clone()).load_snapshot().await;
    if let Some(article) = snapshot
      .into_iter()
      .flatten()
      .find(|a| a.identity() == key)
    {
      return Some(article);
    }

    HistoryLedger::new(self.store.clone())
      .load()
      .await
      .values()
      .rev()
      .flat_map(|day| day.articles.iter())
      .find(|a| a.identity() == key)
      .map(|a| a.to_article())
  }
}

fn connection_banner(connected: bool, locale: Locale) -> &'static str {
  match (connected, locale) {
    (true, Locale::Fr) => "Connexion rétablie",
    (true, Locale::En) => "Back online",
    (false, Locale::Fr) => "Mode hors ligne",
    (false, Locale::En) => "Offline mode",
  }
}

fn demo_banner(locale: Locale) -> &'static str {
  match locale {
    Locale::Fr => "Articles de démonstration",
    Locale::En => "Demo articles",
  }
}

fn empty_history(locale: Locale) -> &'static str {
  match locale {
    Locale::Fr => "Aucun historique",
    Locale::En => "No history yet",
  }
}

fn no_match(locale: Locale) -> &'static str {
  match locale {
    Locale::Fr => "Aucun article ne correspond",
    Locale::En => "No matching articles",
  }
}

fn sync_line(age: Option<String>, locale: Locale) -> String {
  match (age, locale) {
    (Some(age), Locale::Fr) => format!("Dernière synchronisation : {}", age),
    (Some(age), Locale::En) => format!("Last synced: {}", age),
    (None, Locale::Fr) => "Aucune synchronisation".to_string(),
    (None, Locale::En) => "Never synced".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::FilterArgs;
  use crate::news::{demo_articles, Category};
  use chrono::Utc;

  fn app() -> App {
    App::new(Config::default(), true).unwrap()
  }

  #[tokio::test]
  async fn test_offline_fetch_leaves_store_empty() {
    let app = app();
    app
      .run(Command::Fetch {
        offline: true,
        filter: FilterArgs::default(),
      })
      .await
      .unwrap();
    assert!(app.store.list_keys().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_find_article_in_snapshot_and_history() {
    let app = app();
    let articles = demo_articles(Utc::now());
    HistoryLedger::new(app.store.clone())
      .record_fetch(&articles[..1])
      .await;
    ArticleCache::new(app.store.clone())
      .save_snapshot(&articles[1..])
      .await;

    assert_eq!(app.find_article(&articles[0].url).await.unwrap().title, articles[0].title);
    assert_eq!(app.find_article(&articles[2].url).await.unwrap(), articles[2]);
    assert!(app.find_article("https://nowhere.example").await.is_none());
  }

  #[tokio::test]
  async fn test_toggle_unknown_favorite_fails() {
    let app = app();
    let result = app
      .run(Command::Favorites(FavoritesCommand::Toggle {
        key: "missing".to_string(),
      }))
      .await;
    assert!(result.is_err());
  }

  #[tokio::test]
  async fn test_sources_commands_persist() {
    let app = app();
    app
      .run(Command::Sources(SourcesCommand::Set {
        ids: vec!["reuters".to_string()],
      }))
      .await
      .unwrap();
    let prefs = SourcePreferences::new(app.store.clone());
    assert_eq!(prefs.load_selected().await, vec!["reuters"]);

    app.run(Command::Sources(SourcesCommand::Clear)).await.unwrap();
    assert!(prefs.load_selected().await.is_empty());
  }

  #[test]
  fn test_sync_line() {
    assert_eq!(sync_line(None, Locale::En), "Never synced");
    assert_eq!(
      sync_line(Some("3 min ago".to_string()), Locale::En),
      "Last synced: 3 min ago"
    );
  }

  #[tokio::test]
  async fn test_filtered_cached_run_leaves_snapshot_whole() {
    let app = app();
    let articles = demo_articles(Utc::now());
    ArticleCache::new(app.store.clone())
      .save_snapshot(&articles)
      .await;

    app
      .run(Command::Cached {
        filter: FilterArgs {
          category: Some(Category::Sports),
          search: Some("zzz".to_string()),
        },
      })
      .await
      .unwrap();
    let kept = ArticleCache::new(app.store.clone()).load_snapshot().await;
    assert_eq!(kept.unwrap(), articles);
  }

  #[tokio::test]
  async fn test_toggle_category_command() {
    let app = app();
    app
      .run(Command::Favorites(FavoritesCommand::ToggleCategory {
        category: Category::Science,
      }))
      .await
      .unwrap();
    let followed = Favorites::new(app.store.clone()).load_categories().await;
    assert_eq!(followed, vec![Category::Science]);
  }
}
