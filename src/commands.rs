//! Command-line subcommands.

use clap::{Args, Subcommand};

use crate::news::{ArticleFilter, Category};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
  /// Run one refresh cycle and print the briefing
  #[command(alias = "f")]
  Fetch {
    /// Skip the network and read from cache only
    #[arg(long)]
    offline: bool,
    #[command(flatten)]
    filter: FilterArgs,
  },
  /// Keep the briefing fresh until interrupted
  #[command(alias = "w")]
  Watch {
    #[command(flatten)]
    filter: FilterArgs,
  },
  /// Print the cached snapshot without syncing
  #[command(alias = "c")]
  Cached {
    #[command(flatten)]
    filter: FilterArgs,
  },
  /// Print the reading history grouped by day
  #[command(alias = "h")]
  History,
  /// Print storage statistics
  Stats,
  /// Choose which news sources to follow
  #[command(subcommand, alias = "s")]
  Sources(SourcesCommand),
  /// Manage starred articles
  #[command(subcommand, alias = "fav")]
  Favorites(FavoritesCommand),
}

impl Default for Command {
  fn default() -> Self {
    Command::Fetch {
      offline: false,
      filter: FilterArgs::default(),
    }
  }
}

/// Narrow the printed briefing. Nothing is filtered out of the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct FilterArgs {
  /// Only show articles filed under this category
  #[arg(long, value_enum)]
  pub category: Option<Category>,
  /// Only show articles whose title, description or source contains this text
  #[arg(long)]
  pub search: Option<String>,
}

impl FilterArgs {
  pub fn to_filter(&self) -> ArticleFilter {
    ArticleFilter::new(self.category, self.search.clone())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum SourcesCommand {
  /// List available sources, marking the selected ones
  List,
  /// Replace the selection
  Set {
    #[arg(required = true)]
    ids: Vec<String>,
  },
  /// Follow all sources again
  Clear,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum FavoritesCommand {
  List,
  /// Star or unstar a cached article by url (or title when it has none)
  Toggle { key: String },
  /// List followed categories
  Categories,
  /// Follow or unfollow a category
  ToggleCategory {
    #[arg(value_enum)]
    category: Category,
  },
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser, Debug)]
  struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
  }

  fn parse(args: &[&str]) -> Option<Command> {
    Cli::try_parse_from(std::iter::once("briefing").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[test]
  fn test_no_command_defaults_to_fetch() {
    assert_eq!(
      parse(&[]).unwrap_or_default(),
      Command::Fetch {
        offline: false,
        filter: FilterArgs::default()
      }
    );
  }

  #[test]
  fn test_fetch_offline_flag() {
    assert_eq!(
      parse(&["fetch", "--offline"]),
      Some(Command::Fetch {
        offline: true,
        filter: FilterArgs::default()
      })
    );
  }

  #[test]
  fn test_filter_flags() {
    let expected = FilterArgs {
      category: Some(Category::Sports),
      search: Some("mercato".to_string()),
    };
    assert_eq!(
      parse(&["cached", "--category", "sports", "--search", "mercato"]),
      Some(Command::Cached {
        filter: expected.clone()
      })
    );
    assert_eq!(
      parse(&["w", "--category", "sports", "--search", "mercato"]),
      Some(Command::Watch { filter: expected })
    );
    assert!(Cli::try_parse_from(["briefing", "fetch", "--category", "gossip"]).is_err());
  }

  #[test]
  fn test_favorite_category_toggle() {
    assert_eq!(
      parse(&["favorites", "toggle-category", "economie"]),
      Some(Command::Favorites(FavoritesCommand::ToggleCategory {
        category: Category::Economie
      }))
    );
  }

  #[test]
  fn test_alias_match() {
    assert_eq!(
      parse(&["w"]),
      Some(Command::Watch {
        filter: FilterArgs::default()
      })
    );
    assert_eq!(parse(&["h"]), Some(Command::History));
  }

  #[test]
  fn test_sources_set() {
    assert_eq!(
      parse(&["sources", "set", "le-monde", "les-echos"]),
      Some(Command::Sources(SourcesCommand::Set {
        ids: vec!["le-monde".to_string(), "les-echos".to_string()]
      }))
    );
  }

  #[test]
  fn test_sources_set_requires_ids() {
    assert!(Cli::try_parse_from(["briefing", "sources", "set"]).is_err());
  }

  #[test]
  fn test_favorites_toggle() {
    assert_eq!(
      parse(&["fav", "toggle", "https://lemonde.fr"]),
      Some(Command::Favorites(FavoritesCommand::Toggle {
        key: "https://lemonde.fr".to_string()
      }))
    );
  }
}
