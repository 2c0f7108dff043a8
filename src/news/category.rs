//! Topic categories and briefing filters.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

use super::Article;

/// Topic an article is filed under. `All` only exists as a filter value.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  #[default]
  All,
  International,
  Politique,
  Economie,
  Societe,
  Technology,
  Science,
  Sports,
  Entertainment,
  Environnement,
}

impl Category {
  /// Stable key, as persisted and accepted on the command line.
  pub fn key(self) -> &'static str {
    match self {
      Self::All => "all",
      Self::International => "international",
      Self::Politique => "politique",
      Self::Economie => "economie",
      Self::Societe => "societe",
      Self::Technology => "technology",
      Self::Science => "science",
      Self::Sports => "sports",
      Self::Entertainment => "entertainment",
      Self::Environnement => "environnement",
    }
  }

  pub fn emoji(self) -> &'static str {
    match self {
      Self::All => "✦",
      Self::International => "🌍",
      Self::Politique => "🏛️",
      Self::Economie => "📈",
      Self::Societe => "👥",
      Self::Technology => "⚡",
      Self::Science => "🔬",
      Self::Sports => "⚽",
      Self::Entertainment => "🎵",
      Self::Environnement => "🌱",
    }
  }

  pub fn label(self, locale: Locale) -> &'static str {
    match (self, locale) {
      (Self::All, Locale::Fr) => "TOUT",
      (Self::All, Locale::En) => "ALL",
      (Self::International, _) => "INTERNATIONAL",
      (Self::Politique, Locale::Fr) => "POLITIQUE",
      (Self::Politique, Locale::En) => "POLITICS",
      (Self::Economie, Locale::Fr) => "ÉCONOMIE",
      (Self::Economie, Locale::En) => "ECONOMY",
      (Self::Societe, Locale::Fr) => "SOCIÉTÉ",
      (Self::Societe, Locale::En) => "SOCIETY",
      (Self::Technology, _) => "TECHNO",
      (Self::Science, _) => "SCIENCE",
      (Self::Sports, _) => "SPORT",
      (Self::Entertainment, _) => "CULTURE",
      (Self::Environnement, Locale::Fr) => "ENVIRONNEMENT",
      (Self::Environnement, Locale::En) => "ENVIRONMENT",
    }
  }

  /// Map a provider category (`politics`, `world`, ...) onto ours.
  fn from_api(category: &str) -> Option<Self> {
    match category.trim().to_lowercase().as_str() {
      "politics" => Some(Self::Politique),
      "business" => Some(Self::Economie),
      "technology" => Some(Self::Technology),
      "sports" => Some(Self::Sports),
      "science" => Some(Self::Science),
      "world" | "general" => Some(Self::International),
      "health" => Some(Self::Societe),
      "entertainment" => Some(Self::Entertainment),
      "environment" => Some(Self::Environnement),
      _ => None,
    }
  }
}

const NAME_HINTS: &[(Category, &[&str])] = &[
  (Category::Technology, &["tech", "wired", "verge", "numerama"]),
  (Category::Sports, &["sport", "equipe", "équipe", "espn"]),
  (
    Category::Economie,
    &["bourse", "trading", "cac", "entreprise", "business", "échos", "echos"],
  ),
  (Category::Politique, &["politique", "élysée", "assemblée"]),
  (Category::Societe, &["société", "social", "santé", "health"]),
  (
    Category::International,
    &["international", "monde", "reuters", "afp"],
  ),
  (Category::Entertainment, &["culture", "césar"]),
  (Category::Science, &["science"]),
  (
    Category::Environnement,
    &["climat", "environnement", "écologie", "énergie"],
  ),
];

/// Classify an article. Provider categories win over source-name hints;
/// anything unrecognised is international news.
pub fn category_for(source_name: &str, categories: &[String]) -> Category {
  if let Some(category) = categories.iter().find_map(|c| Category::from_api(c)) {
    return category;
  }

  let name = source_name.to_lowercase();
  NAME_HINTS
    .iter()
    .find(|(_, hints)| hints.iter().any(|hint| name.contains(hint)))
    .map(|(category, _)| *category)
    .unwrap_or(Category::International)
}

impl Article {
  pub fn category_info(&self) -> Category {
    category_for(&self.source.name, &self.category)
  }
}

/// Narrowing applied to a briefing before display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
  pub category: Category,
  pub search: Option<String>,
}

impl ArticleFilter {
  pub fn new(category: Option<Category>, search: Option<String>) -> Self {
    let search = search
      .map(|q| q.trim().to_lowercase())
      .filter(|q| !q.is_empty());
    Self {
      category: category.unwrap_or_default(),
      search,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.category == Category::All && self.search.is_none()
  }

  /// Category must match unless `All`; the search text must appear in the
  /// title, description or source name, ignoring case.
  pub fn matches(&self, article: &Article) -> bool {
    if self.category != Category::All && article.category_info() != self.category {
      return false;
    }
    match &self.search {
      Some(q) => [&article.title, &article.description, &article.source.name]
        .iter()
        .any(|field| field.to_lowercase().contains(q.as_str())),
      None => true,
    }
  }

  pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
    articles.iter().filter(|a| self.matches(a)).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::news::ArticleSource;

  fn cats(list: &[&str]) -> Vec<String> {
    list.iter().map(|c| c.to_string()).collect()
  }

  fn article(title: &str, description: &str, source: &str) -> Article {
    Article {
      title: title.to_string(),
      description: description.to_string(),
      url: format!("https://news.example/{}", title.len()),
      url_to_image: None,
      published_at: None,
      source: ArticleSource {
        name: source.to_string(),
      },
      category: Vec::new(),
    }
  }

  #[test]
  fn test_provider_categories() {
    assert_eq!(category_for("Unknown", &cats(&["politics"])), Category::Politique);
    assert_eq!(category_for("Unknown", &cats(&["business"])), Category::Economie);
    assert_eq!(category_for("Unknown", &cats(&["technology"])), Category::Technology);
    assert_eq!(category_for("Unknown", &cats(&["sports"])), Category::Sports);
    assert_eq!(category_for("Unknown", &cats(&["science"])), Category::Science);
    assert_eq!(category_for("Unknown", &cats(&["world"])), Category::International);
    assert_eq!(category_for("Unknown", &cats(&["health"])), Category::Societe);
  }

  #[test]
  fn test_source_name_hints() {
    assert_eq!(category_for("Numerama", &[]), Category::Technology);
    assert_eq!(category_for("L'Equipe", &[]), Category::Sports);
    assert_eq!(category_for("Les Échos", &[]), Category::Economie);
    assert_eq!(category_for("Le Monde", &[]), Category::International);
  }

  #[test]
  fn test_unknown_defaults_to_international() {
    assert_eq!(category_for("Random Source", &[]), Category::International);
    assert_eq!(category_for("Test", &cats(&["top"])), Category::International);
    assert_eq!(category_for("", &[]), Category::International);
  }

  #[test]
  fn test_provider_category_beats_source_name() {
    assert_eq!(
      category_for("L'Équipe", &cats(&["technology"])),
      Category::Technology
    );
    // An unmapped provider category falls through to the name
    assert_eq!(category_for("L'Équipe", &cats(&["top"])), Category::Sports);
  }

  #[test]
  fn test_every_category_has_key_and_emoji() {
    for &category in Category::value_variants() {
      assert!(!category.key().is_empty());
      assert!(!category.emoji().is_empty());
      assert!(!category.label(Locale::Fr).is_empty());
      let parsed = Category::from_str(category.key(), true).unwrap();
      assert_eq!(parsed, category);
    }
  }

  #[test]
  fn test_filter_by_category() {
    let articles = vec![
      article("Mercato", "", "L'Equipe"),
      article("Taux", "La BCE", "Les Échos"),
    ];
    let filter = ArticleFilter::new(Some(Category::Sports), None);
    let kept: Vec<&str> = filter
      .apply(&articles)
      .into_iter()
      .map(|a| a.title.as_str())
      .collect();
    assert_eq!(kept, vec!["Mercato"]);

    assert_eq!(ArticleFilter::new(Some(Category::All), None).apply(&articles).len(), 2);
  }

  #[test]
  fn test_search_is_case_insensitive_across_fields() {
    let articles = vec![
      article("Sommet européen", "Défense commune", "Le Monde"),
      article("La BCE maintient ses taux", "Christine Lagarde", "Les Échos"),
      article("Mercato", "", "L'Equipe"),
    ];

    let by_title = ArticleFilter::new(None, Some("SOMMET".to_string()));
    assert_eq!(by_title.apply(&articles).len(), 1);

    let by_description = ArticleFilter::new(None, Some("lagarde".to_string()));
    assert_eq!(by_description.apply(&articles)[0].source.name, "Les Échos");

    let by_source = ArticleFilter::new(None, Some("équipe".to_string()));
    assert!(by_source.apply(&articles).is_empty());
    let by_source = ArticleFilter::new(None, Some("equipe".to_string()));
    assert_eq!(by_source.apply(&articles).len(), 1);
  }

  #[test]
  fn test_blank_search_is_ignored() {
    let filter = ArticleFilter::new(None, Some("   ".to_string()));
    assert!(filter.is_empty());
    assert!(filter.matches(&article("Anything", "", "")));
  }

  #[test]
  fn test_category_and_search_combine() {
    let articles = vec![
      article("Mercato", "transferts", "L'Equipe"),
      article("Mercato boursier", "", "Les Échos"),
    ];
    let filter = ArticleFilter::new(Some(Category::Economie), Some("mercato".to_string()));
    let kept = filter.apply(&articles);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].source.name, "Les Échos");
  }
}
