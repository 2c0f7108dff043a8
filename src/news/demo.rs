//! Built-in article set shown when neither the network nor the cache can
//! provide anything.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use super::types::{Article, ArticleSource};

struct DemoEntry {
  title: &'static str,
  description: &'static str,
  source: &'static str,
  hours_ago: i64,
  url: &'static str,
}

const DEMO_ENTRIES: &[DemoEntry] = &[
  DemoEntry {
    title: "Sommet européen : accord historique sur la défense commune",
    description: "Les 27 pays membres ont trouvé un accord sur un plan de défense commun doté de 150 milliards d'euros sur cinq ans.",
    source: "Le Monde",
    hours_ago: 2,
    url: "https://lemonde.fr",
  },
  DemoEntry {
    title: "La BCE maintient ses taux directeurs inchangés",
    description: "Christine Lagarde a annoncé une pause dans le cycle de baisse des taux, citant les incertitudes géopolitiques.",
    source: "Les Échos",
    hours_ago: 3,
    url: "https://lesechos.fr",
  },
  DemoEntry {
    title: "L'IA générative franchit un cap dans la recherche médicale",
    description: "Un nouveau modèle d'intelligence artificielle a identifié trois molécules prometteuses contre la maladie d'Alzheimer.",
    source: "France Info",
    hours_ago: 5,
    url: "https://franceinfo.fr",
  },
  DemoEntry {
    title: "Ligue des Champions : le PSG s'impose 3-1 à Munich",
    description: "Victoire éclatante du Paris Saint-Germain en huitièmes de finale grâce à un doublé de Dembélé.",
    source: "L'Équipe",
    hours_ago: 1,
    url: "https://lequipe.fr",
  },
  DemoEntry {
    title: "César 2026 : « Les Enfants du silence » rafle cinq récompenses",
    description: "Le film de Julie Bertrand a dominé la cérémonie avec le César du meilleur film et de la meilleure réalisation.",
    source: "France Culture",
    hours_ago: 8,
    url: "https://radiofrance.fr",
  },
];

/// The demo set, with publication times relative to `now`.
pub fn demo_articles(now: DateTime<Utc>) -> Vec<Article> {
  DEMO_ENTRIES
    .iter()
    .map(|entry| Article {
      title: entry.title.to_string(),
      description: entry.description.to_string(),
      url: entry.url.to_string(),
      url_to_image: None,
      published_at: Some(
        (now - Duration::hours(entry.hours_ago)).to_rfc3339_opts(SecondsFormat::Millis, true),
      ),
      source: ArticleSource {
        name: entry.source.to_string(),
      },
      category: Vec::new(),
    })
    .collect()
}
