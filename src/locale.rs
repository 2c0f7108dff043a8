use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Display language for labels and dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
  #[default]
  Fr,
  En,
}

impl Locale {
  pub fn today(self) -> &'static str {
    match self {
      Self::Fr => "Aujourd'hui",
      Self::En => "Today",
    }
  }

  pub fn yesterday(self) -> &'static str {
    match self {
      Self::Fr => "Hier",
      Self::En => "Yesterday",
    }
  }

  pub fn minutes_ago(self, minutes: i64) -> String {
    match self {
      Self::Fr => format!("Il y a {} min", minutes),
      Self::En => format!("{} min ago", minutes),
    }
  }

  pub fn hours_ago(self, hours: i64) -> String {
    match self {
      Self::Fr => format!("Il y a {}h", hours),
      Self::En => format!("{}h ago", hours),
    }
  }

  /// strftime pattern for a short "day month" date.
  pub(crate) fn short_date_format(self) -> &'static str {
    match self {
      Self::Fr => "%-d %b",
      Self::En => "%b %-d",
    }
  }

  /// strftime pattern for a group heading (weekday, day, month).
  pub(crate) fn group_date_format(self) -> &'static str {
    match self {
      Self::Fr => "%A %-d %B",
      Self::En => "%A, %B %-d",
    }
  }

  /// strftime pattern for a full header date including the year.
  pub(crate) fn full_date_format(self) -> &'static str {
    match self {
      Self::Fr => "%A %-d %B %Y",
      Self::En => "%A, %B %-d, %Y",
    }
  }

  pub(crate) fn chrono_locale(self) -> chrono::Locale {
    match self {
      Self::Fr => chrono::Locale::fr_FR,
      Self::En => chrono::Locale::en_US,
    }
  }
}

impl FromStr for Locale {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "fr" | "fr-fr" => Ok(Self::Fr),
      "en" | "en-us" | "en-gb" => Ok(Self::En),
      other => Err(format!("unsupported locale: {}", other)),
    }
  }
}

impl fmt::Display for Locale {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Fr => write!(f, "fr"),
      Self::En => write!(f, "en"),
    }
  }
}
