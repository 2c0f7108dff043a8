//! Calendar-day bucketing and human-readable date labels.
//!
//! All day computations use the local timezone, both when a key is produced
//! and when it is compared against "today".

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};

use crate::locale::Locale;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Local calendar date of `ts` as `YYYY-MM-DD`.
///
/// Keys sort lexicographically in calendar order.
pub fn day_key<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
  ts.with_timezone(&Local).format(DAY_KEY_FORMAT).to_string()
}

/// Day key for the current moment.
pub fn today_key() -> String {
  day_key(&Local::now())
}

/// Heading for a history group: "Today", "Yesterday" or a long date.
pub fn group_label(key: &str, locale: Locale) -> String {
  group_label_at(key, locale, Local::now())
}

pub fn group_label_at(key: &str, locale: Locale, now: DateTime<Local>) -> String {
  if key == day_key(&now) {
    return locale.today().to_string();
  }
  if key == day_key(&(now - Duration::hours(24))) {
    return locale.yesterday().to_string();
  }

  match parse_day_key(key) {
    Some(noon) => noon
      .format_localized(locale.group_date_format(), locale.chrono_locale())
      .to_string(),
    None => key.to_string(),
  }
}

/// Age of `ts` relative to now: minutes, then hours, then a short date.
pub fn relative_age(ts: DateTime<Utc>, locale: Locale) -> String {
  relative_age_at(ts, locale, Utc::now())
}

pub fn relative_age_at(ts: DateTime<Utc>, locale: Locale, now: DateTime<Utc>) -> String {
  // Future timestamps (clock skew) count as just now.
  let minutes = (now - ts).num_minutes().max(0);

  if minutes < 60 {
    return locale.minutes_ago(minutes);
  }
  if minutes < 24 * 60 {
    return locale.hours_ago(minutes / 60);
  }

  ts.with_timezone(&Local)
    .format_localized(locale.short_date_format(), locale.chrono_locale())
    .to_string()
}

/// Full date for a header, e.g. "Sunday, October 18, 2026".
pub fn today_formatted(locale: Locale) -> String {
  Local::now()
    .format_localized(locale.full_date_format(), locale.chrono_locale())
    .to_string()
}

/// Noon of the given day in local time, so DST shifts never move the date.
fn parse_day_key(key: &str) -> Option<DateTime<Local>> {
  let date = NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()?;
  let noon = date.and_hms_opt(12, 0, 0)?;
  Local.from_local_datetime(&noon).earliest()
}
