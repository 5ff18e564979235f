use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::i18n::Locale;
use crate::profile::text;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("year"));
static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("year-month"));
static SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://").expect("scheme"));

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jul 2021` / `juil. 2021`
    #[default]
    Short,
    /// `July 1, 2021` / `1 juillet 2021`
    Long,
}

/// Formats a resume date. Bare years pass through, `YYYY-MM` and full dates are
/// rendered in the locale's month style, and anything unparseable comes back
/// unchanged.
pub fn format_date(s: &str, locale: Locale, style: DateStyle) -> String {
    let s = s.trim();
    if s.is_empty() {
        return String::new();
    }
    if YEAR_RE.is_match(s) {
        return s.to_string();
    }
    if let Some(caps) = YEAR_MONTH_RE.captures(s) {
        let year = caps[1].parse::<i32>().ok();
        let month = caps[2].parse::<u32>().ok();
        return match year
            .zip(month)
            .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
        {
            Some(date) => render_date(date, locale, style),
            None => s.to_string(),
        };
    }
    match parse_full_date(s) {
        Some(date) => render_date(date, locale, style),
        None => s.to_string(),
    }
}

fn parse_full_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn render_date(date: NaiveDate, locale: Locale, style: DateStyle) -> String {
    let month0 = date.month0() as usize;
    match (style, locale) {
        (DateStyle::Short, _) => format!("{} {}", locale.short_month(month0), date.year()),
        (DateStyle::Long, Locale::En) => format!(
            "{} {}, {}",
            locale.long_month(month0),
            date.day(),
            date.year()
        ),
        (DateStyle::Long, Locale::Fr) => format!(
            "{} {} {}",
            date.day(),
            locale.long_month(month0),
            date.year()
        ),
    }
}

/// `start – end`, `start – Present`, `Until end`, or an empty string.
pub fn date_range(start: &str, end: &str, locale: Locale) -> String {
    let start = format_date(start, locale, DateStyle::Short);
    let end = format_date(end, locale, DateStyle::Short);
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} – {end}"),
        (false, true) => format!("{start} – {}", locale.label("present")),
        (true, false) => format!("{} {end}", locale.label("until")),
        (true, true) => String::new(),
    }
}

/// `address. city, postalCode, region, countryCode` with absent parts dropped.
pub fn format_location(loc: &Value) -> String {
    let city_to_country = join_present(loc, &["city", "postalCode", "region", "countryCode"]);
    let address = text(loc, "address");
    let address = address.trim();
    if address.is_empty() {
        return city_to_country;
    }
    if city_to_country.is_empty() {
        return address.to_string();
    }
    format!("{address}. {city_to_country}")
}

/// `city, region, countryCode`, used where a single short line is wanted.
pub fn format_location_compact(loc: &Value) -> String {
    join_present(loc, &["city", "region", "countryCode"])
}

fn join_present(loc: &Value, keys: &[&str]) -> String {
    keys.iter()
        .map(|k| text(loc, k))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strips the scheme and one trailing slash for display.
pub fn no_schema_url(url: &str) -> String {
    let stripped = SCHEME_RE.replace(url.trim(), "");
    stripped
        .strip_suffix('/')
        .unwrap_or(stripped.as_ref())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn year_passes_through() {
        assert_eq!(format_date("2021", Locale::En, DateStyle::Short), "2021");
        assert_eq!(format_date("2021", Locale::Fr, DateStyle::Long), "2021");
    }

    #[test]
    fn year_month_uses_short_month() {
        assert_eq!(format_date("2021-07", Locale::En, DateStyle::Short), "Jul 2021");
        assert_eq!(format_date("2021-07", Locale::Fr, DateStyle::Short), "juil. 2021");
        assert_eq!(format_date("2021-07", Locale::En, DateStyle::Long), "July 1, 2021");
        assert_eq!(format_date("2021-07", Locale::Fr, DateStyle::Long), "1 juillet 2021");
    }

    #[test]
    fn full_dates_are_reformatted() {
        assert_eq!(format_date("2019-02-14", Locale::En, DateStyle::Short), "Feb 2019");
        assert_eq!(
            format_date("2019-02-14T10:00:00Z", Locale::En, DateStyle::Short),
            "Feb 2019"
        );
        assert_eq!(
            format_date("March 5, 2020", Locale::En, DateStyle::Long),
            "March 5, 2020"
        );
    }

    #[test]
    fn unparseable_is_verbatim_and_idempotent() {
        assert_eq!(format_date("someday", Locale::En, DateStyle::Short), "someday");
        assert_eq!(format_date("2021-13", Locale::En, DateStyle::Short), "2021-13");
        let once = format_date("2020-01", Locale::En, DateStyle::Short);
        assert_eq!(once, "Jan 2020");
        assert_eq!(format_date(&once, Locale::En, DateStyle::Short), once);
        let fr = format_date("2020-02", Locale::Fr, DateStyle::Short);
        assert_eq!(format_date(&fr, Locale::Fr, DateStyle::Short), fr);
    }

    #[test]
    fn ranges() {
        assert_eq!(date_range("2020-01", "", Locale::En), "Jan 2020 – Present");
        assert_eq!(date_range("", "", Locale::En), "");
        assert_eq!(date_range("2018", "2020-03", Locale::En), "2018 – Mar 2020");
        assert_eq!(date_range("", "2020", Locale::En), "Until 2020");
        assert_eq!(date_range("2020-01", "", Locale::Fr), "janv. 2020 – Actuellement");
    }

    #[test]
    fn locations() {
        let full = json!({
            "address": "1 Main St",
            "city": "Springfield",
            "postalCode": "12345",
            "region": "IL",
            "countryCode": "US"
        });
        assert_eq!(format_location(&full), "1 Main St. Springfield, 12345, IL, US");
        assert_eq!(format_location_compact(&full), "Springfield, IL, US");
        assert_eq!(format_location(&json!({"city": "Paris", "countryCode": "FR"})), "Paris, FR");
        assert_eq!(format_location(&Value::Null), "");
    }

    #[test]
    fn urls() {
        assert_eq!(no_schema_url("https://example.com/"), "example.com");
        assert_eq!(no_schema_url("http://example.com/a"), "example.com/a");
        assert_eq!(no_schema_url("example.com//"), "example.com/");
        assert_eq!(no_schema_url(""), "");
    }
}
