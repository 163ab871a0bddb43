use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record exactly as the feed serves it.
///
/// ```json
/// { "currency": "ETH", "date": "2023-08-29T07:10:52.000Z", "price": 1645.93 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuote {
    pub currency: String,
    pub price: f64,
    pub date: String,
}

/// A feed record with its timestamp resolved to an instant.
///
/// `observed_at` is `None` when the raw date could not be parsed. Such a quote
/// orders before every quote with a valid timestamp, so it can never displace
/// one during normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub currency: String,
    pub price: f64,
    pub observed_at: Option<DateTime<Utc>>,

    /// Original date string, kept for display and diagnostics.
    pub date: String,
}

impl Quote {
    pub fn new(currency: impl Into<String>, price: f64, date: impl Into<String>) -> Self {
        let date = date.into();

        Self {
            currency: currency.into(),
            price,
            observed_at: parse_observed_at(&date),
            date,
        }
    }

    /// Strictly later than `other`; an unparseable timestamp is never later.
    pub fn is_newer_than(&self, other: &Quote) -> bool {
        self.observed_at > other.observed_at
    }

    pub fn into_raw(self) -> RawQuote {
        RawQuote {
            currency: self.currency,
            price: self.price,
            date: self.date,
        }
    }
}

impl From<RawQuote> for Quote {
    fn from(raw: RawQuote) -> Self {
        Quote::new(raw.currency, raw.price, raw.date)
    }
}

/// Parse a feed timestamp into a UTC instant.
///
/// Accepts RFC 3339 (the feed's normal form), RFC 2822, naive date-times and
/// bare dates. Values without an offset are read as UTC.
pub fn parse_observed_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
