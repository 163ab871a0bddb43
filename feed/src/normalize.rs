//! Feed normalization.
//!
//! The feed may list a currency several times with different timestamps.
//! `normalize` reduces it to one authoritative quote per currency:
//!   • the quote with the latest `observed_at` wins
//!   • on an exact tie the quote seen first wins
//!   • quotes with unparseable timestamps lose to any valid one

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use tracing::{debug, warn};

use crate::types::{Quote, RawQuote};

/// Deduplicated currency → latest quote mapping.
///
/// Built once per feed snapshot and never mutated afterwards; a refresh
/// produces a whole new index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceIndex {
    quotes: BTreeMap<String, Quote>,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, currency: &str) -> Option<&Quote> {
        self.quotes.get(currency)
    }

    pub fn price(&self, currency: &str) -> Option<f64> {
        self.get(currency).map(|q| q.price)
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.quotes.contains_key(currency)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Available currency codes, sorted.
    pub fn currencies(&self) -> Vec<String> {
        self.quotes.keys().cloned().collect()
    }

    /// Authoritative quotes, ordered by currency code.
    pub fn quotes(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.values()
    }

    /// Currency codes containing `input`, case-insensitively.
    ///
    /// Backs the searchable currency dropdown. An empty input matches all.
    pub fn search(&self, input: &str) -> Vec<&str> {
        let needle = input.trim().to_lowercase();

        self.quotes
            .keys()
            .filter(|code| code.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}

/// Reduce a feed snapshot to one quote per currency.
pub fn normalize(quotes: &[Quote]) -> PriceIndex {
    let mut latest: BTreeMap<String, Quote> = BTreeMap::new();
    let mut superseded = 0usize;

    for quote in quotes {
        match latest.entry(quote.currency.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(quote.clone());
            }
            Entry::Occupied(mut slot) => {
                superseded += 1;
                if quote.is_newer_than(slot.get()) {
                    slot.insert(quote.clone());
                }
            }
        }
    }

    let undated = latest.values().filter(|q| q.observed_at.is_none()).count();
    if undated > 0 {
        warn!(undated, "feed contains currencies without a parseable timestamp");
    }

    debug!(
        input = quotes.len(),
        currencies = latest.len(),
        superseded,
        "price feed normalized"
    );

    PriceIndex { quotes: latest }
}

/// Parse wire records and normalize them in feed order.
pub fn normalize_raw(raw: Vec<RawQuote>) -> PriceIndex {
    let quotes: Vec<Quote> = raw.into_iter().map(Quote::from).collect();
    normalize(&quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(currency: &str, price: f64, date: &str) -> Quote {
        Quote::new(currency, price, date)
    }

    #[test]
    fn latest_timestamp_wins_and_first_wins_ties() {
        let input = vec![
            q("EUR", 1.1, "2024-01-01"),
            q("EUR", 1.2, "2024-01-02"),
            q("EUR", 1.05, "2024-01-02"),
        ];

        let index = normalize(&input);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("EUR"), Some(&input[1]));
    }

    #[test]
    fn older_quote_after_newer_is_ignored() {
        let input = vec![
            q("ETH", 1645.9, "2023-08-29T07:10:52.000Z"),
            q("ETH", 1600.0, "2023-08-29T07:10:40.000Z"),
        ];

        let index = normalize(&input);
        assert_eq!(index.price("ETH"), Some(1645.9));
    }

    #[test]
    fn distinct_currencies_each_get_an_entry() {
        let input = vec![
            q("USD", 1.0, "2024-01-01"),
            q("EUR", 0.9, "2024-01-01"),
            q("ATOM", 7.18, "2024-01-01"),
        ];

        let index = normalize(&input);

        assert_eq!(index.currencies(), vec!["ATOM", "EUR", "USD"]);
    }

    #[test]
    fn unparseable_timestamp_never_displaces_valid_entry() {
        let input = vec![q("EUR", 1.1, "2024-01-01"), q("EUR", 9.9, "garbage")];

        let index = normalize(&input);
        assert_eq!(index.price("EUR"), Some(1.1));
    }

    #[test]
    fn valid_timestamp_displaces_unparseable_entry() {
        let input = vec![q("EUR", 9.9, "garbage"), q("EUR", 1.1, "2024-01-01")];

        let index = normalize(&input);
        assert_eq!(index.price("EUR"), Some(1.1));
    }

    #[test]
    fn unparseable_only_keeps_first_seen() {
        let input = vec![q("EUR", 9.9, "garbage"), q("EUR", 8.8, "also garbage")];

        let index = normalize(&input);
        assert_eq!(index.price("EUR"), Some(9.9));
    }

    #[test]
    fn input_is_left_untouched() {
        let input = vec![q("EUR", 1.1, "2024-01-01"), q("EUR", 1.2, "2024-01-02")];
        let before = input.clone();

        let _ = normalize(&input);
        assert_eq!(input, before);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let index = normalize(&[
            q("USD", 1.0, "2024-01-01"),
            q("USDC", 1.0, "2024-01-01"),
            q("bUSD", 1.0, "2024-01-01"),
            q("EUR", 0.9, "2024-01-01"),
        ]);

        assert_eq!(index.search("usd"), vec!["USD", "USDC", "bUSD"]);
        assert_eq!(index.search(""), vec!["EUR", "USD", "USDC", "bUSD"]);
        assert!(index.search("xyz").is_empty());
    }

    #[test]
    fn normalize_raw_parses_before_comparing() {
        let raw = vec![
            RawQuote {
                currency: "EUR".into(),
                price: 1.0,
                date: "2024-01-01T10:00:00+05:00".into(),
            },
            RawQuote {
                currency: "EUR".into(),
                price: 1.1,
                date: "2024-01-01T06:00:00Z".into(),
            },
        ];

        let index = normalize_raw(raw);
        assert_eq!(index.price("EUR"), Some(1.1));
    }
}
