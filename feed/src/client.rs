use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::errors::FeedError;
use crate::types::RawQuote;

/// Public endpoint serving the reference price list.
pub const DEFAULT_FEED_URL: &str = "https://interview.switcheo.com/prices.json";

#[derive(Clone)]
pub struct FeedClient {
    http: Client,
    url: String,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the full price list. No pagination, no incremental updates.
    #[instrument(skip(self), fields(url = %self.url), level = "debug")]
    pub async fn fetch_prices(&self) -> Result<Vec<RawQuote>, FeedError> {
        let resp = self.http.get(&self.url).send().await?.error_for_status()?;
        let body = resp.bytes().await?;

        let quotes = decode_feed(&body)?;

        debug!(records = quotes.len(), "price feed fetched");

        Ok(quotes)
    }
}

/// Decode a feed body (a JSON array of records).
pub fn decode_feed(body: &[u8]) -> Result<Vec<RawQuote>, FeedError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_feed_array() {
        let body = br#"[
            {"currency":"BLUR","date":"2023-08-29T07:10:24.000Z","price":0.20811525423728813},
            {"currency":"bNEO","date":"2023-08-29T07:10:50.000Z","price":7.1282679}
        ]"#;

        let quotes = decode_feed(body).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].currency, "bNEO");
    }

    #[test]
    fn rejects_non_array_payload() {
        let err = decode_feed(br#"{"error":"maintenance"}"#).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }

    #[test]
    fn rejects_records_missing_price() {
        let err = decode_feed(br#"[{"currency":"ETH","date":"2023-08-29"}]"#).unwrap_err();
        assert!(matches!(err, FeedError::Decode(_)));
    }
}
