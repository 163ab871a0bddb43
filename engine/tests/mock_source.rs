use std::time::Duration;

use async_trait::async_trait;
use feed::{FeedError, PriceSource, RawQuote};

/// Serves a fixed snapshot after an optional delay; `records: None` fails.
pub struct StaticSource {
    pub records: Option<Vec<RawQuote>>,
    pub delay: Duration,
}

impl StaticSource {
    pub fn with(records: &[(&str, f64, &str)]) -> Self {
        Self {
            records: Some(
                records
                    .iter()
                    .map(|(currency, price, date)| RawQuote {
                        currency: currency.to_string(),
                        price: *price,
                        date: date.to_string(),
                    })
                    .collect(),
            ),
            delay: Duration::ZERO,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: None,
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl PriceSource for StaticSource {
    async fn fetch_quotes(&self) -> Result<Vec<RawQuote>, FeedError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.records.clone().ok_or(FeedError::Empty)
    }
}
