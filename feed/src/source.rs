use async_trait::async_trait;
use tracing::{info, instrument};

use crate::client::FeedClient;
use crate::errors::FeedError;
use crate::normalize::{PriceIndex, normalize_raw};
use crate::types::RawQuote;

/// Anything that can hand over a raw snapshot of the price feed.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_quotes(&self) -> Result<Vec<RawQuote>, FeedError>;
}

#[async_trait]
impl PriceSource for FeedClient {
    async fn fetch_quotes(&self) -> Result<Vec<RawQuote>, FeedError> {
        self.fetch_prices().await
    }
}

/// Fetch one snapshot and normalize it into a fresh index.
///
/// An empty snapshot is reported as [`FeedError::Empty`]: there is nothing
/// usable to convert with.
#[instrument(skip(source))]
pub async fn load_index<S>(source: &S) -> Result<PriceIndex, FeedError>
where
    S: PriceSource + ?Sized,
{
    let raw = source.fetch_quotes().await?;
    if raw.is_empty() {
        return Err(FeedError::Empty);
    }

    let records = raw.len();
    let index = normalize_raw(raw);

    info!(records, currencies = index.len(), "price index loaded");

    Ok(index)
}
