use thiserror::Error;

/// Reasons the feed could not produce usable prices.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed feed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("feed returned no quotes")]
    Empty,
}
