//! Price feed: wire records, quote normalization and HTTP transport.

pub mod client;
pub mod errors;
pub mod normalize;
pub mod source;
pub mod types;

pub use client::{DEFAULT_FEED_URL, FeedClient};
pub use errors::FeedError;
pub use normalize::{PriceIndex, normalize, normalize_raw};
pub use source::{PriceSource, load_index};
pub use types::{Quote, RawQuote};
