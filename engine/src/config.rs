use std::time::Duration;

use feed::DEFAULT_FEED_URL;
use tracing::warn;

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::reveal::DEFAULT_SETTLE;

#[derive(Clone, Debug)]
pub struct ConverterConfig {
    /// Endpoint serving the JSON price list.
    pub feed_url: String,

    /// Quiet period before a typed amount is written to the query state.
    ///
    /// Too low => the store (and any shared link) churns on every keystroke.
    pub debounce: Duration,

    /// Delay before a freshly computed result replaces the displayed one.
    pub settle: Duration,

    /// Timeout for the single feed request.
    pub feed_timeout: Duration,

    /// Capacity of the UI → converter event channel.
    ///
    /// Acts as backpressure for bursts of input events.
    pub event_queue_capacity: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            debounce: DEFAULT_DEBOUNCE,
            settle: DEFAULT_SETTLE,
            feed_timeout: Duration::from_secs(5),
            event_queue_capacity: 64,
        }
    }
}

impl ConverterConfig {
    /// Read `FEED_URL`, `DEBOUNCE_MS`, `SETTLE_MS` and `FEED_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or invalid values keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            feed_url: lookup("FEED_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.feed_url),
            debounce: duration_from(&lookup, "DEBOUNCE_MS", Duration::from_millis)
                .unwrap_or(defaults.debounce),
            settle: duration_from(&lookup, "SETTLE_MS", Duration::from_millis)
                .unwrap_or(defaults.settle),
            feed_timeout: duration_from(&lookup, "FEED_TIMEOUT_SECS", Duration::from_secs)
                .unwrap_or(defaults.feed_timeout),
            event_queue_capacity: defaults.event_queue_capacity,
        }
    }
}

fn duration_from(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    unit: fn(u64) -> Duration,
) -> Option<Duration> {
    let raw = lookup(key)?;

    match raw.trim().parse::<u64>() {
        Ok(v) => Some(unit(v)),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "invalid duration in environment; using default");
            None
        }
    }
}
