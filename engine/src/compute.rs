//! Computation trigger.
//!
//! Derives the raw conversion result from the latest price index and the
//! latest persisted form state. Pure: no timers, no I/O.
//!
//! ```text
//! result = (price_from / price_to) * amount
//! ```

use std::sync::Arc;

use feed::PriceIndex;
use query::{PersistedState, QueryField};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    #[error("amount {0:?} is not a finite number")]
    UnparseableAmount(String),

    #[error("no price known for currency {0:?}")]
    UnknownCurrency(String),
}

/// Parse the amount field. Blank and non-finite input is rejected.
pub fn parse_amount(raw: &str) -> Result<f64, ConvertError> {
    let trimmed = raw.trim();

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConvertError::UnparseableAmount(raw.to_string()))
}

/// Convert the persisted amount from `currencyFrom` into `currencyTo`.
///
/// The result is returned even when non-finite (a feed price of zero); the
/// staged reveal refuses to show such values.
pub fn try_convert(index: &PriceIndex, state: &PersistedState) -> Result<f64, ConvertError> {
    let amount = parse_amount(state.field(QueryField::Amount))?;

    let price_of = |field: QueryField| {
        let code = state.field(field);
        index
            .price(code)
            .ok_or_else(|| ConvertError::UnknownCurrency(code.to_string()))
    };

    let price_from = price_of(QueryField::CurrencyFrom)?;
    let price_to = price_of(QueryField::CurrencyTo)?;

    Ok((price_from / price_to) * amount)
}

/// `None` when the conversion is not computable.
pub fn raw_result(index: &PriceIndex, state: &PersistedState) -> Option<f64> {
    try_convert(index, state).ok()
}

/// Keeps the latest inputs and re-derives the raw result whenever either
/// one is replaced.
#[derive(Debug, Default)]
pub struct ComputationTrigger {
    index: Arc<PriceIndex>,
    state: PersistedState,
    raw: Option<f64>,
}

impl ComputationTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly loaded price index and recompute.
    pub fn on_prices(&mut self, index: Arc<PriceIndex>) -> Result<f64, ConvertError> {
        self.index = index;
        self.recompute()
    }

    /// Install a freshly read persisted state and recompute.
    pub fn on_state(&mut self, state: PersistedState) -> Result<f64, ConvertError> {
        self.state = state;
        self.recompute()
    }

    pub fn raw(&self) -> Option<f64> {
        self.raw
    }

    pub fn index(&self) -> &PriceIndex {
        &self.index
    }

    pub fn state(&self) -> &PersistedState {
        &self.state
    }

    fn recompute(&mut self) -> Result<f64, ConvertError> {
        let result = try_convert(&self.index, &self.state);
        self.raw = result.as_ref().ok().copied();
        result
    }
}
