use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown query field: {0}")]
    UnknownField(String),
}

/// Form fields mirrored into the query state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryField {
    Amount,
    CurrencyFrom,
    CurrencyTo,
}

impl QueryField {
    pub const ALL: [QueryField; 3] = [
        QueryField::Amount,
        QueryField::CurrencyFrom,
        QueryField::CurrencyTo,
    ];

    /// Key used in the store and in shared links.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryField::Amount => "amount",
            QueryField::CurrencyFrom => "currencyFrom",
            QueryField::CurrencyTo => "currencyTo",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| QueryError::UnknownField(s.to_string()))
    }
}
