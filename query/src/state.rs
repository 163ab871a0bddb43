use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::field::QueryField;

/// Value accepted by a single-key write. `Empty` is stored as `""`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Text(String),
    Number(f64),
    Empty,
}

impl QueryValue {
    pub fn into_store_string(self) -> String {
        match self {
            QueryValue::Text(s) => s,
            QueryValue::Number(n) => n.to_string(),
            QueryValue::Empty => String::new(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Number(v)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(QueryValue::Empty, Into::into)
    }
}

/// Snapshot of the store: field name → string.
///
/// Keys the converter does not know about are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    values: BTreeMap<String, String>,
}

impl PersistedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value of a form field, `""` when absent.
    pub fn field(&self, field: QueryField) -> &str {
        self.get(field.as_str()).unwrap_or_default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, field: QueryField, value: impl Into<String>) -> Self {
        self.set(field.as_str(), value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Form fields derived from this snapshot.
    pub fn form(&self) -> FormState {
        FormState {
            currency_from: self.field(QueryField::CurrencyFrom).to_string(),
            currency_to: self.field(QueryField::CurrencyTo).to_string(),
            amount: self.field(QueryField::Amount).to_string(),
        }
    }

    /// Encode as a URL query string (without the leading `?`).
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values.iter())
            .finish()
    }

    /// Decode a shared link's query string. A leading `?` is ignored and a
    /// repeated key keeps its last value.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let values = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self { values }
    }
}

impl FromIterator<(String, String)> for PersistedState {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// What the form shows. Always re-derived from [`PersistedState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub currency_from: String,
    pub currency_to: String,
    pub amount: String,
}
