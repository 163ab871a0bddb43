//! Two-way bridge between the converter form and the query store.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::field::QueryField;
use crate::state::{PersistedState, QueryValue};
use crate::store::QueryStore;

pub struct QueryStateAdapter<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for QueryStateAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: QueryStore + ?Sized> QueryStateAdapter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Current snapshot of every key in the store.
    pub fn read_all(&self) -> Result<PersistedState> {
        self.store.snapshot().context("read query state")
    }

    /// Upsert one field. An empty value is written as `""`; the key is kept.
    #[instrument(skip_all, fields(field = %field), level = "debug")]
    pub fn write(&self, field: QueryField, value: impl Into<QueryValue>) -> Result<()> {
        let value = value.into().into_store_string();
        debug!(value = %value, "writing query field");

        self.store
            .set(field.as_str(), value)
            .with_context(|| format!("write query field {field}"))
    }

    /// Exchange `currencyFrom` and `currencyTo` in a single store update.
    #[instrument(skip_all, level = "debug")]
    pub fn swap_currencies(&self) -> Result<()> {
        self.store
            .update(&mut |state: &mut PersistedState| {
                let from = state.field(QueryField::CurrencyFrom).to_string();
                let to = state.field(QueryField::CurrencyTo).to_string();

                state.set(QueryField::CurrencyFrom.as_str(), to);
                state.set(QueryField::CurrencyTo.as_str(), from);
            })
            .context("swap currencies")
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
