use std::sync::Arc;

use query::{InMemoryQueryStore, PersistedState, QueryField, QueryStateAdapter, QueryStore};

fn adapter_with(query: &str) -> (Arc<InMemoryQueryStore>, QueryStateAdapter<InMemoryQueryStore>) {
    let store = Arc::new(InMemoryQueryStore::from_query(query));
    let adapter = QueryStateAdapter::new(store.clone());
    (store, adapter)
}

#[test]
fn read_all_returns_every_key() -> anyhow::Result<()> {
    let (_, adapter) = adapter_with("amount=100&currencyFrom=USD&currencyTo=EUR&utm=x");

    let state = adapter.read_all()?;

    assert_eq!(state.len(), 4);
    assert_eq!(state.form().amount, "100");
    assert_eq!(state.get("utm"), Some("x"));
    Ok(())
}

#[test]
fn write_none_stores_empty_string_and_keeps_key() -> anyhow::Result<()> {
    let (store, adapter) = adapter_with("amount=100");

    adapter.write(QueryField::Amount, None::<f64>)?;

    let snap = store.snapshot()?;
    assert_eq!(snap.get("amount"), Some(""));
    Ok(())
}

#[test]
fn write_number_and_text() -> anyhow::Result<()> {
    let (_, adapter) = adapter_with("");

    adapter.write(QueryField::Amount, 42.5)?;
    adapter.write(QueryField::CurrencyTo, "ETH")?;

    let state = adapter.read_all()?;
    assert_eq!(state.field(QueryField::Amount), "42.5");
    assert_eq!(state.field(QueryField::CurrencyTo), "ETH");
    Ok(())
}

#[test]
fn writes_to_different_keys_do_not_clobber_each_other() -> anyhow::Result<()> {
    let (store, _) = adapter_with("");
    let a = QueryStateAdapter::new(store.clone());
    let b = QueryStateAdapter::new(store.clone());

    a.write(QueryField::CurrencyFrom, "USD")?;
    b.write(QueryField::CurrencyTo, "EUR")?;
    a.write(QueryField::CurrencyFrom, "ATOM")?;

    let state = store.snapshot()?;
    assert_eq!(state.field(QueryField::CurrencyFrom), "ATOM");
    assert_eq!(state.field(QueryField::CurrencyTo), "EUR");
    Ok(())
}

#[test]
fn swap_twice_restores_original() -> anyhow::Result<()> {
    let (_, adapter) = adapter_with("amount=3&currencyFrom=USD&currencyTo=EUR");
    let original = adapter.read_all()?;

    adapter.swap_currencies()?;
    let swapped = adapter.read_all()?;
    assert_eq!(swapped.field(QueryField::CurrencyFrom), "EUR");
    assert_eq!(swapped.field(QueryField::CurrencyTo), "USD");

    adapter.swap_currencies()?;
    assert_eq!(adapter.read_all()?, original);
    Ok(())
}

#[test]
fn swap_with_one_side_missing_fills_empty() -> anyhow::Result<()> {
    let (_, adapter) = adapter_with("currencyFrom=USD");

    adapter.swap_currencies()?;

    let state = adapter.read_all()?;
    assert_eq!(state.get("currencyFrom"), Some(""));
    assert_eq!(state.get("currencyTo"), Some("USD"));
    Ok(())
}

#[test]
fn swap_is_a_single_notification() -> anyhow::Result<()> {
    let (store, adapter) = adapter_with("currencyFrom=USD&currencyTo=EUR");
    let rx = adapter.subscribe();
    let before = *rx.borrow();

    adapter.swap_currencies()?;

    assert_eq!(*rx.borrow(), before + 1);
    assert_eq!(store.history_len(), 1);
    Ok(())
}

#[test]
fn external_navigation_is_visible_on_next_read() -> anyhow::Result<()> {
    let (store, adapter) = adapter_with("amount=1");
    let rx = adapter.subscribe();

    store.replace(PersistedState::from_query_string("amount=9&currencyFrom=ETH"))?;

    assert!(rx.has_changed()?);
    assert_eq!(adapter.read_all()?.form().currency_from, "ETH");

    assert!(store.back());
    assert_eq!(adapter.read_all()?.form().amount, "1");
    Ok(())
}
