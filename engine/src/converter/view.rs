use query::FormState;

/// Inbound UI events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterEvent {
    /// Raw amount text as typed; persisted after the debounce period.
    AmountChanged(String),
    /// Persisted immediately.
    CurrencyFromChanged(String),
    /// Persisted immediately.
    CurrencyToChanged(String),
    /// Exchange both currencies in one store update.
    Swap,
    Shutdown,
}

/// Everything the UI renders, published as one immutable snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterView {
    /// Form fields as derived from the persisted query state.
    pub form: FormState,

    /// Amount text as last typed, possibly not yet persisted.
    pub amount_input: String,

    pub displayed_result: Option<f64>,
    pub is_calculating: bool,
    pub is_fetching_feed: bool,

    /// Currency codes available for selection, sorted.
    pub currency_options: Vec<String>,
}
