//! ConverterService
//!
//! Single task that owns the whole conversion pipeline:
//!   • loads the price feed once and installs the normalized index
//!   • debounces typed amounts before writing them to the query store
//!   • re-reads the store on every change notification and re-derives
//!     the form and the raw result in the same step
//!   • stages results through the settle delay before publishing them
//!
//! Every event is handled to completion before the next one is polled, so
//! the published view never reflects a half-applied update.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use common::logger::{TraceId, root_span};
use feed::{FeedError, PriceIndex, PriceSource, load_index};
use query::{FormState, QueryField, QueryStateAdapter, QueryStore};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{Instrument, debug, error, info, warn};

use super::handle::ConverterHandle;
use super::view::{ConverterEvent, ConverterView};
use crate::compute::{ComputationTrigger, ConvertError};
use crate::config::ConverterConfig;
use crate::debounce::Debouncer;
use crate::reveal::{RevealDecision, StagedReveal};

type FeedLoad = Pin<Box<dyn Future<Output = Result<PriceIndex, FeedError>> + Send>>;

pub struct ConverterService {
    adapter: QueryStateAdapter<dyn QueryStore>,
    source: Arc<dyn PriceSource>,
    events: mpsc::Receiver<ConverterEvent>,
    view: watch::Sender<ConverterView>,

    trigger: ComputationTrigger,
    amount: Debouncer<String>,
    reveal: StagedReveal,

    form: FormState,
    currency_options: Vec<String>,
    is_fetching_feed: bool,
}

impl ConverterService {
    /// Build the service and its UI handle without starting it.
    pub fn new(
        config: &ConverterConfig,
        source: Arc<dyn PriceSource>,
        store: Arc<dyn QueryStore>,
    ) -> (Self, ConverterHandle) {
        let (event_tx, event_rx) = mpsc::channel(config.event_queue_capacity);
        let (view_tx, view_rx) = watch::channel(ConverterView {
            is_fetching_feed: true,
            ..Default::default()
        });

        let service = Self {
            adapter: QueryStateAdapter::new(store),
            source,
            events: event_rx,
            view: view_tx,
            trigger: ComputationTrigger::new(),
            amount: Debouncer::new(String::new(), config.debounce),
            reveal: StagedReveal::new(config.settle),
            form: FormState::default(),
            currency_options: Vec::new(),
            is_fetching_feed: true,
        };

        (service, ConverterHandle::new(event_tx, view_rx))
    }

    /// Build and spawn the service on the current runtime.
    pub fn spawn(
        config: &ConverterConfig,
        source: Arc<dyn PriceSource>,
        store: Arc<dyn QueryStore>,
    ) -> (ConverterHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(config, source, store);
        let span = tracing::info_span!("converter");
        let task = tokio::spawn(service.run().instrument(span));
        (handle, task)
    }

    pub async fn run(mut self) {
        info!("converter started");

        let mut store_rx = self.adapter.subscribe();

        // Mount: take the initial amount from the persisted state.
        self.sync_from_store(true);
        self.publish();

        let mut feed = self.start_feed_load();
        let mut feed_pending = true;

        loop {
            let debounce_at = self.amount.deadline();
            let settle_at = self.reveal.deadline();

            tokio::select! {
                biased;

                event = self.events.recv() => match event {
                    Some(ConverterEvent::Shutdown) | None => break,
                    Some(event) => self.handle_event(event),
                },

                changed = store_rx.changed() => {
                    if changed.is_err() {
                        warn!("query store closed; stopping converter");
                        break;
                    }
                    self.sync_from_store(false);
                }

                result = &mut feed, if feed_pending => {
                    feed_pending = false;
                    self.apply_feed(result);
                }

                _ = sleep_until_opt(debounce_at) => self.flush_amount(),

                _ = sleep_until_opt(settle_at) => self.settle(),
            }

            self.publish();
        }

        // Teardown: nothing propagates once the loop is gone.
        if let Some(dropped) = self.amount.cancel() {
            debug!(amount = %dropped, "pending amount discarded on shutdown");
        }
        self.reveal.cancel();
        self.publish();

        info!("converter stopped");
    }

    fn start_feed_load(&self) -> FeedLoad {
        let source = Arc::clone(&self.source);
        let span = root_span("feed_load", &TraceId::default());

        Box::pin(async move { load_index(source.as_ref()).await }.instrument(span))
    }

    fn handle_event(&mut self, event: ConverterEvent) {
        let result = match event {
            ConverterEvent::AmountChanged(amount) => {
                debug!(amount = %amount, "amount typed");
                self.amount.push(amount, Instant::now());
                Ok(())
            }
            ConverterEvent::CurrencyFromChanged(currency) => {
                self.adapter.write(QueryField::CurrencyFrom, currency)
            }
            ConverterEvent::CurrencyToChanged(currency) => {
                self.adapter.write(QueryField::CurrencyTo, currency)
            }
            ConverterEvent::Swap => self.adapter.swap_currencies(),
            ConverterEvent::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            error!(error = ?e, "failed to write query state");
        }
    }

    fn flush_amount(&mut self) {
        let Some(amount) = self.amount.fire(Instant::now()) else {
            return;
        };

        debug!(amount = %amount, "debounced amount persisted");
        if let Err(e) = self.adapter.write(QueryField::Amount, amount) {
            error!(error = ?e, "failed to persist amount");
        }
    }

    /// Read the store and re-derive form and result in one step.
    fn sync_from_store(&mut self, mount: bool) {
        let state = match self.adapter.read_all() {
            Ok(state) => state,
            Err(e) => {
                error!(error = ?e, "failed to read query state");
                return;
            }
        };

        let form = state.form();

        // An amount we did not write ourselves came from navigation or a
        // shared link: it overrides any edit still waiting in the debouncer.
        if mount || form.amount != *self.amount.lagged() {
            if !mount {
                debug!(amount = %form.amount, "amount changed externally");
            }
            self.amount.reset(form.amount.clone());
        }

        self.form = form;

        let raw = self.trigger.on_state(state);
        self.offer(raw);
    }

    fn apply_feed(&mut self, result: Result<PriceIndex, FeedError>) {
        self.is_fetching_feed = false;

        match result {
            Ok(index) => {
                self.currency_options = index.currencies();
                info!(currencies = index.len(), "price index installed");

                let raw = self.trigger.on_prices(Arc::new(index));
                self.offer(raw);
            }
            Err(e) => {
                error!(error = %e, "price feed unavailable; no conversions this session");
            }
        }
    }

    fn offer(&mut self, raw: Result<f64, ConvertError>) {
        let value = match raw {
            Ok(v) => Some(v),
            Err(reason) => {
                debug!(%reason, "conversion not computable");
                None
            }
        };

        match self.reveal.offer(value, Instant::now()) {
            RevealDecision::Staged => debug!(result = ?value, "result settling"),
            RevealDecision::NotComputable => {
                if let Some(v) = value {
                    warn!(result = v, "non-finite conversion result rejected");
                }
            }
            RevealDecision::Unchanged => {}
        }
    }

    fn settle(&mut self) {
        if let Some(result) = self.reveal.fire(Instant::now()) {
            info!(
                result,
                from = %self.form.currency_from,
                to = %self.form.currency_to,
                amount = %self.form.amount,
                "conversion result displayed"
            );
        }
    }

    fn current_view(&self) -> ConverterView {
        ConverterView {
            form: self.form.clone(),
            amount_input: self.amount.latest().clone(),
            displayed_result: self.reveal.displayed(),
            is_calculating: self.reveal.is_calculating(),
            is_fetching_feed: self.is_fetching_feed,
            currency_options: self.currency_options.clone(),
        }
    }

    fn publish(&self) {
        let next = self.current_view();

        self.view.send_if_modified(|view| {
            if *view == next {
                return false;
            }
            *view = next;
            true
        });
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
