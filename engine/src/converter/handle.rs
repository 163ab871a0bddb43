use tokio::sync::{mpsc, watch};

use super::view::{ConverterEvent, ConverterView};
use crate::error::ConverterError;

/// UI-side handle to a running converter.
///
/// The converter stops once every handle is dropped or [`shutdown`] is
/// called; pending timers die with it.
///
/// [`shutdown`]: ConverterHandle::shutdown
#[derive(Clone)]
pub struct ConverterHandle {
    events: mpsc::Sender<ConverterEvent>,
    view: watch::Receiver<ConverterView>,
}

impl ConverterHandle {
    pub(crate) fn new(
        events: mpsc::Sender<ConverterEvent>,
        view: watch::Receiver<ConverterView>,
    ) -> Self {
        Self { events, view }
    }

    pub async fn on_amount_change(&self, amount: impl Into<String>) -> Result<(), ConverterError> {
        self.send(ConverterEvent::AmountChanged(amount.into())).await
    }

    pub async fn on_currency_from_change(
        &self,
        currency: impl Into<String>,
    ) -> Result<(), ConverterError> {
        self.send(ConverterEvent::CurrencyFromChanged(currency.into()))
            .await
    }

    pub async fn on_currency_to_change(
        &self,
        currency: impl Into<String>,
    ) -> Result<(), ConverterError> {
        self.send(ConverterEvent::CurrencyToChanged(currency.into()))
            .await
    }

    pub async fn on_swap(&self) -> Result<(), ConverterError> {
        self.send(ConverterEvent::Swap).await
    }

    pub async fn shutdown(&self) -> Result<(), ConverterError> {
        self.send(ConverterEvent::Shutdown).await
    }

    /// Latest published view.
    pub fn view(&self) -> ConverterView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change.
    pub fn subscribe(&self) -> watch::Receiver<ConverterView> {
        self.view.clone()
    }

    /// Wait until the view satisfies `pred` and return that view.
    pub async fn wait_for(
        &self,
        pred: impl FnMut(&ConverterView) -> bool,
    ) -> Result<ConverterView, ConverterError> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(pred).await.map_err(|_| ConverterError::Closed)?;
        Ok(view.clone())
    }

    async fn send(&self, event: ConverterEvent) -> Result<(), ConverterError> {
        self.events
            .send(event)
            .await
            .map_err(|_| ConverterError::Closed)
    }
}
