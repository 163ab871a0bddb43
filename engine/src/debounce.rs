//! Debouncer
//!
//! Holds back a changing value until it has been stable for a quiet period.
//! The debouncer owns at most one pending timer, expressed as a deadline;
//! the caller sleeps until [`Debouncer::deadline`] and then calls
//! [`Debouncer::fire`].

use std::time::Duration;

use tokio::time::Instant;

/// Quiet period used for typed input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    due: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    lagged: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            lagged: initial,
            pending: None,
        }
    }

    pub fn with_default_delay(initial: T) -> Self {
        Self::new(initial, DEFAULT_DEBOUNCE)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new input value, replacing any pending one and restarting the
    /// timer. Equal values are not special-cased.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Propagate the pending value if its deadline has passed.
    ///
    /// Returns the newly lagged value exactly once per quiet period.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.due <= now => {}
            _ => return None,
        }

        let Pending { value, .. } = self.pending.take()?;
        self.lagged = value.clone();
        Some(value)
    }

    /// Drop the pending value without propagating it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Cancel anything pending and jump the lagged value to `value`.
    pub fn reset(&mut self, value: T) {
        self.pending = None;
        self.lagged = value;
    }

    pub fn lagged(&self) -> &T {
        &self.lagged
    }

    /// The most recent input: pending if there is one, otherwise lagged.
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map_or(&self.lagged, |p| &p.value)
    }
}
