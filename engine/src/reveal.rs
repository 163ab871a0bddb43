//! Staged reveal of conversion results.
//!
//! A new result is not shown immediately: it settles for a fixed delay first,
//! and the `calculating` flag is raised meanwhile. A newer result arriving
//! during the settle window replaces the pending one and restarts the window,
//! so a superseded value is never displayed.
//!
//! ```text
//!   Idle ──offer(v)──▶ Settling ──deadline──▶ Settled
//!                        ▲   │                  │
//!                        └───┘ offer(v')        │
//!                        ▲                      │
//!                        └──────offer(v')───────┘
//! ```
//!
//! Non-computable input (`None` or a non-finite value) never blanks the last
//! displayed result and does not touch a pending one.

use std::time::Duration;

use tokio::time::Instant;

/// Settle delay before a computed result is shown.
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Nothing has been displayed yet and nothing is pending.
    Idle,
    /// A result is waiting for its settle deadline.
    Settling,
    /// The displayed result is current.
    Settled,
}

/// Outcome of offering a raw result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealDecision {
    /// A settle window started (or restarted) for the offered value.
    Staged,
    /// Same value as the previous offer; nothing changed.
    Unchanged,
    /// `None` or non-finite; ignored.
    NotComputable,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    value: f64,
    due: Instant,
}

#[derive(Debug)]
pub struct StagedReveal {
    settle: Duration,
    displayed: Option<f64>,
    pending: Option<Pending>,
    last_offered: Option<f64>,
}

impl Default for StagedReveal {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLE)
    }
}

impl StagedReveal {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            displayed: None,
            pending: None,
            last_offered: None,
        }
    }

    pub fn offer(&mut self, raw: Option<f64>, now: Instant) -> RevealDecision {
        let previous = std::mem::replace(&mut self.last_offered, raw);

        let Some(value) = raw.filter(|v| v.is_finite()) else {
            return RevealDecision::NotComputable;
        };

        if previous == Some(value) {
            return RevealDecision::Unchanged;
        }

        self.pending = Some(Pending {
            value,
            due: now + self.settle,
        });
        RevealDecision::Staged
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Promote the pending value once its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<f64> {
        let pending = self.pending.filter(|p| p.due <= now)?;

        self.pending = None;
        self.displayed = Some(pending.value);
        Some(pending.value)
    }

    /// Drop the pending value (teardown). The displayed value is kept.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn displayed(&self) -> Option<f64> {
        self.displayed
    }

    pub fn is_calculating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn phase(&self) -> RevealPhase {
        match (self.pending, self.displayed) {
            (Some(_), _) => RevealPhase::Settling,
            (None, Some(_)) => RevealPhase::Settled,
            (None, None) => RevealPhase::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn superseded_value_is_never_displayed() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        assert_eq!(reveal.offer(Some(5.0), t0), RevealDecision::Staged);
        assert_eq!(reveal.offer(Some(7.0), t0 + ms(50)), RevealDecision::Staged);

        assert_eq!(reveal.fire(t0 + ms(1_000)), None);
        assert_eq!(reveal.displayed(), None);
        assert!(reveal.is_calculating());

        assert_eq!(reveal.fire(t0 + ms(1_050)), Some(7.0));
        assert_eq!(reveal.displayed(), Some(7.0));
        assert!(!reveal.is_calculating());
        assert_eq!(reveal.fire(t0 + ms(5_000)), None);
    }

    #[test]
    fn phases_follow_the_state_machine() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::default();
        assert_eq!(reveal.phase(), RevealPhase::Idle);

        reveal.offer(Some(1.0), t0);
        assert_eq!(reveal.phase(), RevealPhase::Settling);

        reveal.fire(t0 + DEFAULT_SETTLE);
        assert_eq!(reveal.phase(), RevealPhase::Settled);

        reveal.offer(Some(2.0), t0 + ms(2_000));
        assert_eq!(reveal.phase(), RevealPhase::Settling);
        assert_eq!(reveal.displayed(), Some(1.0));
    }

    #[test]
    fn not_computable_keeps_display_and_flag() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(3.0), t0);
        reveal.fire(t0 + ms(1_000));

        assert_eq!(reveal.offer(None, t0 + ms(1_100)), RevealDecision::NotComputable);
        assert_eq!(reveal.displayed(), Some(3.0));
        assert!(!reveal.is_calculating());

        reveal.offer(Some(4.0), t0 + ms(1_200));
        assert_eq!(reveal.offer(None, t0 + ms(1_300)), RevealDecision::NotComputable);
        assert!(reveal.is_calculating());
        assert_eq!(reveal.fire(t0 + ms(2_200)), Some(4.0));
    }

    #[test]
    fn non_finite_is_never_promoted() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(3.0), t0);
        reveal.fire(t0 + ms(1_000));

        assert_eq!(
            reveal.offer(Some(f64::INFINITY), t0 + ms(1_100)),
            RevealDecision::NotComputable
        );
        assert_eq!(
            reveal.offer(Some(f64::NAN), t0 + ms(1_200)),
            RevealDecision::NotComputable
        );
        assert!(!reveal.is_calculating());
        assert_eq!(reveal.displayed(), Some(3.0));
    }

    #[test]
    fn repeated_value_does_not_restart_settle() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(5.0), t0);
        assert_eq!(reveal.offer(Some(5.0), t0 + ms(900)), RevealDecision::Unchanged);

        assert_eq!(reveal.fire(t0 + ms(1_000)), Some(5.0));
    }

    #[test]
    fn value_after_gap_is_staged_again() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(5.0), t0);
        reveal.fire(t0 + ms(1_000));
        reveal.offer(None, t0 + ms(1_100));

        assert_eq!(reveal.offer(Some(5.0), t0 + ms(1_200)), RevealDecision::Staged);
        assert!(reveal.is_calculating());
    }

    #[test]
    fn zero_is_a_displayable_result() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(0.0), t0);
        assert_eq!(reveal.fire(t0 + ms(1_000)), Some(0.0));
    }

    #[test]
    fn cancel_drops_pending_only() {
        let t0 = Instant::now();
        let mut reveal = StagedReveal::new(ms(1_000));

        reveal.offer(Some(1.0), t0);
        reveal.fire(t0 + ms(1_000));
        reveal.offer(Some(2.0), t0 + ms(1_500));
        reveal.cancel();

        assert_eq!(reveal.fire(t0 + ms(10_000)), None);
        assert_eq!(reveal.displayed(), Some(1.0));
        assert_eq!(reveal.phase(), RevealPhase::Settled);
    }
}
