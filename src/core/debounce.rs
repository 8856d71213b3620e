use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// Quiet period for geographic option search input.
pub const GEO_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A value whose updates only take effect after a quiet period.
///
/// Every [`push`](Debounced::push) restarts the timer. Time comes from
/// `tokio::time`, so tests can drive it with a paused clock.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, Instant)>,
    delay: Duration,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            settled: initial,
            pending: None,
            delay,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Latest raw input, settled or not.
    pub fn raw(&self) -> &T {
        self.pending
            .as_ref()
            .map(|(value, _)| value)
            .unwrap_or(&self.settled)
    }

    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Settle the pending value if its quiet period has elapsed.
    /// Returns true when the settled value changed.
    pub fn poll(&mut self) -> bool {
        match self.deadline() {
            Some(deadline) if deadline <= Instant::now() => self.settle_now(),
            _ => false,
        }
    }

    /// Wait out the current quiet period, then settle.
    pub async fn settle(&mut self) -> bool {
        if let Some(deadline) = self.deadline() {
            sleep_until(deadline).await;
        }
        self.poll()
    }

    /// Skip the remaining wait.
    pub fn settle_now(&mut self) -> bool {
        match self.pending.take() {
            Some((value, _)) if value != self.settled => {
                self.settled = value;
                true
            }
            _ => false,
        }
    }
}
