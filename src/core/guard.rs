//! Single-flight guard for page fetches.
//!
//! At most one fetch holds the guard. What happens to triggers that arrive
//! while it is held depends on [`OverlapPolicy`]. Under `LatestWins` only the
//! most recent trigger is remembered; the holder picks it up through
//! [`FetchPermit::advance`] once its own fetch resolves. Every admitted or
//! queued trigger gets a generation number, and a result may only be applied
//! while its generation is still the latest one.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Overlapping triggers are discarded.
    Drop,
    /// The newest overlapping trigger runs after the current one.
    #[default]
    LatestWins,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Drop => f.write_str("drop"),
            OverlapPolicy::LatestWins => f.write_str("latest_wins"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuardStats {
    pub entered: u64,
    pub queued: u64,
    pub coalesced: u64,
    pub dropped: u64,
}

#[derive(Debug)]
pub enum Admission<T> {
    /// The caller holds the guard and must run the fetch.
    Entered(FetchPermit<T>),
    /// Remembered as the next fetch for the current holder.
    Queued,
    /// Identical to the in-flight request, which is now current again.
    Coalesced,
    Dropped,
}

struct Ticket<T> {
    generation: u64,
    request: T,
}

struct GuardState<T> {
    active: Option<Ticket<T>>,
    pending: Option<Ticket<T>>,
    latest: u64,
    next_generation: u64,
    stats: GuardStats,
}

impl<T> GuardState<T> {
    fn issue(&mut self, request: T) -> Ticket<T> {
        self.next_generation += 1;
        self.latest = self.next_generation;
        Ticket {
            generation: self.next_generation,
            request,
        }
    }
}

pub struct FetchGuard<T> {
    state: Arc<Mutex<GuardState<T>>>,
    policy: OverlapPolicy,
}

fn lock<T>(state: &Mutex<GuardState<T>>) -> MutexGuard<'_, GuardState<T>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone + PartialEq> FetchGuard<T> {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self {
            state: Arc::new(Mutex::new(GuardState {
                active: None,
                pending: None,
                latest: 0,
                next_generation: 0,
                stats: GuardStats::default(),
            })),
            policy,
        }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    pub fn try_enter(&self, request: T) -> Admission<T> {
        let mut state = lock(&self.state);

        let Some((active_generation, same_as_active)) = state
            .active
            .as_ref()
            .map(|active| (active.generation, active.request == request))
        else {
            let ticket = state.issue(request.clone());
            let generation = ticket.generation;
            state.active = Some(ticket);
            state.stats.entered += 1;
            return Admission::Entered(FetchPermit {
                state: Arc::clone(&self.state),
                generation,
                request,
                released: false,
            });
        };

        match self.policy {
            OverlapPolicy::Drop => {
                state.stats.dropped += 1;
                Admission::Dropped
            }
            OverlapPolicy::LatestWins if same_as_active => {
                // Back to what is already in flight: forget anything queued
                state.pending = None;
                state.latest = active_generation;
                state.stats.coalesced += 1;
                Admission::Coalesced
            }
            OverlapPolicy::LatestWins => {
                let already_pending = state
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.request == request);
                if already_pending {
                    state.stats.coalesced += 1;
                    return Admission::Coalesced;
                }
                let ticket = state.issue(request);
                state.pending = Some(ticket);
                state.stats.queued += 1;
                Admission::Queued
            }
        }
    }

    pub fn is_held(&self) -> bool {
        lock(&self.state).active.is_some()
    }

    pub fn has_pending(&self) -> bool {
        lock(&self.state).pending.is_some()
    }

    pub fn stats(&self) -> GuardStats {
        lock(&self.state).stats
    }
}

/// Proof of holding the guard. Dropping it releases the guard and forgets
/// any queued trigger.
pub struct FetchPermit<T> {
    state: Arc<Mutex<GuardState<T>>>,
    generation: u64,
    request: T,
    released: bool,
}

impl<T> FetchPermit<T> {
    pub fn request(&self) -> &T {
        &self.request
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a result for this permit may still be applied.
    pub fn is_current(&self) -> bool {
        lock(&self.state).latest == self.generation
    }
}

impl<T: Clone> FetchPermit<T> {
    /// Hand the guard to the queued trigger, or release it when none is
    /// waiting. The check and the release happen under one lock, so a
    /// trigger is never lost between them.
    pub fn advance(mut self) -> Option<FetchPermit<T>> {
        let mut state = lock(&self.state);
        self.released = true;

        match state.pending.take() {
            Some(ticket) => {
                let generation = ticket.generation;
                let request = ticket.request;
                state.active = Some(Ticket {
                    generation,
                    request: request.clone(),
                });
                drop(state);
                Some(FetchPermit {
                    state: Arc::clone(&self.state),
                    generation,
                    request,
                    released: false,
                })
            }
            None => {
                state.active = None;
                None
            }
        }
    }
}

impl<T> Drop for FetchPermit<T> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let mut state = lock(&self.state);
        state.active = None;
        state.pending = None;
    }
}

impl<T: fmt::Debug> fmt::Debug for FetchPermit<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchPermit")
            .field("generation", &self.generation)
            .field("request", &self.request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entered(admission: Admission<u32>) -> FetchPermit<u32> {
        match admission {
            Admission::Entered(permit) => permit,
            other => panic!("Expected Entered, got {:?}", other),
        }
    }

    #[test]
    fn test_first_trigger_enters() {
        let guard = FetchGuard::new(OverlapPolicy::LatestWins);
        let permit = entered(guard.try_enter(1));
        assert!(guard.is_held());
        assert!(permit.is_current());
        assert_eq!(*permit.request(), 1);

        assert!(permit.advance().is_none());
        assert!(!guard.is_held());
    }

    #[test]
    fn test_drop_policy_discards_overlap() {
        let guard = FetchGuard::new(OverlapPolicy::Drop);
        let permit = entered(guard.try_enter(1));
        assert!(matches!(guard.try_enter(2), Admission::Dropped));
        assert!(matches!(guard.try_enter(3), Admission::Dropped));
        assert!(permit.is_current());
        assert!(permit.advance().is_none());
        assert_eq!(guard.stats().dropped, 2);
    }

    #[test]
    fn test_identical_triggers_coalesce() {
        let guard = FetchGuard::new(OverlapPolicy::LatestWins);
        let permit = entered(guard.try_enter(7));
        for _ in 0..5 {
            assert!(matches!(guard.try_enter(7), Admission::Coalesced));
        }
        assert!(!guard.has_pending());
        assert!(permit.is_current());
        assert!(permit.advance().is_none());
        assert_eq!(guard.stats().entered, 1);
    }

    #[test]
    fn test_latest_trigger_wins() {
        let guard = FetchGuard::new(OverlapPolicy::LatestWins);
        let first = entered(guard.try_enter(1));
        assert!(matches!(guard.try_enter(2), Admission::Queued));
        assert!(matches!(guard.try_enter(3), Admission::Queued));
        assert!(!first.is_current());

        let next = first.advance().expect("queued trigger");
        assert_eq!(*next.request(), 3);
        assert!(next.is_current());
        assert!(guard.is_held());
        assert!(next.advance().is_none());
        assert!(!guard.is_held());
    }

    #[test]
    fn test_returning_to_in_flight_request_clears_queue() {
        let guard = FetchGuard::new(OverlapPolicy::LatestWins);
        let first = entered(guard.try_enter(1));
        assert!(matches!(guard.try_enter(2), Admission::Queued));
        assert!(matches!(guard.try_enter(1), Admission::Coalesced));
        assert!(first.is_current());
        assert!(first.advance().is_none());
    }

    #[test]
    fn test_dropping_permit_releases_guard() {
        let guard = FetchGuard::new(OverlapPolicy::LatestWins);
        {
            let _permit = entered(guard.try_enter(1));
            assert!(matches!(guard.try_enter(2), Admission::Queued));
        }
        assert!(!guard.is_held());
        assert!(!guard.has_pending());
        let _again = entered(guard.try_enter(2));
    }

    #[test]
    fn test_policy_default_and_serde() {
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::LatestWins);
        let parsed: OverlapPolicy = serde_json::from_str("\"drop\"").expect("parse");
        assert_eq!(parsed, OverlapPolicy::Drop);
        assert_eq!(OverlapPolicy::LatestWins.to_string(), "latest_wins");
    }
}
