//! Single-flight coordination of access-token refreshes.
//!
//! The first request to see a 401 becomes the *leader* and performs the
//! refresh. Requests that hit a 401 while the leader is working become
//! *followers*: each parks a oneshot waiter in a FIFO queue and is woken with
//! the leader's outcome. The check-and-set of the `refreshing` flag happens
//! under a mutex with no `.await` in between, so at most one refresh is in
//! flight per gate.

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::oneshot;

/// Outcome delivered to every waiter of one refresh cycle: the new access
/// token, or the reason the refresh failed.
pub type RefreshOutcome = Result<String, String>;

#[derive(Default)]
struct GateState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Result of [`RefreshGate::enter`].
pub enum Entry<'a> {
    /// A refresh already finished after the caller's request went out; retry
    /// with this token without refreshing again.
    Fresh(String),
    /// The caller must perform the refresh and report through the guard.
    Leader(LeaderGuard<'a>),
    /// Another task is refreshing; await the outcome.
    Follower(oneshot::Receiver<RefreshOutcome>),
}

#[derive(Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

impl RefreshGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the current refresh cycle or start a new one.
    ///
    /// `fresh_token` is evaluated under the gate lock when no refresh is in
    /// flight; returning `Some` means the stored token already differs from
    /// the one the failed request carried.
    pub fn enter(&self, fresh_token: impl FnOnce() -> Option<String>) -> Entry<'_> {
        let mut state = self.lock();
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            log::debug!("Refresh in flight, queued request ({} waiting)", state.waiters.len());
            return Entry::Follower(rx);
        }
        if let Some(token) = fresh_token() {
            return Entry::Fresh(token);
        }
        state.refreshing = true;
        Entry::Leader(LeaderGuard {
            gate: self,
            finished: false,
        })
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of requests parked behind the in-flight refresh.
    #[cfg(test)]
    fn queued(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Drain the queue in FIFO order, delivering `outcome` to each waiter,
    /// and return to idle. Returns the number of waiters drained.
    fn complete(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };
        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose request was dropped is simply skipped.
            let _ = waiter.send(outcome.clone());
        }
        count
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Proof that the holder owns the current refresh cycle.
///
/// Dropping the guard without calling [`LeaderGuard::finish`] (for example
/// when the leader's future is cancelled) rejects every queued waiter and
/// returns the gate to idle.
pub struct LeaderGuard<'a> {
    gate: &'a RefreshGate,
    finished: bool,
}

impl LeaderGuard<'_> {
    /// Publish the refresh outcome to all followers.
    pub fn finish(mut self, outcome: &RefreshOutcome) -> usize {
        self.finished = true;
        self.gate.complete(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let rejected = self
                .gate
                .complete(&Err("token refresh was cancelled".to_string()));
            log::warn!("Token refresh cancelled, rejected {} queued requests", rejected);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn leader(entry: Entry<'_>) -> LeaderGuard<'_> {
        match entry {
            Entry::Leader(guard) => guard,
            _ => panic!("expected to lead the refresh"),
        }
    }

    fn follower(entry: Entry<'_>) -> oneshot::Receiver<RefreshOutcome> {
        match entry {
            Entry::Follower(rx) => rx,
            _ => panic!("expected to follow the refresh"),
        }
    }

    #[tokio::test]
    async fn test_single_leader_while_refreshing() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        assert!(gate.is_refreshing());

        let rx1 = follower(gate.enter(|| None));
        let rx2 = follower(gate.enter(|| None));
        assert_eq!(gate.queued(), 2);

        assert_eq!(guard.finish(&Ok("A2".to_string())), 2);
        assert!(!gate.is_refreshing());
        assert_eq!(gate.queued(), 0);

        assert_eq!(rx1.await.unwrap(), Ok("A2".to_string()));
        assert_eq!(rx2.await.unwrap(), Ok("A2".to_string()));
    }

    #[tokio::test]
    async fn test_followers_ignore_fresh_token_check() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        // Even if the token already changed, a follower waits for the leader.
        let rx = follower(gate.enter(|| Some("A2".to_string())));
        guard.finish(&Ok("A2".to_string()));
        assert_eq!(rx.await.unwrap(), Ok("A2".to_string()));
    }

    #[test]
    fn test_fresh_token_skips_refresh() {
        let gate = RefreshGate::new();
        match gate.enter(|| Some("A2".to_string())) {
            Entry::Fresh(token) => assert_eq!(token, "A2"),
            _ => panic!("expected fresh token"),
        }
        assert!(!gate.is_refreshing());
    }

    #[tokio::test]
    async fn test_failure_rejects_all_waiters() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        let rx = follower(gate.enter(|| None));

        guard.finish(&Err("refresh rejected".to_string()));
        assert_eq!(rx.await.unwrap(), Err("refresh rejected".to_string()));
        assert!(!gate.is_refreshing());
    }

    #[tokio::test]
    async fn test_dropped_leader_resets_gate() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        let rx = follower(gate.enter(|| None));

        drop(guard);
        assert!(rx.await.unwrap().is_err());
        assert!(!gate.is_refreshing());

        // The next 401 starts a new cycle.
        let _guard = leader(gate.enter(|| None));
    }

    #[test]
    fn test_outcome_delivered_before_finish_returns() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        let mut receivers: Vec<_> = (0..4).map(|_| follower(gate.enter(|| None))).collect();

        assert_eq!(guard.finish(&Ok("A2".to_string())), 4);
        for rx in receivers.iter_mut() {
            assert_eq!(rx.try_recv().unwrap(), Ok("A2".to_string()));
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_waiters_drained_in_arrival_order() {
        let gate = RefreshGate::new();
        let guard = leader(gate.enter(|| None));
        let receivers: Vec<_> = (0..4).map(|_| follower(gate.enter(|| None))).collect();

        // Spawn in reverse so wake order, not spawn order, decides the log.
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut handles = Vec::new();
        for (i, rx) in receivers.into_iter().enumerate().rev() {
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                let outcome = rx.await.unwrap();
                order.lock().unwrap().push(i);
                outcome
            }));
        }
        // Let every task park on its receiver.
        tokio::task::yield_now().await;
        assert!(order.lock().unwrap().is_empty());

        guard.finish(&Ok("A2".to_string()));
        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok("A2".to_string()));
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }
}
