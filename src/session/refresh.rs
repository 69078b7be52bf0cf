use crate::domain_model::AccessToken;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::oneshot;

/// Result of one refresh cycle: the renewed credential, or `None` when the
/// session could not be renewed.
pub type RefreshOutcome = Option<AccessToken>;

/// Single-flight bookkeeping. Only ever touched while holding the mutex, and
/// the mutex is never held across an await.
#[derive(Default)]
pub(crate) struct RefreshState {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

pub(crate) enum Joined {
    /// The request carried an outdated credential; replay with this one.
    Replay(AccessToken),
    Queued {
        outcome: oneshot::Receiver<RefreshOutcome>,
        leader: bool,
    },
}

#[derive(Clone, Default)]
pub(crate) struct RefreshCoordinator {
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshCoordinator {
    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Decides, under the lock, what a request that got a 401 does next.
    ///
    /// With no refresh running, `stale` may hand back a newer stored
    /// credential to replay with. Otherwise the caller is queued on the
    /// current cycle, and the first caller of a cycle must start it.
    pub(crate) fn join(&self, stale: impl FnOnce() -> Option<AccessToken>) -> Joined {
        let mut state = self.lock();
        if !state.in_flight {
            if let Some(current) = stale() {
                return Joined::Replay(current);
            }
        }
        let (tx, rx) = oneshot::channel();
        state.waiters.push(tx);
        let leader = !state.in_flight;
        state.in_flight = true;
        Joined::Queued {
            outcome: rx,
            leader,
        }
    }

    pub(crate) fn in_flight(&self) -> bool {
        self.lock().in_flight
    }

    #[cfg(test)]
    pub(crate) fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    pub(crate) fn drain_guard(&self) -> DrainGuard {
        DrainGuard {
            coordinator: self.clone(),
            outcome: None,
        }
    }

    fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.in_flight = false;
            std::mem::take(&mut state.waiters)
        };
        tracing::debug!(waiters = waiters.len(), renewed = outcome.is_some(), "draining refresh queue");
        for waiter in waiters {
            // A dropped receiver means the caller lost interest.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Settles the cycle when dropped, whether the refresh finished, failed,
/// panicked or was cancelled. Waiters get `outcome`, which stays `None`
/// unless the refresh produced a credential.
pub(crate) struct DrainGuard {
    coordinator: RefreshCoordinator,
    pub(crate) outcome: RefreshOutcome,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.coordinator.settle(self.outcome.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn queue(coordinator: &RefreshCoordinator) -> (oneshot::Receiver<RefreshOutcome>, bool) {
        match coordinator.join(|| None) {
            Joined::Queued { outcome, leader } => (outcome, leader),
            Joined::Replay(_) => panic!("expected to be queued"),
        }
    }

    #[tokio::test]
    async fn only_first_joiner_leads() {
        let coordinator = RefreshCoordinator::default();
        let (first, leads) = queue(&coordinator);
        assert!(leads);
        let (second, leads) = queue(&coordinator);
        assert!(!leads);
        assert_eq!(coordinator.waiting(), 2);

        let mut guard = coordinator.drain_guard();
        guard.outcome = Some(AccessToken("A2".to_string()));
        drop(guard);

        assert!(!coordinator.in_flight());
        assert_eq!(coordinator.waiting(), 0);
        assert_eq!(first.await.unwrap(), Some(AccessToken("A2".to_string())));
        assert_eq!(second.await.unwrap(), Some(AccessToken("A2".to_string())));
    }

    #[tokio::test]
    async fn stale_credential_replays_only_when_idle() {
        let coordinator = RefreshCoordinator::default();
        let newer = || Some(AccessToken("A2".to_string()));

        assert!(matches!(coordinator.join(newer), Joined::Replay(ref t) if t.0 == "A2"));
        assert!(!coordinator.in_flight());
        assert_eq!(coordinator.waiting(), 0);

        let (_leader, leads) = queue(&coordinator);
        assert!(leads);
        match coordinator.join(newer) {
            Joined::Queued { leader, .. } => assert!(!leader),
            Joined::Replay(_) => panic!("replayed while a refresh was running"),
        }
        assert_eq!(coordinator.waiting(), 2);
    }

    #[tokio::test]
    async fn waiters_are_woken_in_join_order() {
        let coordinator = RefreshCoordinator::default();
        let receivers: Vec<_> = (0..4).map(|_| queue(&coordinator).0).collect();

        let woken = Arc::new(Mutex::new(Vec::new()));
        let parked = Arc::new(AtomicUsize::new(0));
        // Spawned in reverse so that only the wake order can put them back in order.
        let tasks: Vec<_> = receivers
            .into_iter()
            .enumerate()
            .rev()
            .map(|(i, rx)| {
                let woken = woken.clone();
                let parked = parked.clone();
                tokio::spawn(async move {
                    parked.fetch_add(1, Ordering::SeqCst);
                    rx.await.unwrap();
                    woken.lock().unwrap().push(i);
                })
            })
            .collect();
        while parked.load(Ordering::SeqCst) < 4 {
            tokio::task::yield_now().await;
        }

        drop(coordinator.drain_guard());
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(*woken.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn panicking_refresh_still_clears_flag() {
        let coordinator = RefreshCoordinator::default();
        let (waiter, _) = queue(&coordinator);

        let c = coordinator.clone();
        let task = tokio::spawn(async move {
            let _guard = c.drain_guard();
            panic!("refresh blew up");
        });
        assert!(task.await.is_err());

        assert!(!coordinator.in_flight());
        assert_eq!(waiter.await.unwrap(), None);
    }
}
