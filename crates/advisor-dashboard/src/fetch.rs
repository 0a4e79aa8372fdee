//! Fetch coordination
//!
//! The coordinator owns `FetchState`. It starts at most one fetch per
//! parameter set, classifies failures, and discards results that arrive
//! after their parameters were superseded or the dashboard was torn down.

use crate::classify::classify_error;
use crate::controller::ControllerEvent;
use crate::report::SnapshotListener;
use crate::source::StatsSource;
use crate::state::{FetchState, FetchStatus, QUOTA_BANNER};
use advisor_core::{AdvisorError, DashboardSnapshot, FetchParams, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Liveness flag captured when a fetch starts.
///
/// Cleared when the fetch is superseded, applied, or the dashboard is torn
/// down. A result whose flag is cleared is never applied.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    fn same_as(&self, other: &Liveness) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// State change produced by a completed fetch
#[derive(Debug, Clone)]
pub enum FetchTransition {
    Loaded(Arc<DashboardSnapshot>),
    QuotaExceeded,
    Failed,
}

/// Coordinates dashboard fetches
pub struct FetchCoordinator {
    source: Arc<dyn StatsSource>,
    auto_fetch: bool,
    state: FetchState,
    params: Option<FetchParams>,
    liveness: Option<Liveness>,
    quota_detail: Option<String>,
    listeners: Vec<Box<dyn SnapshotListener>>,
    tx: UnboundedSender<ControllerEvent>,
}

impl FetchCoordinator {
    pub fn new(
        source: Arc<dyn StatsSource>,
        auto_fetch: bool,
        tx: UnboundedSender<ControllerEvent>,
    ) -> Self {
        Self {
            source,
            auto_fetch,
            state: FetchState::default(),
            params: None,
            liveness: None,
            quota_detail: None,
            listeners: Vec::new(),
            tx,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn params(&self) -> Option<&FetchParams> {
        self.params.as_ref()
    }

    pub fn auto_fetch(&self) -> bool {
        self.auto_fetch
    }

    /// Banner text while the quota is exhausted
    pub fn quota_message(&self) -> Option<String> {
        if self.state.status != FetchStatus::QuotaExceeded {
            return None;
        }
        Some(match &self.quota_detail {
            Some(detail) => format!("{} ({})", QUOTA_BANNER, detail),
            None => QUOTA_BANNER.to_string(),
        })
    }

    /// Register a consumer of successfully loaded snapshots
    pub fn subscribe(&mut self, listener: Box<dyn SnapshotListener>) {
        self.listeners.push(listener);
    }

    /// Automatic trigger: fetch when `params` differ from the last fetch.
    ///
    /// Returns true when a fetch was started. Repeating the same params
    /// never refetches, so a quota or generic failure stays put until the
    /// selection changes.
    pub fn set_params(&mut self, params: FetchParams) -> bool {
        if self.params.as_ref() == Some(&params) {
            debug!("Params unchanged ({}), not refetching", params);
            return false;
        }
        if !self.auto_fetch {
            debug!("Auto-fetch disabled, recording params {} without fetching", params);
            self.params = Some(params);
            return false;
        }
        self.start(params);
        true
    }

    /// User-requested refetch of the current params
    pub fn refresh(&mut self) -> bool {
        if !self.auto_fetch || self.state.status == FetchStatus::Loading {
            return false;
        }
        match self.params.clone() {
            Some(params) => {
                self.start(params);
                true
            }
            None => false,
        }
    }

    fn start(&mut self, params: FetchParams) {
        if let Some(previous) = self.liveness.take() {
            previous.clear();
        }

        info!("Fetching dashboard data for {}", params);
        self.state = FetchState {
            status: FetchStatus::Loading,
            snapshot: None,
        };
        self.quota_detail = None;

        let liveness = Liveness::new();
        self.liveness = Some(liveness.clone());
        self.params = Some(params.clone());

        let source = self.source.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_dashboard_data(&params).await;
            if !liveness.is_alive() {
                debug!("Fetch for {} finished after it was superseded", params);
                return;
            }
            let _ = tx.send(ControllerEvent::FetchCompleted { liveness, result });
        });
    }

    /// Apply a finished fetch.
    ///
    /// Returns `AdvisorError::StaleResultDiscarded` when the result belongs
    /// to a superseded fetch; state is untouched in that case.
    pub fn complete(
        &mut self,
        liveness: Liveness,
        result: Result<DashboardSnapshot>,
    ) -> Result<FetchTransition> {
        let current = match &self.liveness {
            Some(current) if current.same_as(&liveness) && liveness.is_alive() => current.clone(),
            _ => return Err(AdvisorError::StaleResultDiscarded),
        };
        current.clear();
        self.liveness = None;

        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                self.state = FetchState {
                    status: FetchStatus::Loaded,
                    snapshot: Some(snapshot.clone()),
                };
                self.notify(&snapshot);
                Ok(FetchTransition::Loaded(snapshot))
            }
            Err(err) => match classify_error(&err) {
                AdvisorError::QuotaExceeded(detail) => {
                    warn!("Dashboard data quota exceeded: {}", detail);
                    self.state.status = FetchStatus::QuotaExceeded;
                    self.quota_detail = Some(detail);
                    Ok(FetchTransition::QuotaExceeded)
                }
                other => {
                    warn!("Dashboard fetch failed: {}", other);
                    self.state.status = FetchStatus::Failed;
                    Ok(FetchTransition::Failed)
                }
            },
        }
    }

    /// Ignore any outstanding result from now on
    pub fn teardown(&mut self) {
        if let Some(liveness) = self.liveness.take() {
            liveness.clear();
        }
    }

    fn notify(&mut self, snapshot: &Arc<DashboardSnapshot>) {
        let Some(params) = self.params.as_ref() else {
            return;
        };
        for listener in &mut self.listeners {
            listener.on_snapshot_loaded(params, snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::MarketMaturity;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc;

    struct MockSource {
        calls: Arc<AtomicUsize>,
        outcome: fn() -> Result<DashboardSnapshot>,
    }

    #[async_trait]
    impl StatsSource for MockSource {
        async fn fetch_dashboard_data(&self, _params: &FetchParams) -> Result<DashboardSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn loaded() -> Result<DashboardSnapshot> {
        Ok(DashboardSnapshot {
            market_size_usd_b: 5.0,
            market_maturity: MarketMaturity::Growing,
            ..DashboardSnapshot::placeholder()
        })
    }

    fn quota() -> Result<DashboardSnapshot> {
        Err(AdvisorError::Other("Error: 429 quota exceeded".to_string()))
    }

    fn broken() -> Result<DashboardSnapshot> {
        Err(AdvisorError::Fetch("connection reset".to_string()))
    }

    fn coordinator(
        outcome: fn() -> Result<DashboardSnapshot>,
    ) -> (FetchCoordinator, mpsc::UnboundedReceiver<ControllerEvent>, Arc<AtomicUsize>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(MockSource {
            calls: calls.clone(),
            outcome,
        });
        (FetchCoordinator::new(source, true, tx), rx, calls)
    }

    async fn next_completion(
        rx: &mut mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> (Liveness, Result<DashboardSnapshot>) {
        match rx.recv().await {
            Some(ControllerEvent::FetchCompleted { liveness, result }) => (liveness, result),
            _ => panic!("expected a fetch completion"),
        }
    }

    #[tokio::test]
    async fn test_success_loads_and_notifies_once() {
        let (mut fetch, mut rx, _) = coordinator(loaded);
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = notified.clone();
        fetch.subscribe(Box::new(move |_: &FetchParams, _: &Arc<DashboardSnapshot>| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(fetch.set_params(FetchParams::new("Fintech")));
        assert_eq!(fetch.state().status, FetchStatus::Loading);
        assert!(fetch.state().snapshot.is_none());

        let (liveness, result) = next_completion(&mut rx).await;
        let again = liveness.clone();
        assert!(matches!(fetch.complete(liveness, result), Ok(FetchTransition::Loaded(_))));
        assert_eq!(fetch.state().status, FetchStatus::Loaded);
        assert_eq!(notified.load(Ordering::SeqCst), 1);

        // Replaying the same completion is stale
        let replay = fetch.complete(again, loaded());
        assert!(matches!(replay, Err(AdvisorError::StaleResultDiscarded)));
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_quota_freezes_retries_for_same_params() {
        let (mut fetch, mut rx, calls) = coordinator(quota);
        fetch.set_params(FetchParams::new("Fintech"));

        let (liveness, result) = next_completion(&mut rx).await;
        assert!(matches!(
            fetch.complete(liveness, result),
            Ok(FetchTransition::QuotaExceeded)
        ));
        assert_eq!(fetch.state().status, FetchStatus::QuotaExceeded);
        assert!(fetch.quota_message().unwrap().contains("quota exceeded"));

        assert!(!fetch.set_params(FetchParams::new("Fintech")));
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetch.state().status, FetchStatus::QuotaExceeded);

        assert!(fetch.set_params(FetchParams::new("Fintech").with_region("EMEA")));
        assert_eq!(fetch.state().status, FetchStatus::Loading);
        assert!(fetch.quota_message().is_none());
    }

    #[tokio::test]
    async fn test_generic_failure_marks_failed_without_banner() {
        let (mut fetch, mut rx, _) = coordinator(broken);
        fetch.set_params(FetchParams::new("Retail"));

        let (liveness, result) = next_completion(&mut rx).await;
        assert!(matches!(fetch.complete(liveness, result), Ok(FetchTransition::Failed)));
        assert_eq!(fetch.state().status, FetchStatus::Failed);
        assert!(fetch.quota_message().is_none());
        assert!(fetch.state().snapshot.is_none());
    }

    #[tokio::test]
    async fn test_superseded_result_is_discarded() {
        let (mut fetch, mut rx, _) = coordinator(loaded);
        fetch.set_params(FetchParams::new("Retail"));
        let (first, first_result) = next_completion(&mut rx).await;

        fetch.set_params(FetchParams::new("Energy"));
        assert!(!first.is_alive());
        assert!(matches!(
            fetch.complete(first, first_result),
            Err(AdvisorError::StaleResultDiscarded)
        ));
        assert_eq!(fetch.state().status, FetchStatus::Loading);
    }

    #[tokio::test]
    async fn test_teardown_discards_late_result() {
        let (mut fetch, mut rx, _) = coordinator(loaded);
        fetch.set_params(FetchParams::new("Retail"));
        let (liveness, result) = next_completion(&mut rx).await;

        fetch.teardown();
        assert!(matches!(
            fetch.complete(liveness, result),
            Err(AdvisorError::StaleResultDiscarded)
        ));
        assert_eq!(fetch.state().status, FetchStatus::Loading);
        assert!(fetch.state().snapshot.is_none());
    }

    #[tokio::test]
    async fn test_auto_fetch_disabled_stays_idle() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(MockSource {
            calls: calls.clone(),
            outcome: loaded,
        });
        let mut fetch = FetchCoordinator::new(source, false, tx);

        assert!(!fetch.set_params(FetchParams::new("Retail")));
        assert!(!fetch.refresh());
        tokio::task::yield_now().await;
        assert_eq!(fetch.state().status, FetchStatus::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_retries_after_failure() {
        let (mut fetch, mut rx, calls) = coordinator(broken);
        fetch.set_params(FetchParams::new("Retail"));
        assert!(!fetch.refresh(), "refresh is ignored while loading");

        let (liveness, result) = next_completion(&mut rx).await;
        fetch.complete(liveness, result).unwrap();

        assert!(fetch.refresh());
        next_completion(&mut rx).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
