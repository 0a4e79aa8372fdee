//! Dashboard Reveal Controller
//!
//! Owns the fetch coordinator, the reveal sequencer and the section gate.
//! Background work (fetches, timers) only posts [`ControllerEvent`]s; every
//! state change happens in [`DashboardController::apply`] on the task that
//! owns the controller.

use crate::fetch::{FetchCoordinator, FetchTransition, Liveness};
use crate::report::SnapshotListener;
use crate::reveal::{RevealEvent, RevealSequencer};
use crate::sections::{GateOutput, SectionFlags, SectionGate};
use crate::source::StatsSource;
use crate::state::{DashboardView, FetchState, FetchStatus, RevealState};
use advisor_core::config::RevealTiming;
use advisor_core::{AdvisorConfig, AdvisorError, DashboardSnapshot, FetchParams, Result, SectionKind};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, warn};

/// Work finished in the background, waiting to be applied
#[derive(Debug)]
pub enum ControllerEvent {
    /// A fetch returned
    FetchCompleted {
        liveness: Liveness,
        result: Result<DashboardSnapshot>,
    },
    /// A reveal timer fired
    Reveal(RevealEvent),
}

pub struct DashboardController {
    fetch: FetchCoordinator,
    reveal: RevealSequencer,
    gate: SectionGate,
    events: UnboundedReceiver<ControllerEvent>,
}

impl DashboardController {
    pub fn new(source: Arc<dyn StatsSource>, config: &AdvisorConfig) -> Self {
        Self::with_settings(source, config.dashboard.auto_fetch, config.reveal.clone())
    }

    pub fn with_settings(source: Arc<dyn StatsSource>, auto_fetch: bool, timing: RevealTiming) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        Self {
            fetch: FetchCoordinator::new(source, auto_fetch, tx.clone()),
            reveal: RevealSequencer::new(timing, tx),
            gate: SectionGate::new(),
            events,
        }
    }

    /// Select the market to show. Returns true when a fetch started.
    ///
    /// Every started fetch restarts the reveal against placeholders.
    pub fn set_params(&mut self, params: FetchParams) -> bool {
        let started = self.fetch.set_params(params);
        if started {
            self.reveal.reset(None);
        }
        started
    }

    /// Retry the current selection. Returns true when a fetch started.
    pub fn refresh(&mut self) -> bool {
        let started = self.fetch.refresh();
        if started {
            self.reveal.reset(None);
        }
        started
    }

    pub fn subscribe(&mut self, listener: Box<dyn SnapshotListener>) {
        self.fetch.subscribe(listener);
    }

    pub fn set_section_loading(&mut self, kind: SectionKind, loading: bool) {
        self.gate.set_loading(kind, loading);
    }

    pub fn set_all_sections_loading(&mut self, loading: bool) {
        self.gate.set_all_loading(loading);
    }

    /// Apply one background event. Returns false when it was stale.
    pub fn apply(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::FetchCompleted { liveness, result } => {
                match self.fetch.complete(liveness, result) {
                    Ok(FetchTransition::Loaded(snapshot)) => {
                        self.reveal.publish(Some(snapshot));
                        true
                    }
                    Ok(FetchTransition::QuotaExceeded | FetchTransition::Failed) => true,
                    Err(AdvisorError::StaleResultDiscarded) => {
                        debug!("Discarded stale dashboard fetch result");
                        false
                    }
                    Err(e) => {
                        warn!("Failed to apply fetch result: {}", e);
                        false
                    }
                }
            }
            ControllerEvent::Reveal(event) => self.reveal.handle(event),
        }
    }

    /// Wait for the next event and apply it
    pub async fn process_next(&mut self) -> Option<bool> {
        let event = self.events.recv().await?;
        Some(self.apply(event))
    }

    /// Apply every event that is already queued. Returns how many applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Process events until the in-flight fetch (if any) has completed
    pub async fn wait_for_fetch(&mut self) -> FetchStatus {
        while self.fetch.state().status == FetchStatus::Loading {
            if self.process_next().await.is_none() {
                break;
            }
        }
        self.fetch.state().status
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::compose(self.fetch.state(), self.reveal.state(), self.fetch.quota_message())
    }

    pub fn sections(&self) -> GateOutput {
        self.gate.evaluate(self.snapshot().as_deref())
    }

    pub fn section_flags(&self) -> Vec<SectionFlags> {
        self.gate.flags(self.snapshot().as_deref())
    }

    pub fn snapshot(&self) -> Option<Arc<DashboardSnapshot>> {
        self.fetch.state().snapshot.clone()
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.fetch.state()
    }

    pub fn reveal_state(&self) -> &RevealState {
        self.reveal.state()
    }

    pub fn params(&self) -> Option<&FetchParams> {
        self.fetch.params()
    }

    pub fn auto_fetch(&self) -> bool {
        self.fetch.auto_fetch()
    }

    /// Ignore outstanding fetch results and cancel the reveal timer
    pub fn shutdown(&mut self) {
        self.fetch.teardown();
        self.reveal.stop();
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
