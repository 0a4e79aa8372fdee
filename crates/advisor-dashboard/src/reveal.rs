//! Progressive reveal of the headline metrics
//!
//! The sequencer walks `Market → Growth → Deal → Maturity → Done`. Each
//! stage waits a short start delay, runs its animation, settles, and hands
//! over to the next. Exactly one timer is owned at a time; every timer is
//! tagged with an id and events from any other id are ignored, so a reset
//! leaves nothing behind that can still write to the display.

use crate::animate::{animate, cycle, AnimationTiming, Rounding};
use crate::controller::ControllerEvent;
use crate::state::{maturity_cycle, RevealState, Stage};
use crate::timer::TimerHandle;
use advisor_core::config::RevealTiming;
use advisor_core::{DashboardSnapshot, MarketMaturity};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tracing::{debug, trace};

/// Event posted by a sequencer timer
#[derive(Debug, Clone, PartialEq)]
pub struct RevealEvent {
    timer: u64,
    kind: RevealEventKind,
}

#[derive(Debug, Clone, PartialEq)]
enum RevealEventKind {
    /// Start delay elapsed
    Start,
    /// New interpolated value for the current numeric stage
    Step(f64),
    /// Next label of the maturity cycle
    Label(MarketMaturity),
    /// Animation for the current stage finished
    Complete,
    /// Settle pause elapsed
    Advance,
}

/// Posts events tagged with the timer they came from
#[derive(Clone)]
struct RevealSink {
    tx: UnboundedSender<ControllerEvent>,
    timer: u64,
}

impl RevealSink {
    fn send(&self, kind: RevealEventKind) {
        // The controller may already be gone during teardown
        let _ = self.tx.send(ControllerEvent::Reveal(RevealEvent {
            timer: self.timer,
            kind,
        }));
    }
}

/// Drives the headline metric reveal
pub struct RevealSequencer {
    timing: RevealTiming,
    state: RevealState,
    snapshot: Option<Arc<DashboardSnapshot>>,
    fallback: DashboardSnapshot,
    timer: Option<TimerHandle>,
    timer_id: u64,
    tx: UnboundedSender<ControllerEvent>,
}

impl RevealSequencer {
    pub fn new(timing: RevealTiming, tx: UnboundedSender<ControllerEvent>) -> Self {
        Self {
            timing,
            state: RevealState::default(),
            snapshot: None,
            fallback: DashboardSnapshot::placeholder(),
            timer: None,
            timer_id: 0,
            tx,
        }
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// Whether a timer is currently scheduled
    pub fn has_active_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    /// Observer for the current timer task
    pub fn active_abort_handle(&self) -> Option<AbortHandle> {
        self.timer.as_ref().map(TimerHandle::abort_handle)
    }

    /// Restart from `Market` against a new snapshot (or placeholders).
    ///
    /// Any timer from the previous sequence is cancelled first.
    pub fn reset(&mut self, snapshot: Option<Arc<DashboardSnapshot>>) {
        self.clear_timer();
        debug!(has_data = snapshot.is_some(), "Restarting metric reveal");
        self.snapshot = snapshot;
        self.state = RevealState::started();
        self.enter(Stage::Market);
    }

    /// Hand the sequencer the current snapshot.
    ///
    /// Restarts only when the reference differs from the one being revealed
    /// or nothing has started yet. Returns true on restart.
    pub fn publish(&mut self, snapshot: Option<Arc<DashboardSnapshot>>) -> bool {
        let same = match (&self.snapshot, &snapshot) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if same && self.state.stage != Stage::Idle {
            return false;
        }
        self.reset(snapshot);
        true
    }

    /// Tear down: cancel timers and return to `Idle`
    pub fn stop(&mut self) {
        self.clear_timer();
        self.snapshot = None;
        self.state = RevealState::default();
    }

    /// Apply a timer event. Returns false when the event is stale.
    pub fn handle(&mut self, event: RevealEvent) -> bool {
        if self.timer.is_none() || event.timer != self.timer_id {
            trace!(timer = event.timer, current = self.timer_id, "Ignoring stale reveal event");
            return false;
        }

        match event.kind {
            RevealEventKind::Start => self.start_stage(),
            RevealEventKind::Step(value) => self.set_live(value),
            RevealEventKind::Label(label) => {
                self.state.maturity_display = label.label().to_string();
            }
            RevealEventKind::Complete => {
                self.settle_stage();
                let settle = Duration::from_millis(self.timing.settle_ms);
                self.schedule(|sink| {
                    TimerHandle::after(settle, move || sink.send(RevealEventKind::Advance))
                });
            }
            RevealEventKind::Advance => {
                let next = self.state.stage.next();
                self.enter(next);
            }
        }
        true
    }

    fn enter(&mut self, stage: Stage) {
        self.state.stage = stage;
        match stage {
            Stage::Idle | Stage::Done => {
                self.clear_timer();
                debug!("Metric reveal complete");
            }
            _ => {
                let delay = self.start_delay();
                self.schedule(|sink| {
                    TimerHandle::after(delay, move || sink.send(RevealEventKind::Start))
                });
            }
        }
    }

    fn start_stage(&mut self) {
        let stage = self.state.stage;

        if stage.is_numeric() {
            let target = self.target(stage);
            let rounding = if stage == Stage::Growth {
                Rounding::Tenths
            } else {
                Rounding::Floor
            };
            let timing = AnimationTiming::new(self.timing.duration_ms, self.timing.steps);
            trace!(?stage, value = target, "Animating metric");

            self.schedule(|sink| {
                let done = sink.clone();
                animate(
                    target,
                    timing,
                    rounding,
                    move |value| sink.send(RevealEventKind::Step(value)),
                    move || done.send(RevealEventKind::Complete),
                )
            });
        } else if stage == Stage::Maturity {
            let period = Duration::from_millis(self.timing.label_cycle_ms);
            self.schedule(|sink| {
                let done = sink.clone();
                cycle(
                    maturity_cycle(),
                    period,
                    move |label| sink.send(RevealEventKind::Label(label)),
                    move || done.send(RevealEventKind::Complete),
                )
            });
        }
    }

    fn set_live(&mut self, value: f64) {
        match self.state.stage {
            Stage::Market => self.state.market_display = value,
            Stage::Growth => self.state.growth_display = value,
            Stage::Deal => self.state.deal_display = value,
            _ => {}
        }
    }

    fn settle_stage(&mut self) {
        let stage = self.state.stage;
        if stage == Stage::Maturity {
            self.state.maturity_display = self.values().market_maturity.label().to_string();
        } else if stage.is_numeric() {
            let target = self.target(stage);
            self.set_live(target);
        }
    }

    fn schedule<F>(&mut self, start: F)
    where
        F: FnOnce(RevealSink) -> TimerHandle,
    {
        self.clear_timer();
        self.timer_id += 1;
        let sink = RevealSink {
            tx: self.tx.clone(),
            timer: self.timer_id,
        };
        self.timer = Some(start(sink));
    }

    fn clear_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
    }

    fn start_delay(&self) -> Duration {
        if self.snapshot.is_some() {
            Duration::from_millis(self.timing.data_ready_delay_ms)
        } else {
            Duration::from_millis(self.timing.placeholder_delay_ms)
        }
    }

    fn values(&self) -> &DashboardSnapshot {
        self.snapshot.as_deref().unwrap_or(&self.fallback)
    }

    fn target(&self, stage: Stage) -> f64 {
        let values = self.values();
        match stage {
            Stage::Market => values.market_size_usd_b,
            Stage::Growth => values.growth_rate_percent,
            Stage::Deal => values.avg_deal_size_usd_k,
            _ => 0.0,
        }
    }
}

impl Drop for RevealSequencer {
    fn drop(&mut self) {
        self.clear_timer();
    }
}
