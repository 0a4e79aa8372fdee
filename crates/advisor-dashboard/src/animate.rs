//! Count-up animation for headline metrics
//!
//! A count-up divides its duration into equal ticks and emits an
//! interpolated value on each one. The last tick always emits the target
//! itself, so rounding never leaves the display short of the real value.

use crate::timer::TimerHandle;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Duration and resolution of one count-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationTiming {
    pub duration_ms: u64,
    pub steps: u32,
}

impl AnimationTiming {
    pub fn new(duration_ms: u64, steps: u32) -> Self {
        Self { duration_ms, steps }
    }

    /// Time between ticks, never zero
    pub fn tick_period(&self) -> Duration {
        let period = Duration::from_millis(self.duration_ms) / self.steps.max(1);
        period.max(Duration::from_millis(1))
    }
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self::new(1200, 60)
    }
}

/// How intermediate values are rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Whole numbers, rounded down
    Floor,
    /// One decimal place
    Tenths,
}

/// Value emitted at tick `i` of `steps`
pub fn frame_value(i: u32, steps: u32, target: f64, rounding: Rounding) -> f64 {
    if steps == 0 || i >= steps {
        return target;
    }

    let raw = (f64::from(i) / f64::from(steps) * target).min(target);
    let rounded = match rounding {
        Rounding::Floor => raw.floor(),
        Rounding::Tenths => (raw * 10.0).round() / 10.0,
    };
    rounded.min(target)
}

/// Every value a count-up emits, in order
pub fn frames(target: f64, steps: u32, rounding: Rounding) -> Vec<f64> {
    (1..=steps.max(1))
        .map(|i| frame_value(i, steps, target, rounding))
        .collect()
}

/// Start a count-up from zero to `target`.
///
/// `on_step` receives each emitted value; `on_done` runs after the final
/// one. Cancelling or dropping the returned handle stops the ticks and
/// `on_done` is never called.
pub fn animate<S, D>(
    target: f64,
    timing: AnimationTiming,
    rounding: Rounding,
    mut on_step: S,
    on_done: D,
) -> TimerHandle
where
    S: FnMut(f64) + Send + 'static,
    D: FnOnce() + Send + 'static,
{
    let steps = timing.steps.max(1);
    let period = timing.tick_period();

    TimerHandle::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately
        interval.tick().await;

        for i in 1..=steps {
            interval.tick().await;
            on_step(frame_value(i, steps, target, rounding));
        }
        on_done();
    })
}

/// Show each item in turn, one per `period`, then call `on_done`
pub fn cycle<T, S, D>(items: Vec<T>, period: Duration, mut on_item: S, on_done: D) -> TimerHandle
where
    T: Send + 'static,
    S: FnMut(T) + Send + 'static,
    D: FnOnce() + Send + 'static,
{
    let period = period.max(Duration::from_millis(1));

    TimerHandle::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await;

        for item in items {
            interval.tick().await;
            on_item(item);
        }
        on_done();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_final_frame_is_exact_target() {
        for target in [0.0, 1.0, 7.0, 42.0, 42.7, 18.5, 75.0, 999.99, 1e9 + 0.3] {
            let floor = frames(target, 60, Rounding::Floor);
            assert_eq!(*floor.last().unwrap(), target);

            let tenths = frames(target, 60, Rounding::Tenths);
            assert_eq!(*tenths.last().unwrap(), target);
        }
    }

    #[test]
    fn test_intermediate_frames_never_exceed_target() {
        for target in [0.06, 3.0, 18.5, 250.0] {
            for rounding in [Rounding::Floor, Rounding::Tenths] {
                let values = frames(target, 60, rounding);
                assert!(values.iter().all(|v| *v <= target));
                assert!(values.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn test_floor_and_tenths_rounding() {
        // 30/60 of 75 = 37.5
        assert_eq!(frame_value(30, 60, 75.0, Rounding::Floor), 37.0);
        // 1/60 of 18.5 = 0.3083
        assert_eq!(frame_value(1, 60, 18.5, Rounding::Tenths), 0.3);
        assert_eq!(frame_value(0, 60, 42.0, Rounding::Floor), 0.0);
    }

    #[test]
    fn test_zero_steps_emits_target_once() {
        assert_eq!(frames(12.0, 0, Rounding::Floor), vec![12.0]);
    }

    #[test]
    fn test_tick_period() {
        assert_eq!(AnimationTiming::default().tick_period(), Duration::from_millis(20));
        assert_eq!(AnimationTiming::new(0, 10).tick_period(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_animate_emits_all_steps_then_done() {
        let values = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));

        let sink = values.clone();
        let finished = done.clone();
        let _handle = animate(
            42.0,
            AnimationTiming::new(100, 10),
            Rounding::Floor,
            move |v| sink.lock().unwrap().push(v),
            move || finished.store(true, Ordering::SeqCst),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        let values = values.lock().unwrap();
        assert_eq!(values.len(), 10);
        assert_eq!(*values.last().unwrap(), 42.0);
        assert!(done.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_animation_never_completes() {
        let steps = Arc::new(Mutex::new(0u32));
        let done = Arc::new(AtomicBool::new(false));

        let counter = steps.clone();
        let finished = done.clone();
        let handle = animate(
            100.0,
            AnimationTiming::new(1200, 60),
            Rounding::Floor,
            move |_| *counter.lock().unwrap() += 1,
            move || finished.store(true, Ordering::SeqCst),
        );

        tokio::time::sleep(Duration::from_millis(105)).await;
        handle.cancel();
        let seen = *steps.lock().unwrap();
        assert!(seen > 0 && seen < 60);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(*steps.lock().unwrap(), seen);
        assert!(!done.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_visits_items_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let done = Arc::new(AtomicBool::new(false));

        let sink = seen.clone();
        let finished = done.clone();
        let _handle = cycle(
            vec!["a", "b", "c"],
            Duration::from_millis(150),
            move |item| sink.lock().unwrap().push(item),
            move || finished.store(true, Ordering::SeqCst),
        );

        tokio::time::sleep(Duration::from_millis(320)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
        assert!(!done.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b", "c"]);
        assert!(done.load(Ordering::SeqCst));
    }
}
