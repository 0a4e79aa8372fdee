//! Owned, cancellable timers
//!
//! Every timeout or interval the dashboard schedules lives inside a
//! `TimerHandle`. Dropping the handle aborts the underlying task, so a timer
//! can never outlive the component slot that holds it.

use std::future::Future;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};

/// A spawned timer task that is aborted when the handle goes away
#[derive(Debug)]
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Run a timer future on the tokio runtime
    pub fn spawn<F>(timer: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(timer),
        }
    }

    /// Invoke `f` once after `delay`
    pub fn after<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        })
    }

    /// Stop the timer. Pending callbacks will not run.
    pub fn cancel(self) {
        drop(self);
    }

    /// True once the timer has run to completion or been aborted
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Observer for the underlying task, independent of this handle's lifetime
    pub fn abort_handle(&self) -> AbortHandle {
        self.task.abort_handle()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
