//! Fail-open utilities for graceful degradation
//!
//! Some work around the dashboard must never interrupt it, such as writing
//! an exported report from the terminal app. `fail_open` logs the failure via
//! `tracing::warn!` and carries on.
//!
//! DO NOT use fail-open for fetch results. Those are classified by the fetch
//! coordinator and turned into dashboard state.

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an async operation that should fail open
///
/// Logs the error on failure and returns `None`.
///
/// ```no_run
/// use advisor_core::fail_open::fail_open;
/// use advisor_core::Result;
///
/// async fn write_report() -> Result<()> {
///     Ok(())
/// }
///
/// async fn example() {
///     let written = fail_open("report_export", || write_report()).await;
///     // written is None if write_report() failed
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
