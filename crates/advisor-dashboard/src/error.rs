//! Dashboard error types - re-exports the unified `AdvisorError`
//!
//! Dashboard code uses these variants:
//! - Dashboard(String) - terminal setup, rendering and input errors
//! - Fetch / QuotaExceeded / Http - statistics source failures, classified
//!   into fetch state before they reach the UI
//! - StaleResultDiscarded - superseded fetch results, never surfaced
//! - Export(String) - report export errors

pub use advisor_core::{AdvisorError, Result};
