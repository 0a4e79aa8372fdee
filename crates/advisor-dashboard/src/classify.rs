//! Failure classification for dashboard fetches
//!
//! The statistics service reports rate limiting only through its error
//! text. This module keeps that heuristic in one place.

use advisor_core::AdvisorError;

/// Closed set of fetch failure kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rate limit reached; automatic retries are suppressed
    QuotaExceeded,
    /// Anything else
    Generic,
}

/// Classify a failure message.
///
/// Matches case-insensitively on quota, HTTP 429, rate-limit and
/// "too many requests" markers.
pub fn classify_failure(message: &str) -> FailureKind {
    let msg = message.to_lowercase();
    if msg.contains("quota")
        || msg.contains("429")
        || msg.contains("rate limit")
        || msg.contains("rate-limit")
        || msg.contains("ratelimit")
        || msg.contains("rate limited")
        || msg.contains("too many requests")
    {
        FailureKind::QuotaExceeded
    } else {
        FailureKind::Generic
    }
}

/// Classify a source error into the dashboard's error taxonomy
pub fn classify_error(err: &AdvisorError) -> AdvisorError {
    match err {
        AdvisorError::QuotaExceeded(msg) => AdvisorError::QuotaExceeded(msg.clone()),
        AdvisorError::Http { status: 429, message } => {
            AdvisorError::QuotaExceeded(format!("HTTP 429: {}", message))
        }
        other => {
            let message = other.to_string();
            match classify_failure(&message) {
                FailureKind::QuotaExceeded => AdvisorError::QuotaExceeded(message),
                FailureKind::Generic => AdvisorError::Fetch(message),
            }
        }
    }
}
