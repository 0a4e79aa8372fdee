//! Unified error types for the advisor workspace

use thiserror::Error;

/// Unified error type for all advisor operations
#[derive(Error, Debug)]
pub enum AdvisorError {
    // Fetch errors
    #[error("Market data quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Failed to fetch dashboard data: {0}")]
    Fetch(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// A fetch result arrived after its parameters were superseded.
    /// Never shown to the user.
    #[error("Stale fetch result discarded")]
    StaleResultDiscarded,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Presentation errors
    #[error("Dashboard error: {0}")]
    Dashboard(String),

    #[error("Report export failed: {0}")]
    Export(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using AdvisorError
pub type Result<T> = std::result::Result<T, AdvisorError>;
