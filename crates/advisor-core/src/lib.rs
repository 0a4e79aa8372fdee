//! # advisor-core
//!
//! Core types for the advisory-board market dashboard.
//!
//! The dashboard fetches one statistics snapshot per industry/region selection
//! and reveals its headline metrics progressively. This crate holds the pieces
//! every other crate agrees on:
//!
//! - `DashboardSnapshot` and its section records (the wire format)
//! - `FetchParams` (the identity of a fetch)
//! - `AdvisorError` (the error taxonomy)
//! - `AdvisorConfig` (the `.advisor/config.toml` file)

pub mod config;
mod error;
pub mod fail_open;
mod types;

pub use config::AdvisorConfig;
pub use error::{AdvisorError, Result};
pub use types::*;
