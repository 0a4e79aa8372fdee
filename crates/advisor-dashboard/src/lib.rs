//! # advisor-dashboard
//!
//! Progressive market dashboard for the advisory board.
//!
//! This crate provides:
//! - The dashboard reveal controller: one fetch per market selection, a
//!   staged count-up of the headline metrics, and section gating
//! - Statistics sources (HTTP and JSON fixture)
//! - Report export for loaded snapshots
//! - A Ratatui-based TUI on top of the controller
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  ControllerEvent   ┌──────────────────────────────┐
//! │ fetch task    │ ─────────────────▶ │ DashboardController::apply   │
//! │ reveal timers │                    │  FetchCoordinator            │
//! └───────────────┘                    │  RevealSequencer             │
//!                                      │  SectionGate                 │
//!                                      └──────────────┬───────────────┘
//!                                                     │ view() / sections()
//!                                                     ▼
//!                                      ┌──────────────────────────────┐
//!                                      │ ui::draw (widgets)           │
//!                                      └──────────────────────────────┘
//! ```

// Shared types (contracts)
mod state;

pub use state::{
    format_deal_size, format_growth_rate, format_market_size, DashboardView, FetchState,
    FetchStatus, RevealState, Stage, IDLE_TEXT, LOADING_TEXT, QUOTA_BANNER,
};

mod error;

pub use error::{AdvisorError, Result};

// Controller building blocks
pub mod animate;
pub mod classify;
mod controller;
mod fetch;
mod report;
mod reveal;
mod sections;
mod source;
mod timer;

pub use classify::{classify_error, classify_failure, FailureKind};
pub use controller::{ControllerEvent, DashboardController};
pub use fetch::{FetchCoordinator, FetchTransition, Liveness};
pub use report::{MarketReport, ReportExporter, SnapshotListener};
pub use reveal::{RevealEvent, RevealSequencer};
pub use sections::{GateOutput, SectionFlags, SectionGate, SectionView, EMPTY_SECTIONS_MESSAGE};
pub use source::{source_from_config, FileStatsSource, HttpStatsSource, StatsSource};
pub use timer::TimerHandle;

// Terminal presentation
mod widgets;

pub use widgets::{MetricsPanelWidget, QuotaBannerWidget, SectionPanelWidget};

mod app;
mod event;
mod terminal;
mod ui;
mod run;

pub use app::{App, TabSelection};
pub use run::run;
