//! Shared dashboard state types
//!
//! These types define the contract between the controller and the widgets:
//! the fetch state, the reveal state and the read-only view composed from
//! both.

use advisor_core::{DashboardSnapshot, MarketMaturity};
use std::sync::Arc;

/// Placeholder shown while a metric has no value yet
pub const LOADING_TEXT: &str = "Loading...";

/// Placeholder shown when fetching is disabled
pub const IDLE_TEXT: &str = "-";

/// Banner text for a rate-limited fetch
pub const QUOTA_BANNER: &str =
    "Market data quota exceeded. The dashboard will refresh once you change the industry or region.";

/// Fetch lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchStatus {
    /// Nothing fetched (or auto-fetch disabled)
    #[default]
    Idle,
    /// A fetch is in flight
    Loading,
    /// The last fetch produced a snapshot
    Loaded,
    /// The last fetch hit the rate limit
    QuotaExceeded,
    /// The last fetch failed for another reason
    Failed,
}

impl FetchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::QuotaExceeded => "quota exceeded",
            Self::Failed => "failed",
        }
    }

    /// Status color (for ratatui styling)
    pub fn color_name(&self) -> &'static str {
        match self {
            Self::Idle => "gray",
            Self::Loading => "yellow",
            Self::Loaded => "green",
            Self::QuotaExceeded => "magenta",
            Self::Failed => "red",
        }
    }
}

/// Owned exclusively by the fetch coordinator
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    pub status: FetchStatus,
    pub snapshot: Option<Arc<DashboardSnapshot>>,
}

/// Position in the headline metric reveal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    #[default]
    Idle,
    Market,
    Growth,
    Deal,
    Maturity,
    Done,
}

impl Stage {
    /// The stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Self::Idle => Self::Market,
            Self::Market => Self::Growth,
            Self::Growth => Self::Deal,
            Self::Deal => Self::Maturity,
            Self::Maturity => Self::Done,
            Self::Done => Self::Done,
        }
    }

    /// Whether this stage counts a number up
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Market | Self::Growth | Self::Deal)
    }
}

/// Owned exclusively by the reveal sequencer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RevealState {
    pub stage: Stage,
    pub market_display: f64,
    /// Already rounded to one decimal
    pub growth_display: f64,
    pub deal_display: f64,
    pub maturity_display: String,
}

impl RevealState {
    /// Fresh state at the first stage
    pub fn started() -> Self {
        Self {
            stage: Stage::Market,
            ..Default::default()
        }
    }
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub status: FetchStatus,
    pub stage: Stage,
    pub display_market_size: String,
    pub display_growth_rate: String,
    pub display_deal_size: String,
    pub display_maturity: String,
    pub quota_message: Option<String>,
}

impl DashboardView {
    /// Compose the view.
    ///
    /// A live value is shown once it has moved off zero; otherwise the raw
    /// snapshot value, otherwise a placeholder.
    pub fn compose(fetch: &FetchState, reveal: &RevealState, quota_message: Option<String>) -> Self {
        let snapshot = fetch.snapshot.as_deref();
        let placeholder = if fetch.status == FetchStatus::Idle {
            IDLE_TEXT
        } else {
            LOADING_TEXT
        };

        let display_maturity = if !reveal.maturity_display.is_empty() {
            reveal.maturity_display.clone()
        } else if let Some(snapshot) = snapshot {
            snapshot.market_maturity.label().to_string()
        } else {
            placeholder.to_string()
        };

        Self {
            status: fetch.status,
            stage: reveal.stage,
            display_market_size: pick(
                reveal.market_display,
                snapshot.map(|s| s.market_size_usd_b),
                placeholder,
                format_market_size,
            ),
            display_growth_rate: pick(
                reveal.growth_display,
                snapshot.map(|s| s.growth_rate_percent),
                placeholder,
                format_growth_rate,
            ),
            display_deal_size: pick(
                reveal.deal_display,
                snapshot.map(|s| s.avg_deal_size_usd_k),
                placeholder,
                format_deal_size,
            ),
            display_maturity,
            quota_message,
        }
    }
}

fn pick(live: f64, raw: Option<f64>, placeholder: &str, fmt: fn(f64) -> String) -> String {
    if live != 0.0 {
        fmt(live)
    } else if let Some(raw) = raw {
        fmt(raw)
    } else {
        placeholder.to_string()
    }
}

/// `42` → `$42B`
pub fn format_market_size(value: f64) -> String {
    format!("${}B", value)
}

/// `18.5` → `18.5%`
pub fn format_growth_rate(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `75` → `$75K`
pub fn format_deal_size(value: f64) -> String {
    format!("${}K", value)
}

/// Label order the maturity stage cycles through
pub fn maturity_cycle() -> Vec<MarketMaturity> {
    MarketMaturity::ALL.to_vec()
}
