//! Main application state and logic
//!
//! The `App` struct owns the dashboard controller and the report exporter,
//! and maps user input onto market selection changes.

use crate::controller::DashboardController;
use crate::report::ReportExporter;
use crate::source::StatsSource;
use crate::state::FetchStatus;
use advisor_core::fail_open::fail_open;
use advisor_core::{AdvisorConfig, FetchParams};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Regions cycled with the region key. `None` means all regions.
pub const REGIONS: [Option<&str>; 5] = [
    None,
    Some("North America"),
    Some("EMEA"),
    Some("APAC"),
    Some("LATAM"),
];

/// Industries cycled with the industry key
pub const INDUSTRIES: [&str; 5] = [
    "Artificial Intelligence",
    "Fintech",
    "Healthcare",
    "Renewable Energy",
    "Cybersecurity",
];

/// Main application state
pub struct App {
    /// Fetch, reveal and section state
    pub controller: DashboardController,
    /// Keeps the latest loaded snapshot for export
    pub exporter: ReportExporter,
    pub config: AdvisorConfig,
    /// Current market selection
    pub params: FetchParams,
    /// Signal to exit the application
    pub should_quit: bool,
    /// Current tab selection
    pub selected_tab: TabSelection,
    /// One-line feedback shown in the footer
    pub notice: Option<String>,
}

/// Tab selection for multi-panel views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSelection {
    /// Headline metrics and detail sections
    Overview,
    /// Detail sections only, full height
    Details,
}

impl App {
    /// Create a new application for `params`
    pub fn new(source: Arc<dyn StatsSource>, config: AdvisorConfig, params: FetchParams) -> Self {
        let exporter = ReportExporter::new();
        let mut controller = DashboardController::new(source, &config);
        controller.subscribe(Box::new(exporter.clone()));

        Self {
            controller,
            exporter,
            config,
            params,
            should_quit: false,
            selected_tab: TabSelection::Overview,
            notice: None,
        }
    }

    /// Kick off the first fetch
    pub fn start(&mut self) {
        self.select(self.params.clone());
        if !self.controller.auto_fetch() {
            self.notice = Some("Auto-fetch disabled".to_string());
        }
    }

    /// Apply pending background events and sync section loading flags
    pub fn tick(&mut self) -> usize {
        let applied = self.controller.drain();
        let loading = self.controller.fetch_state().status == FetchStatus::Loading;
        self.controller.set_all_sections_loading(loading);
        applied
    }

    /// User-requested retry
    pub fn refresh(&mut self) {
        if self.controller.refresh() {
            self.notice = None;
            self.controller.set_all_sections_loading(true);
        }
    }

    /// Switch to the next region
    pub fn next_region(&mut self) {
        let current = REGIONS
            .iter()
            .position(|r| *r == self.params.region.as_deref())
            .unwrap_or(0);
        let region = REGIONS[(current + 1) % REGIONS.len()];

        let mut params = self.params.clone();
        params.region = region.map(str::to_string);
        self.select(params);
    }

    /// Switch to the next industry
    pub fn next_industry(&mut self) {
        let next = INDUSTRIES
            .iter()
            .position(|i| *i == self.params.industry)
            .map_or(0, |i| (i + 1) % INDUSTRIES.len());

        let mut params = self.params.clone();
        params.industry = INDUSTRIES[next].to_string();
        self.select(params);
    }

    fn select(&mut self, params: FetchParams) {
        info!("Selected market {}", params);
        self.params = params.clone();
        if self.controller.set_params(params) {
            self.notice = None;
            self.controller.set_all_sections_loading(true);
        }
    }

    /// Write the latest report. Failures are logged and shown, never fatal.
    pub async fn export_report(&mut self) -> Option<PathBuf> {
        let dir = self.config.export.dir.clone();
        let exporter = self.exporter.clone();
        let written = fail_open("report_export", || async move { exporter.write_to(&dir).await }).await;

        self.notice = Some(match &written {
            Some(path) => format!("Report written to {}", path.display()),
            None => "Report export failed, see log".to_string(),
        });
        written
    }

    /// Move to next tab
    pub fn next_tab(&mut self) {
        self.selected_tab = match self.selected_tab {
            TabSelection::Overview => TabSelection::Details,
            TabSelection::Details => TabSelection::Overview,
        };
    }

    /// Move to previous tab
    pub fn prev_tab(&mut self) {
        // Two tabs: same as next
        self.next_tab();
    }

    /// Get current tab name for display
    pub fn current_tab_name(&self) -> &str {
        match self.selected_tab {
            TabSelection::Overview => "Overview",
            TabSelection::Details => "Details",
        }
    }
}
