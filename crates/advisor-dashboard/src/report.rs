//! Snapshot listeners and report export
//!
//! A successful fetch is announced exactly once to every subscribed
//! listener. `ReportExporter` is the listener the terminal app uses: it keeps
//! the latest snapshot so a report can be written without fetching again.

use advisor_core::{AdvisorError, DashboardSnapshot, FetchParams, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Receives every successfully loaded snapshot
pub trait SnapshotListener: Send {
    fn on_snapshot_loaded(&mut self, params: &FetchParams, snapshot: &Arc<DashboardSnapshot>);
}

impl<F> SnapshotListener for F
where
    F: FnMut(&FetchParams, &Arc<DashboardSnapshot>) + Send,
{
    fn on_snapshot_loaded(&mut self, params: &FetchParams, snapshot: &Arc<DashboardSnapshot>) {
        self(params, snapshot)
    }
}

/// Exported market report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub generated_at: DateTime<Utc>,
    pub params: FetchParams,
    pub snapshot: DashboardSnapshot,
}

#[derive(Debug, Default)]
struct ExporterState {
    latest: Option<(FetchParams, Arc<DashboardSnapshot>)>,
    loads: u64,
}

/// Keeps the latest snapshot and writes it out on request.
///
/// Clones share state, so one clone can be subscribed to the controller
/// while another stays with the UI.
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    state: Arc<Mutex<ExporterState>>,
}

impl ReportExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots received so far
    pub fn load_count(&self) -> u64 {
        self.state.lock().map(|state| state.loads).unwrap_or(0)
    }

    /// Build a report from the latest snapshot
    pub fn report(&self) -> Option<MarketReport> {
        let state = self.state.lock().ok()?;
        let (params, snapshot) = state.latest.as_ref()?;
        Some(MarketReport {
            generated_at: Utc::now(),
            params: params.clone(),
            snapshot: snapshot.as_ref().clone(),
        })
    }

    /// Write the latest report as pretty JSON into `dir`
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let report = self
            .report()
            .ok_or_else(|| AdvisorError::Export("No dashboard data loaded yet".to_string()))?;

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(report_file_name(&report));
        tokio::fs::write(&path, serde_json::to_string_pretty(&report)?).await?;

        tracing::info!("Wrote market report to {:?}", path);
        Ok(path)
    }
}

impl SnapshotListener for ReportExporter {
    fn on_snapshot_loaded(&mut self, params: &FetchParams, snapshot: &Arc<DashboardSnapshot>) {
        if let Ok(mut state) = self.state.lock() {
            state.latest = Some((params.clone(), snapshot.clone()));
            state.loads += 1;
        }
    }
}

fn report_file_name(report: &MarketReport) -> String {
    let slug: String = report
        .params
        .industry
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = match slug.trim_matches('-') {
        "" => "market",
        trimmed => trimmed,
    };
    format!(
        "advisor-report-{}-{}.json",
        slug,
        report.generated_at.format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_falls_back_without_ascii_industry() {
        let report = MarketReport {
            generated_at: Utc::now(),
            params: FetchParams::new("人工知能"),
            snapshot: DashboardSnapshot::placeholder(),
        };
        let name = report_file_name(&report);
        assert!(name.starts_with("advisor-report-market-"));
        assert!(!name.contains("--"));
    }

    #[tokio::test]
    async fn test_export_without_data_fails() {
        let dir = TempDir::new().unwrap();
        let exporter = ReportExporter::new();
        let err = exporter.write_to(dir.path()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Export(_)));
    }

    #[tokio::test]
    async fn test_export_writes_latest_snapshot() {
        let dir = TempDir::new().unwrap();
        let exporter = ReportExporter::new();
        let mut listener = exporter.clone();

        let snapshot = Arc::new(DashboardSnapshot {
            market_size_usd_b: 42.0,
            ..DashboardSnapshot::placeholder()
        });
        listener.on_snapshot_loaded(&FetchParams::new("Health Care"), &snapshot);
        assert_eq!(exporter.load_count(), 1);

        let path = exporter.write_to(&dir.path().join("reports")).await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("advisor-report-health-care-"));

        let written: MarketReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.snapshot.market_size_usd_b, 42.0);
        assert_eq!(written.params.industry, "Health Care");
    }

    #[test]
    fn test_closure_listener() {
        let mut count = 0;
        {
            let mut listener = |_: &FetchParams, _: &Arc<DashboardSnapshot>| count += 1;
            let snapshot = Arc::new(DashboardSnapshot::placeholder());
            listener.on_snapshot_loaded(&FetchParams::new("x"), &snapshot);
            listener.on_snapshot_loaded(&FetchParams::new("x"), &snapshot);
        }
        assert_eq!(count, 2);
    }
}
