//! Integration tests for the dashboard controller.
//!
//! These drive the public API end to end: a JSON fixture source, the full
//! reveal sequence, section gating and report export.

use advisor_core::config::SourceConfig;
use advisor_core::{AdvisorConfig, FetchParams, SectionKind};
use advisor_dashboard::{
    source_from_config, DashboardController, FetchStatus, GateOutput, ReportExporter,
    SectionView, Stage,
};
use std::path::Path;
use tempfile::TempDir;

const SCENARIO: &str = r#"{
    "marketSizeUSD_B": 42,
    "growthRatePercent": 18.5,
    "avgDealSizeUSD_K": 75,
    "marketMaturity": "Growing",
    "keyPlayers": [
        {"name": "Acme", "marketSharePercent": 30},
        {"name": "Globex", "marketSharePercent": 22, "headquarters": "Berlin"},
        {"name": "Initech", "marketSharePercent": 9.5}
    ],
    "technologyAdoption": null,
    "geographicDistribution": [
        {"region": "North America", "sharePercent": 55},
        {"region": "EMEA", "sharePercent": 30}
    ]
}"#;

fn fixture_config(dir: &Path, body: &str) -> AdvisorConfig {
    let fixture = dir.join("snapshot.json");
    std::fs::write(&fixture, body).unwrap();

    let mut config = AdvisorConfig::default();
    config.source = SourceConfig {
        fixture: Some(fixture),
        ..SourceConfig::default()
    };
    config.export.dir = dir.join("reports");
    config
}

#[tokio::test(start_paused = true)]
async fn test_fixture_scenario_reveals_to_done() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(dir.path(), SCENARIO);
    let source = source_from_config(&config.source).unwrap();

    let exporter = ReportExporter::new();
    let mut controller = DashboardController::new(source, &config);
    controller.subscribe(Box::new(exporter.clone()));

    assert!(controller.set_params(FetchParams::new("Artificial Intelligence")));
    assert_eq!(controller.wait_for_fetch().await, FetchStatus::Loaded);

    while controller.reveal_state().stage != Stage::Done {
        controller.process_next().await;
    }

    let view = controller.view();
    assert_eq!(view.display_market_size, "$42B");
    assert_eq!(view.display_growth_rate, "18.5%");
    assert_eq!(view.display_deal_size, "$75K");
    assert_eq!(view.display_maturity, "Growing");

    assert_eq!(
        controller.sections(),
        GateOutput::Panels(vec![
            (SectionKind::KeyPlayers, SectionView::Data(3)),
            (SectionKind::GeographicDistribution, SectionView::Data(2)),
        ])
    );

    let path = exporter.write_to(&config.export.dir).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["params"]["industry"], "Artificial Intelligence");
    assert_eq!(report["snapshot"]["marketSizeUSD_B"], 42.0);
    assert_eq!(exporter.load_count(), 1);
}

#[tokio::test]
async fn test_unreadable_fixture_fails_without_banner() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(dir.path(), "{ not json");
    let source = source_from_config(&config.source).unwrap();

    let mut controller = DashboardController::new(source, &config);
    controller.set_params(FetchParams::new("Fintech"));

    assert_eq!(controller.wait_for_fetch().await, FetchStatus::Failed);
    assert!(controller.view().quota_message.is_none());
    assert!(matches!(controller.sections(), GateOutput::Empty(_)));
}
