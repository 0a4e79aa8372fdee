//! Dashboard statistics sources
//!
//! The controller only knows `StatsSource`. Two implementations ship here:
//! an HTTP client for the statistics service and a JSON file reader for
//! offline work.

use advisor_core::config::SourceConfig;
use advisor_core::{AdvisorError, DashboardSnapshot, FetchParams, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Async provider of dashboard snapshots.
///
/// Failures must describe themselves well enough for
/// [`classify_failure`](crate::classify::classify_failure) to tell a rate
/// limit from anything else.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_dashboard_data(&self, params: &FetchParams) -> Result<DashboardSnapshot>;
}

/// Fetches snapshots from the statistics service over HTTP
#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpStatsSource {
    /// Build a client from config. The API key is read from the configured
    /// environment variable if it is set.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AdvisorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: std::env::var(&config.api_key_env).ok(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/dashboard", self.base_url)
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch_dashboard_data(&self, params: &FetchParams) -> Result<DashboardSnapshot> {
        let mut query = vec![("industry", params.industry.as_str())];
        if let Some(region) = &params.region {
            query.push(("region", region.as_str()));
        }
        if let Some(size) = &params.company_size {
            query.push(("companySize", size.as_str()));
        }

        tracing::debug!("Requesting dashboard data for {}", params);

        let mut request = self.client.get(self.endpoint()).query(&query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdvisorError::Fetch(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown".to_string());
            return Err(AdvisorError::Http {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<DashboardSnapshot>()
            .await
            .map_err(|e| AdvisorError::Fetch(format!("Failed to parse response: {}", e)))
    }
}

/// Reads a snapshot from a JSON file on every fetch
#[derive(Debug, Clone)]
pub struct FileStatsSource {
    path: PathBuf,
}

impl FileStatsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StatsSource for FileStatsSource {
    async fn fetch_dashboard_data(&self, params: &FetchParams) -> Result<DashboardSnapshot> {
        tracing::debug!("Reading dashboard data for {} from {:?}", params, self.path);
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Pick the source the config asks for
pub fn source_from_config(config: &SourceConfig) -> Result<Arc<dyn StatsSource>> {
    match &config.fixture {
        Some(path) => Ok(Arc::new(FileStatsSource::new(path.clone()))),
        None => Ok(Arc::new(HttpStatsSource::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::MarketMaturity;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(
            &path,
            r#"{"marketSizeUSD_B": 12, "growthRatePercent": 3.4, "avgDealSizeUSD_K": 50, "marketMaturity": "Mature"}"#,
        )
        .unwrap();

        let source = FileStatsSource::new(&path);
        let snapshot = source
            .fetch_dashboard_data(&FetchParams::new("Retail"))
            .await
            .unwrap();
        assert_eq!(snapshot.market_size_usd_b, 12.0);
        assert_eq!(snapshot.market_maturity, MarketMaturity::Mature);
    }

    #[tokio::test]
    async fn test_file_source_missing_file_is_io_error() {
        let source = FileStatsSource::new("/nonexistent/advisor/snapshot.json");
        let err = source
            .fetch_dashboard_data(&FetchParams::new("Retail"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Io(_)));
    }

    #[test]
    fn test_http_endpoint_trims_trailing_slash() {
        let config = SourceConfig {
            base_url: "https://stats.example.com/api/".to_string(),
            ..SourceConfig::default()
        };
        let source = HttpStatsSource::new(&config).unwrap();
        assert_eq!(source.endpoint(), "https://stats.example.com/api/dashboard");
    }

    #[test]
    fn test_source_from_config_prefers_fixture() {
        let config = SourceConfig {
            fixture: Some(PathBuf::from("fixture.json")),
            ..SourceConfig::default()
        };
        assert!(source_from_config(&config).is_ok());
    }
}
