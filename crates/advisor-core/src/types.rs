//! Core type definitions for the market dashboard

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle stage of a market, as reported by the statistics service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketMaturity {
    #[default]
    Emerging,
    Growing,
    Mature,
    Declining,
}

impl MarketMaturity {
    /// All labels in display order
    pub const ALL: [MarketMaturity; 4] = [
        MarketMaturity::Emerging,
        MarketMaturity::Growing,
        MarketMaturity::Mature,
        MarketMaturity::Declining,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Emerging => "Emerging",
            Self::Growing => "Growing",
            Self::Mature => "Mature",
            Self::Declining => "Declining",
        }
    }
}

impl std::fmt::Display for MarketMaturity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for MarketMaturity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "emerging" => Ok(Self::Emerging),
            "growing" => Ok(Self::Growing),
            "mature" => Ok(Self::Mature),
            "declining" => Ok(Self::Declining),
            _ => Err(format!("Invalid market maturity: {}", s)),
        }
    }
}

/// A leading company in the selected market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPlayer {
    pub name: String,
    #[serde(default)]
    pub market_share_percent: f64,
    #[serde(default)]
    pub headquarters: Option<String>,
}

/// Adoption level of one technology across the market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyAdoption {
    pub technology: String,
    #[serde(default)]
    pub adoption_rate_percent: f64,
}

/// Share of market activity located in one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionShare {
    pub region: String,
    #[serde(default)]
    pub share_percent: f64,
}

/// Investment volume for one reporting period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentTrend {
    pub period: String,
    #[serde(default)]
    pub total_usd_m: f64,
    #[serde(default)]
    pub deal_count: u32,
}

/// The four secondary data groups rendered below the headline metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    KeyPlayers,
    TechnologyAdoption,
    GeographicDistribution,
    InvestmentTrends,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [
        SectionKind::KeyPlayers,
        SectionKind::TechnologyAdoption,
        SectionKind::GeographicDistribution,
        SectionKind::InvestmentTrends,
    ];

    /// Panel title
    pub fn title(&self) -> &'static str {
        match self {
            Self::KeyPlayers => "Key Players",
            Self::TechnologyAdoption => "Technology Adoption",
            Self::GeographicDistribution => "Geographic Distribution",
            Self::InvestmentTrends => "Investment Trends",
        }
    }
}

/// One complete statistics result from a single fetch.
///
/// Sections are never absent: a missing or `null` section on the wire
/// becomes an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    #[serde(rename = "marketSizeUSD_B")]
    pub market_size_usd_b: f64,
    pub growth_rate_percent: f64,
    #[serde(rename = "avgDealSizeUSD_K")]
    pub avg_deal_size_usd_k: f64,
    pub market_maturity: MarketMaturity,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_players: Vec<KeyPlayer>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub technology_adoption: Vec<TechnologyAdoption>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub geographic_distribution: Vec<RegionShare>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub investment_trends: Vec<InvestmentTrend>,
}

impl DashboardSnapshot {
    /// Zero-valued stand-in used before real data arrives
    pub fn placeholder() -> Self {
        Self {
            market_size_usd_b: 0.0,
            growth_rate_percent: 0.0,
            avg_deal_size_usd_k: 0.0,
            market_maturity: MarketMaturity::Emerging,
            key_players: Vec::new(),
            technology_adoption: Vec::new(),
            geographic_distribution: Vec::new(),
            investment_trends: Vec::new(),
        }
    }

    /// Number of records in a section
    pub fn section_len(&self, kind: SectionKind) -> usize {
        match kind {
            SectionKind::KeyPlayers => self.key_players.len(),
            SectionKind::TechnologyAdoption => self.technology_adoption.len(),
            SectionKind::GeographicDistribution => self.geographic_distribution.len(),
            SectionKind::InvestmentTrends => self.investment_trends.len(),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inputs that identify one dashboard fetch.
///
/// Two fetches with equal params are the same fetch as far as retry
/// suppression is concerned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    pub industry: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub company_size: Option<String>,
}

impl FetchParams {
    pub fn new(industry: impl Into<String>) -> Self {
        Self {
            industry: industry.into(),
            region: None,
            company_size: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_company_size(mut self, size: impl Into<String>) -> Self {
        self.company_size = Some(size.into());
        self
    }
}

impl std::fmt::Display for FetchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.industry)?;
        if let Some(region) = &self.region {
            write!(f, " / {}", region)?;
        }
        if let Some(size) = &self.company_size {
            write!(f, " ({})", size)?;
        }
        Ok(())
    }
}
