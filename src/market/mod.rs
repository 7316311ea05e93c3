pub mod metrics;
pub mod presets;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use metrics::{Metric, MetricSpec, MetricTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexLevels {
    pub sse_composite: f64,
    pub csi_300: f64,
    pub hang_seng: f64,
    /// Year-to-date return as a fraction (0.357 = +35.7%).
    pub ytd_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationInputs {
    pub pe_ratio: f64,
    pub pb_ratio: f64,
    pub cape: f64,
    /// Fraction, 0.028 = 2.8%.
    pub dividend_yield: f64,
    /// Fraction of GDP, 1.058 = 105.8%.
    pub market_cap_gdp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicInputs {
    /// Percent.
    pub gdp_growth: f64,
    pub cpi: f64,
    pub ppi: f64,
    pub youth_unemployment: f64,
    pub unemployment: f64,
    pub pmi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditInputs {
    pub total_debt_gdp: f64,
    pub corporate_debt_gdp: f64,
    pub household_debt_gdp: f64,
    pub tsf_growth: f64,
    pub credit_impulse: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalInputs {
    pub rsi: f64,
    /// Annualized volatility in percent.
    pub volatility: f64,
    /// Billions of local currency.
    pub margin_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentInputs {
    pub retail_participation: f64,
    pub foreign_ownership: f64,
    /// Billions of local currency, year to date.
    pub northbound_flow_ytd: f64,
}

/// Hand-entered market readings at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub market: String,
    pub as_of: NaiveDate,
    pub indices: IndexLevels,
    pub valuation: ValuationInputs,
    pub economic: EconomicInputs,
    pub credit: CreditInputs,
    pub technical: TechnicalInputs,
    pub sentiment: SentimentInputs,
}

impl MarketSnapshot {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing snapshot {}", path.display()))
    }
}

/// Comparison market whose headline figures are taken as given, not scored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMarket {
    pub market: String,
    /// Composite bubble score in [0, 100].
    pub bubble_score: f64,
    pub pe_ratio: f64,
    pub cape: f64,
    pub gdp_growth: f64,
}
