use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::MarketSnapshot;
use crate::error::{BubbleError, Result};
use crate::evaluator::{Category, NormalizationRule};

/// A scored input, resolved against a [`MarketSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    PeRatio,
    Cape,
    PbRatio,
    MarketCapGdp,
    DividendYield,
    YtdReturn,
    Rsi,
    Volatility,
    MarginBalance,
    TotalDebtGdp,
    TsfGrowth,
    CreditImpulse,
    GdpGrowth,
    Inflation,
    Pmi,
    Unemployment,
    RetailParticipation,
    NorthboundFlow,
    ForeignOwnership,
}

impl Metric {
    pub fn value(&self, snapshot: &MarketSnapshot) -> f64 {
        let s = snapshot;
        match self {
            Self::PeRatio => s.valuation.pe_ratio,
            Self::Cape => s.valuation.cape,
            Self::PbRatio => s.valuation.pb_ratio,
            Self::MarketCapGdp => s.valuation.market_cap_gdp,
            Self::DividendYield => s.valuation.dividend_yield,
            Self::YtdReturn => s.indices.ytd_return,
            Self::Rsi => s.technical.rsi,
            Self::Volatility => s.technical.volatility,
            Self::MarginBalance => s.technical.margin_balance,
            Self::TotalDebtGdp => s.credit.total_debt_gdp,
            Self::TsfGrowth => s.credit.tsf_growth,
            Self::CreditImpulse => s.credit.credit_impulse,
            Self::GdpGrowth => s.economic.gdp_growth,
            Self::Inflation => s.economic.cpi,
            Self::Pmi => s.economic.pmi,
            Self::Unemployment => s.economic.unemployment,
            Self::RetailParticipation => s.sentiment.retail_participation,
            Self::NorthboundFlow => s.sentiment.northbound_flow_ytd,
            Self::ForeignOwnership => s.sentiment.foreign_ownership,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PeRatio => "P/E Risk",
            Self::Cape => "CAPE Risk",
            Self::PbRatio => "P/B Risk",
            Self::MarketCapGdp => "MC/GDP Risk",
            Self::DividendYield => "Div Yield Risk",
            Self::YtdReturn => "Price Momentum",
            Self::Rsi => "RSI Risk",
            Self::Volatility => "Volatility",
            Self::MarginBalance => "Margin Debt",
            Self::TotalDebtGdp => "Debt/GDP",
            Self::TsfGrowth => "Credit Growth",
            Self::CreditImpulse => "Credit Impulse",
            Self::GdpGrowth => "GDP Risk",
            Self::Inflation => "Inflation Risk",
            Self::Pmi => "PMI Risk",
            Self::Unemployment => "Unemployment",
            Self::RetailParticipation => "Retail Participation",
            Self::NorthboundFlow => "Foreign Flows",
            Self::ForeignOwnership => "Foreign Ownership",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub metric: Metric,
    pub category: Category,
    pub rule: NormalizationRule,
}

impl MetricSpec {
    pub fn new(metric: Metric, category: Category, rule: NormalizationRule) -> Self {
        Self { metric, category, rule }
    }
}

/// The historical ranges and rules used to score one market, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTable {
    pub specs: Vec<MetricSpec>,
}

impl MetricTable {
    pub fn new(specs: Vec<MetricSpec>) -> Self {
        Self { specs }
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading metric table {}", path.display()))?;
        let table: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing metric table {}", path.display()))?;
        table.validate()?;
        Ok(table)
    }

    /// Every rule must be well formed and each metric may appear once.
    pub fn validate(&self) -> Result<()> {
        if self.specs.is_empty() {
            return Err(BubbleError::validation_error("metric table is empty"));
        }
        let mut seen = HashSet::new();
        for spec in &self.specs {
            if !seen.insert(spec.metric) {
                return Err(BubbleError::validation_error(format!(
                    "metric {:?} listed more than once",
                    spec.metric
                )));
            }
            spec.rule.validate().map_err(|e| {
                BubbleError::validation_error(format!("metric {:?}: {}", spec.metric, e))
            })?;
        }
        Ok(())
    }

    pub fn for_category(&self, category: Category) -> impl Iterator<Item = &MetricSpec> {
        self.specs.iter().filter(move |spec| spec.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::presets;

    #[test]
    fn china_table_is_valid_and_covers_every_category() {
        let table = presets::china_metric_table();
        table.validate().unwrap();
        for category in Category::ALL {
            assert!(table.for_category(category).count() > 0, "{:?} has no metrics", category);
        }
        assert_eq!(table.specs.len(), 19);
    }

    #[test]
    fn duplicate_metric_is_rejected() {
        let spec = MetricSpec::new(Metric::Rsi, Category::Momentum, NormalizationRule::range(30.0, 80.0));
        let table = MetricTable::new(vec![spec, spec]);
        assert!(table.validate().is_err());
    }

    #[test]
    fn degenerate_range_names_the_metric() {
        let table = MetricTable::new(vec![MetricSpec::new(
            Metric::Pmi,
            Category::Economy,
            NormalizationRule::range(50.0, 50.0),
        )]);
        let err = table.validate().unwrap_err().to_string();
        assert!(err.contains("Pmi"), "{}", err);
    }

    #[test]
    fn metric_resolves_against_snapshot() {
        let snapshot = presets::china_oct_2025();
        assert_eq!(Metric::PeRatio.value(&snapshot), 15.5);
        assert_eq!(Metric::Inflation.value(&snapshot), 0.0);
        assert_eq!(Metric::NorthboundFlow.value(&snapshot), 380.0);
    }
}
