pub mod normalizer;
pub mod scorer;
pub mod risk_analyzer;
pub mod early_warning;
pub mod trend;

pub use normalizer::{percentile_normalize, NormalizationRule};
pub use scorer::{category_score, composite_score, BubbleScorer, Weights};
pub use risk_analyzer::{Boundary, RiskLevel, RiskScale};
pub use early_warning::{EarlyWarning, WarningLevel};
pub use trend::{check_exponential_growth, GrowthCheck};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::market::Metric;

/// Risk domains that make up the composite score, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Valuation,
    Momentum,
    Credit,
    Economy,
    Sentiment,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Valuation,
        Category::Momentum,
        Category::Credit,
        Category::Economy,
        Category::Sentiment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Valuation => "Valuation",
            Self::Momentum => "Momentum",
            Self::Credit => "Credit",
            Self::Economy => "Economy",
            Self::Sentiment => "Sentiment",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRisk {
    pub metric: Metric,
    pub category: Category,
    pub value: f64,
    pub rule: NormalizationRule,
    /// Normalized risk in [0, 1].
    pub risk: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: Category,
    /// Unweighted mean of metric risks, in [0, 100].
    pub score: f64,
    pub weight: f64,
}

impl CategoryScore {
    pub fn contribution(&self) -> f64 {
        self.score * self.weight
    }
}

/// Full result of scoring one market.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreCard {
    pub metric_risks: Vec<MetricRisk>,
    pub categories: Vec<CategoryScore>,
    pub composite: f64,
    pub risk_level: RiskLevel,
}

impl ScoreCard {
    pub fn category(&self, category: Category) -> Option<&CategoryScore> {
        self.categories.iter().find(|c| c.category == category)
    }

    pub fn metrics_in(&self, category: Category) -> impl Iterator<Item = &MetricRisk> {
        self.metric_risks.iter().filter(move |m| m.category == category)
    }

    pub fn risks(&self) -> Vec<f64> {
        self.metric_risks.iter().map(|m| m.risk).collect()
    }
}
