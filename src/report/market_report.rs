use serde::Serialize;

use super::{banner, relative_change, round_to};
use crate::evaluator::{Category, EarlyWarning, ScoreCard};
use crate::market::{MarketSnapshot, ReferenceMarket};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicesSection {
    #[serde(rename = "SSE_Composite")]
    pub sse_composite: f64,
    #[serde(rename = "CSI_300")]
    pub csi_300: f64,
    #[serde(rename = "YTD_Return")]
    pub ytd_return: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationSection {
    #[serde(rename = "PE_Ratio")]
    pub pe_ratio: f64,
    #[serde(rename = "CAPE")]
    pub cape: f64,
    #[serde(rename = "PB_Ratio")]
    pub pb_ratio: f64,
    #[serde(rename = "Dividend_Yield")]
    pub dividend_yield: f64,
    #[serde(rename = "Market_Cap_GDP")]
    pub market_cap_gdp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicSection {
    #[serde(rename = "GDP_Growth")]
    pub gdp_growth: f64,
    #[serde(rename = "CPI")]
    pub cpi: f64,
    #[serde(rename = "PMI")]
    pub pmi: f64,
    #[serde(rename = "Debt_GDP")]
    pub debt_gdp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleAnalysis {
    pub valuation_score: Option<f64>,
    pub momentum_score: Option<f64>,
    pub credit_score: Option<f64>,
    pub economy_score: Option<f64>,
    pub sentiment_score: Option<f64>,
    pub composite_bubble_score: f64,
    pub risk_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSection {
    #[serde(rename = "USA_Bubble_Score")]
    pub reference_bubble_score: f64,
    #[serde(rename = "China_Advantage")]
    pub advantage: f64,
    #[serde(rename = "PE_Discount")]
    pub pe_discount: f64,
    #[serde(rename = "CAPE_Discount")]
    pub cape_discount: f64,
    #[serde(rename = "GDP_Premium")]
    pub gdp_premium: f64,
}

/// JSON document written for a scored market.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketResults {
    pub date: String,
    pub market: String,
    pub indices: IndicesSection,
    pub valuation: ValuationSection,
    pub economic: EconomicSection,
    pub bubble_analysis: BubbleAnalysis,
    pub comparison_usa: ComparisonSection,
    pub early_warning: EarlyWarning,
}

pub struct MarketReport {
    snapshot: MarketSnapshot,
    reference: ReferenceMarket,
    card: ScoreCard,
    early_warning: EarlyWarning,
}

impl MarketReport {
    pub fn new(snapshot: MarketSnapshot, reference: ReferenceMarket, card: ScoreCard) -> Self {
        let early_warning = EarlyWarning::from_risks(&card.risks());
        Self {
            snapshot,
            reference,
            card,
            early_warning,
        }
    }

    pub fn card(&self) -> &ScoreCard {
        &self.card
    }

    pub fn early_warning(&self) -> &EarlyWarning {
        &self.early_warning
    }

    /// e.g. `china_bubble_oct2025_results`
    pub fn artifact_name(&self) -> String {
        format!(
            "{}_bubble_{}_results",
            self.snapshot.market.to_lowercase().replace(' ', "_"),
            self.snapshot.as_of.format("%b%Y").to_string().to_lowercase()
        )
    }

    pub fn comparison(&self) -> ComparisonSection {
        let s = &self.snapshot;
        let r = &self.reference;
        ComparisonSection {
            reference_bubble_score: r.bubble_score,
            advantage: round_to(r.bubble_score - self.card.composite, 1),
            pe_discount: round_to(relative_change(s.valuation.pe_ratio, r.pe_ratio), 1),
            cape_discount: round_to(relative_change(s.valuation.cape, r.cape), 1),
            gdp_premium: round_to(relative_change(s.economic.gdp_growth, r.gdp_growth), 1),
        }
    }

    pub fn results(&self) -> MarketResults {
        let s = &self.snapshot;
        let score_of = |c: Category| self.card.category(c).map(|cs| round_to(cs.score, 1));

        MarketResults {
            date: s.as_of.format("%Y-%m-%d").to_string(),
            market: s.market.clone(),
            indices: IndicesSection {
                sse_composite: s.indices.sse_composite,
                csi_300: s.indices.csi_300,
                ytd_return: round_to(s.indices.ytd_return * 100.0, 4),
            },
            valuation: ValuationSection {
                pe_ratio: s.valuation.pe_ratio,
                cape: s.valuation.cape,
                pb_ratio: s.valuation.pb_ratio,
                dividend_yield: round_to(s.valuation.dividend_yield * 100.0, 4),
                market_cap_gdp: round_to(s.valuation.market_cap_gdp * 100.0, 4),
            },
            economic: EconomicSection {
                gdp_growth: s.economic.gdp_growth,
                cpi: s.economic.cpi,
                pmi: s.economic.pmi,
                debt_gdp: round_to(s.credit.total_debt_gdp * 100.0, 4),
            },
            bubble_analysis: BubbleAnalysis {
                valuation_score: score_of(Category::Valuation),
                momentum_score: score_of(Category::Momentum),
                credit_score: score_of(Category::Credit),
                economy_score: score_of(Category::Economy),
                sentiment_score: score_of(Category::Sentiment),
                composite_bubble_score: round_to(self.card.composite, 1),
                risk_level: self.card.risk_level.label().to_string(),
            },
            comparison_usa: self.comparison(),
            early_warning: self.early_warning,
        }
    }

    pub fn summary(&self) -> String {
        let s = &self.snapshot;
        let r = &self.reference;
        let mut lines = vec![
            banner(&format!(
                "{} BUBBLE ANALYSIS - {}",
                s.market.to_uppercase(),
                s.as_of.format("%B %Y").to_string().to_uppercase()
            )),
            String::new(),
            "RAW DATA INPUT:".to_string(),
            format!("Shanghai Composite: {}", thousands(s.indices.sse_composite)),
            format!("CSI 300: {}", thousands(s.indices.csi_300)),
            format!("P/E Ratio: {:.1}", s.valuation.pe_ratio),
            format!("CAPE: {:.1}", s.valuation.cape),
            format!("GDP Growth: {:.1}%", s.economic.gdp_growth),
            format!("CPI: {:.1}%", s.economic.cpi),
            format!("Debt/GDP: {:.0}%", s.credit.total_debt_gdp * 100.0),
            String::new(),
            "--- CATEGORY RISK SCORES ---".to_string(),
        ];

        for (i, category) in self.card.categories.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!(
                "{}. {} RISK (weight {:.0}%):",
                i + 1,
                category.category.name().to_uppercase(),
                category.weight * 100.0
            ));
            for metric in self.card.metrics_in(category.category) {
                lines.push(format!(
                    "   {}: {:.1}/100 (value {}, {})",
                    metric.metric.label(),
                    metric.risk * 100.0,
                    metric.value,
                    metric.rule
                ));
            }
            lines.push(format!(
                "   -> {} SCORE: {:.1}/100",
                category.category.name().to_uppercase(),
                category.score
            ));
        }

        lines.push(String::new());
        lines.push(banner("COMPOSITE BUBBLE SCORE"));
        lines.push("Component Breakdown:".to_string());
        for category in &self.card.categories {
            lines.push(format!(
                "  {:<11} {:.1}/100 x {:.0}% = {:.2}",
                format!("{}:", category.category.name()),
                category.score,
                category.weight * 100.0,
                category.contribution()
            ));
        }
        lines.push(format!("COMPOSITE BUBBLE SCORE: {:.1}%", self.card.composite));
        lines.push(format!("Risk Classification: {}", self.card.risk_level));

        let comparison = self.comparison();
        let leader = if comparison.advantage >= 0.0 { &s.market } else { &r.market };
        lines.push(String::new());
        lines.push(banner(&format!(
            "{} vs {} COMPARISON",
            s.market.to_uppercase(),
            r.market.to_uppercase()
        )));
        lines.push("Bubble Risk:".to_string());
        lines.push(format!("  {}: {:.1}%", s.market, self.card.composite));
        lines.push(format!("  {}: {:.1}%", r.market, r.bubble_score));
        lines.push(format!(
            "  Advantage: {} ({:.1} pts lower risk)",
            leader,
            comparison.advantage.abs()
        ));
        lines.push(format!(
            "  P/E:  {} {:.1} vs {} {:.1} ({:+.1}%)",
            s.market, s.valuation.pe_ratio, r.market, r.pe_ratio, comparison.pe_discount
        ));
        lines.push(format!(
            "  CAPE: {} {:.1} vs {} {:.1} ({:+.1}%)",
            s.market, s.valuation.cape, r.market, r.cape, comparison.cape_discount
        ));
        lines.push(format!(
            "  GDP:  {} {:.1}% vs {} {:.1}% ({:+.1}%)",
            s.market, s.economic.gdp_growth, r.market, r.gdp_growth, comparison.gdp_premium
        ));

        let ew = &self.early_warning;
        lines.push(String::new());
        lines.push(format!(
            "Early warning: {} ({} of {} metrics past warning, {} past danger, index {:.2})",
            ew.level, ew.warnings, ew.monitored, ew.dangers, ew.index
        ));
        lines.join("\n")
    }
}

/// `3875.0` -> `3,875`
fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{BubbleScorer, RiskScale, Weights};
    use crate::market::presets;

    fn china_report() -> MarketReport {
        let snapshot = presets::china_oct_2025();
        let card = BubbleScorer::new(RiskScale::SixTier)
            .score(&snapshot, &presets::china_metric_table(), &Weights::standard())
            .unwrap();
        MarketReport::new(snapshot, presets::usa_reference(), card)
    }

    #[test]
    fn results_follow_fixed_schema() {
        let value = serde_json::to_value(china_report().results()).unwrap();
        for key in ["date", "market", "indices", "valuation", "economic", "bubble_analysis", "comparison_usa"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["date"], "2025-10-31");
        assert_eq!(value["indices"]["SSE_Composite"], 3875.0);
        assert_eq!(value["valuation"]["Dividend_Yield"], 2.8);
        assert_eq!(value["economic"]["Debt_GDP"], 285.0);
        assert_eq!(value["bubble_analysis"]["composite_bubble_score"], 50.3);
        assert_eq!(value["bubble_analysis"]["valuation_score"], 32.8);
        assert_eq!(value["bubble_analysis"]["risk_level"], "Elevated Risk");
        assert_eq!(value["comparison_usa"]["USA_Bubble_Score"], 42.0);
    }

    #[test]
    fn comparison_uses_reference_market() {
        let comparison = china_report().comparison();
        assert_eq!(comparison.advantage, -8.3);
        assert_eq!(comparison.pe_discount, -29.5);
        assert_eq!(comparison.cape_discount, -54.5);
        assert_eq!(comparison.gdp_premium, 80.0);
    }

    #[test]
    fn early_warning_counts_hot_metrics() {
        let report = china_report();
        let ew = report.early_warning();
        assert_eq!(ew.monitored, 19);
        assert_eq!(ew.warnings, 5);
        assert_eq!(ew.dangers, 0);
    }

    #[test]
    fn artifact_name_uses_market_and_month() {
        assert_eq!(china_report().artifact_name(), "china_bubble_oct2025_results");
    }

    #[test]
    fn summary_mentions_every_category() {
        let summary = china_report().summary();
        for category in Category::ALL {
            assert!(summary.contains(&format!("{} SCORE", category.name().to_uppercase())));
        }
        assert!(summary.contains("Shanghai Composite: 3,875"));
        assert!(summary.contains("Risk Classification: Elevated Risk"));
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(25900.0), "25,900");
        assert_eq!(thousands(999.0), "999");
        assert_eq!(thousands(-1234567.0), "-1,234,567");
    }
}
