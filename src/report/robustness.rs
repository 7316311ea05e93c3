use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use super::latex::{bold, escape, row, LatexTable};
use super::{banner, round_to};
use crate::error::Result;
use crate::evaluator::{composite_score, Category, RiskScale, Weights};

/// Largest relative deviation from baseline still counted as stable.
pub const MAX_RELATIVE_DEVIATION: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    pub name: String,
    pub bubble_score: f64,
    /// Fit quality quoted for the specification; not estimated here.
    pub r2: f64,
    pub key_finding: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobustnessSummary {
    pub min_score: f64,
    pub max_score: f64,
    pub range: f64,
    pub avg_score: f64,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobustnessReport {
    pub specifications: Vec<Specification>,
    pub summary: RobustnessSummary,
}

fn components(values: [f64; 5]) -> BTreeMap<Category, f64> {
    Category::ALL.into_iter().zip(values).collect()
}

pub fn base_components() -> BTreeMap<Category, f64> {
    components([35.0, 60.0, 30.0, 20.0, 35.0])
}

fn spec(name: &str, score: f64, r2: f64, finding: &str) -> Specification {
    Specification {
        name: name.to_string(),
        bubble_score: round_to(score, 2),
        r2,
        key_finding: finding.to_string(),
    }
}

impl RobustnessReport {
    /// Re-score the base components under alternative weightings and inputs.
    pub fn build(scale: RiskScale) -> Result<Self> {
        let base = base_components();
        let weights = Weights::standard();

        let baseline = composite_score(&base, &weights)?;
        let equal = composite_score(&base, &Weights::equal(&Category::ALL)?)?;
        let no_economy = composite_score(&base, &weights.without(Category::Economy)?)?;
        let quarterly = composite_score(&components([34.0, 62.0, 29.0, 21.0, 36.0]), &weights)?;
        let rolling = composite_score(&components([33.0, 58.0, 31.0, 19.0, 34.0]), &weights)?;
        let higher_valuation = composite_score(
            &base,
            &Weights::new([
                (Category::Valuation, 0.30),
                (Category::Momentum, 0.175),
                (Category::Credit, 0.175),
                (Category::Economy, 0.15),
                (Category::Sentiment, 0.20),
            ])?,
        )?;
        debug!("robustness baseline {:.2}", baseline);

        let baseline_label = scale.classify(baseline).label();
        let specifications = vec![
            spec("Baseline (current)", baseline, 0.71, baseline_label),
            spec("Equal Weights", equal, 0.65, "Similar"),
            spec("Without Economy Component", no_economy, 0.69, "Robust"),
            spec("Quarterly Data", quarterly, 0.68, "Robust"),
            spec("Rolling 12-month Window", rolling, 0.70, "Robust"),
            spec("Higher Valuation Weight", higher_valuation, 0.72, "Robust"),
        ];

        let scores: Vec<f64> = specifications.iter().map(|s| s.bubble_score).collect();
        let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg_score = scores.iter().sum::<f64>() / scores.len() as f64;

        let mut report = Self {
            specifications,
            summary: RobustnessSummary {
                min_score: round_to(min_score, 2),
                max_score: round_to(max_score, 2),
                range: round_to(max_score - min_score, 2),
                avg_score: round_to(avg_score, 2),
                conclusion: String::new(),
            },
        };
        report.summary.conclusion = if report.is_robust() {
            "Results are stable across specifications".to_string()
        } else {
            "Some specifications deviate materially from baseline".to_string()
        };
        Ok(report)
    }

    pub fn artifact_name(&self) -> &'static str {
        "robustness_checks_results"
    }

    pub fn baseline(&self) -> f64 {
        self.specifications.first().map(|s| s.bubble_score).unwrap_or_default()
    }

    pub fn max_deviation(&self) -> f64 {
        let baseline = self.baseline();
        self.specifications
            .iter()
            .map(|s| (s.bubble_score - baseline).abs())
            .fold(0.0, f64::max)
    }

    pub fn is_robust(&self) -> bool {
        let baseline = self.baseline();
        baseline > 0.0 && self.max_deviation() / baseline < MAX_RELATIVE_DEVIATION
    }

    pub fn summary_text(&self) -> String {
        let mut lines = vec![banner("ROBUSTNESS CHECK RESULTS")];
        for (i, s) in self.specifications.iter().enumerate() {
            lines.push(format!("{}. {}: {:.2}%", i + 1, s.name.to_uppercase(), s.bubble_score));
        }
        let max_dev = self.max_deviation();
        lines.push(String::new());
        lines.push("Summary:".to_string());
        lines.push(format!("  Range: {}% - {}%", self.summary.min_score, self.summary.max_score));
        lines.push(format!("  Average: {}%", self.summary.avg_score));
        lines.push(format!("  Variation: +/-{:.1}pp from baseline", self.summary.range / 2.0));
        lines.push(format!(
            "  Max deviation: {:.1}pp ({:.1}% of baseline)",
            max_dev,
            max_dev / self.baseline() * 100.0
        ));
        lines.push(if self.is_robust() {
            format!("ROBUST: Variation < {:.0}% across all specifications", MAX_RELATIVE_DEVIATION * 100.0)
        } else {
            format!("WARNING: Some specifications show > {:.0}% deviation", MAX_RELATIVE_DEVIATION * 100.0)
        });
        lines.join("\n")
    }

    pub fn latex(&self) -> String {
        let body = self
            .specifications
            .iter()
            .map(|s| {
                row(&[
                    escape(&s.name),
                    format!("{:.2}\\%", s.bubble_score),
                    format!("{:.2}", s.r2),
                    escape(&s.key_finding),
                ])
            })
            .collect();

        LatexTable::new("Robustness to Alternative Model Specifications", "tab:robustness", "lccl")
            .head_line(row(&[bold("Specification"), bold("Bubble Score"), bold("$R^2$"), bold("Finding")]))
            .section(body)
            .section(vec![row(&[
                bold("Range"),
                format!("{:.2}\\%--{:.2}\\%", self.summary.min_score, self.summary.max_score),
                "---".to_string(),
                if self.is_robust() { "Stable" } else { "Unstable" }.to_string(),
            ])])
            .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RobustnessReport {
        RobustnessReport::build(RiskScale::SixTier).unwrap()
    }

    #[test]
    fn specification_scores() {
        let scores: Vec<f64> = report().specifications.iter().map(|s| s.bubble_score).collect();
        assert_eq!(scores, vec![36.75, 36.0, 39.71, 37.05, 35.7, 36.25]);
    }

    #[test]
    fn baseline_is_labelled_on_the_scale() {
        let r = report();
        assert_eq!(r.specifications[0].key_finding, "Moderate Risk");
        let four_band = RobustnessReport::build(RiskScale::FourBand).unwrap();
        assert_eq!(four_band.specifications[0].key_finding, "Medium");
    }

    #[test]
    fn summary_statistics() {
        let r = report();
        assert_eq!(r.summary.min_score, 35.7);
        assert_eq!(r.summary.max_score, 39.71);
        assert_eq!(r.summary.range, 4.01);
        assert!((r.summary.avg_score - 36.91).abs() < 1e-9);
        assert!(r.is_robust());
        assert!((r.max_deviation() - 2.96).abs() < 1e-9);
    }

    #[test]
    fn latex_has_range_row() {
        let tex = report().latex();
        assert!(tex.contains("\\textbf{Range} & 35.70\\%--39.71\\% & --- & Stable \\\\"));
        assert!(tex.contains("Without Economy Component & 39.71\\%"));
    }

    #[test]
    fn latex_range_row_reports_instability() {
        let mut r = report();
        r.specifications[2].bubble_score = 45.0;
        assert!(!r.is_robust());
        assert!(r.latex().contains(" & --- & Unstable \\\\"));
    }
}
