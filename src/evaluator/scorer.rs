use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::{Category, CategoryScore, MetricRisk, RiskLevel, RiskScale, ScoreCard};
use crate::error::{BubbleError, Result};
use crate::market::{MarketSnapshot, MetricTable};

/// Allowed drift of the weight total from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Per-category weights applied at the composite layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights(BTreeMap<Category, f64>);

impl Weights {
    pub fn new(entries: impl IntoIterator<Item = (Category, f64)>) -> Result<Self> {
        let mut weights = BTreeMap::new();
        for (category, weight) in entries {
            if !(0.0..=1.0).contains(&weight) {
                return Err(BubbleError::validation_error(format!(
                    "weight for {} must be in [0, 1], got {}",
                    category, weight
                )));
            }
            if weights.insert(category, weight).is_some() {
                return Err(BubbleError::validation_error(format!(
                    "weight for {} given twice",
                    category
                )));
            }
        }

        let total: f64 = weights.values().sum();
        if (total - 1.0).abs() >= WEIGHT_TOLERANCE {
            return Err(BubbleError::validation_error(format!(
                "weights must sum to 1.0, got {}",
                total
            )));
        }
        Ok(Self(weights))
    }

    /// Valuation 25%, Momentum 20%, Credit 20%, Economy 15%, Sentiment 20%.
    pub fn standard() -> Self {
        Self(BTreeMap::from([
            (Category::Valuation, 0.25),
            (Category::Momentum, 0.20),
            (Category::Credit, 0.20),
            (Category::Economy, 0.15),
            (Category::Sentiment, 0.20),
        ]))
    }

    pub fn equal(categories: &[Category]) -> Result<Self> {
        if categories.is_empty() {
            return Err(BubbleError::validation_error("no categories to weight"));
        }
        let share = 1.0 / categories.len() as f64;
        Self::new(categories.iter().map(|&c| (c, share)))
    }

    /// Drop `category` and spread its weight over the rest in proportion to their weights.
    pub fn without(&self, category: Category) -> Result<Self> {
        let removed = self.get(category).ok_or_else(|| {
            BubbleError::validation_error(format!("{} is not weighted", category))
        })?;
        let remaining = 1.0 - removed;
        if remaining <= 0.0 {
            return Err(BubbleError::validation_error(format!(
                "cannot drop {}: it carries all of the weight",
                category
            )));
        }
        Self::new(
            self.0
                .iter()
                .filter(|(c, _)| **c != category)
                .map(|(&c, &w)| (c, w / remaining)),
        )
    }

    pub fn get(&self, category: Category) -> Option<f64> {
        self.0.get(&category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        self.0.iter().map(|(&c, &w)| (c, w))
    }
}

impl Serialize for Weights {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(c, w)| (c.name(), w)))
    }
}

/// Unweighted mean of normalized risks, scaled to [0, 100].
pub fn category_score(risks: &[f64]) -> Result<f64> {
    if risks.is_empty() {
        return Err(BubbleError::validation_error("category has no metrics to average"));
    }
    Ok(risks.iter().sum::<f64>() / risks.len() as f64 * 100.0)
}

/// `Σ score × weight` over the weighted categories.
pub fn composite_score(scores: &BTreeMap<Category, f64>, weights: &Weights) -> Result<f64> {
    weights.iter().try_fold(0.0, |total, (category, weight)| -> Result<f64> {
        let score = scores.get(&category).ok_or_else(|| {
            BubbleError::validation_error(format!("no score for weighted category {}", category))
        })?;
        Ok(total + score * weight)
    })
}

/// Normalize, average, weight and classify.
pub struct BubbleScorer {
    scale: RiskScale,
}

impl BubbleScorer {
    pub fn new(scale: RiskScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> RiskScale {
        self.scale
    }

    pub fn score(
        &self,
        snapshot: &MarketSnapshot,
        table: &MetricTable,
        weights: &Weights,
    ) -> Result<ScoreCard> {
        info!("Scoring {} as of {}", snapshot.market, snapshot.as_of);
        table.validate()?;

        let mut metric_risks = Vec::with_capacity(table.specs.len());
        for spec in &table.specs {
            let value = spec.metric.value(snapshot);
            let risk = spec.rule.apply(value)?;
            if spec.rule.unit_mismatch(value) {
                warn!(
                    "{:?}: value {} looks like a percentage but the rule is {}; express it as a fraction",
                    spec.metric, value, spec.rule
                );
            }
            debug!("{:?}: value={} risk={:.4}", spec.metric, value, risk);
            metric_risks.push(MetricRisk {
                metric: spec.metric,
                category: spec.category,
                value,
                rule: spec.rule,
                risk,
            });
        }

        let mut categories = Vec::new();
        let mut scores = BTreeMap::new();
        for category in Category::ALL {
            let risks: Vec<f64> = metric_risks
                .iter()
                .filter(|m| m.category == category)
                .map(|m| m.risk)
                .collect();

            match (risks.is_empty(), weights.get(category)) {
                (true, None) => continue,
                (true, Some(_)) => {
                    return Err(BubbleError::validation_error(format!(
                        "weighted category {} has no metrics",
                        category
                    )))
                }
                (false, None) => {
                    return Err(BubbleError::validation_error(format!(
                        "category {} has metrics but no weight",
                        category
                    )))
                }
                (false, Some(weight)) => {
                    let score = category_score(&risks)?;
                    debug!("{} score {:.2} (weight {})", category, score, weight);
                    scores.insert(category, score);
                    categories.push(CategoryScore { category, score, weight });
                }
            }
        }

        let composite = composite_score(&scores, weights)?;
        let risk_level = self.scale.classify(composite);
        info!("Composite bubble score {:.2} -> {}", composite, risk_level);

        Ok(ScoreCard {
            metric_risks,
            categories,
            composite,
            risk_level,
        })
    }

    /// Composite and label for category scores that are already known.
    pub fn score_components(
        &self,
        components: &BTreeMap<Category, f64>,
        weights: &Weights,
    ) -> Result<(f64, RiskLevel)> {
        let composite = composite_score(components, weights)?;
        Ok((composite, self.scale.classify(composite)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::presets;

    fn example_components() -> BTreeMap<Category, f64> {
        BTreeMap::from([
            (Category::Valuation, 35.0),
            (Category::Momentum, 60.0),
            (Category::Credit, 30.0),
            (Category::Economy, 20.0),
            (Category::Sentiment, 35.0),
        ])
    }

    #[test]
    fn standard_weights_sum_to_one() {
        let total: f64 = Weights::standard().iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < WEIGHT_TOLERANCE);
    }

    #[test]
    fn composite_is_weighted_sum() {
        let scorer = BubbleScorer::new(RiskScale::SixTier);
        let (composite, level) = scorer
            .score_components(&example_components(), &Weights::standard())
            .unwrap();
        assert!((composite - 36.75).abs() < 1e-9);
        assert_eq!(level.label(), "Moderate Risk");
    }

    #[test]
    fn weights_off_by_more_than_tolerance_are_rejected() {
        let result = Weights::new([
            (Category::Valuation, 0.294),
            (Category::Momentum, 0.235),
            (Category::Credit, 0.235),
            (Category::Sentiment, 0.235),
        ]);
        assert!(matches!(result, Err(BubbleError::Validation(_))));
        assert!(Weights::new([(Category::Valuation, 1.5)]).is_err());
    }

    #[test]
    fn dropping_a_category_redistributes_proportionally() {
        let weights = Weights::standard().without(Category::Economy).unwrap();
        assert_eq!(weights.get(Category::Economy), None);
        assert!((weights.get(Category::Valuation).unwrap() - 0.25 / 0.85).abs() < 1e-12);
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < WEIGHT_TOLERANCE);
    }

    #[test]
    fn missing_category_score_is_an_error() {
        let mut components = example_components();
        components.remove(&Category::Credit);
        assert!(composite_score(&components, &Weights::standard()).is_err());
    }

    #[test]
    fn empty_category_is_an_error() {
        assert!(category_score(&[]).is_err());
        assert!((category_score(&[0.2, 0.4]).unwrap() - 30.0).abs() < 1e-12);
    }

    #[test]
    fn china_preset_scores_elevated() {
        let scorer = BubbleScorer::new(RiskScale::SixTier);
        let card = scorer
            .score(
                &presets::china_oct_2025(),
                &presets::china_metric_table(),
                &Weights::standard(),
            )
            .unwrap();

        let valuation = card.category(Category::Valuation).unwrap().score;
        let momentum = card.category(Category::Momentum).unwrap().score;
        let credit = card.category(Category::Credit).unwrap().score;
        let economy = card.category(Category::Economy).unwrap().score;
        let sentiment = card.category(Category::Sentiment).unwrap().score;
        assert!((valuation - 32.7867).abs() < 1e-3);
        assert!((momentum - 62.7892).abs() < 1e-3);
        assert!((credit - 57.2222).abs() < 1e-3);
        assert!((economy - 37.3333).abs() < 1e-3);
        assert!((sentiment - 62.4802).abs() < 1e-3);

        assert!((card.composite - 50.295).abs() < 1e-2);
        assert_eq!(card.risk_level.label(), "Elevated Risk");

        let contributions: f64 = card.categories.iter().map(|c| c.contribution()).sum();
        assert!((contributions - card.composite).abs() < 1e-9);
    }

    #[test]
    fn metrics_without_weight_are_rejected() {
        let scorer = BubbleScorer::new(RiskScale::SixTier);
        let weights = Weights::standard().without(Category::Sentiment).unwrap();
        let result = scorer.score(
            &presets::china_oct_2025(),
            &presets::china_metric_table(),
            &weights,
        );
        assert!(result.is_err());
    }
}
