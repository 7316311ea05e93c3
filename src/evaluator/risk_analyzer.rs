use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::BubbleError;

/// Which side of a threshold a value sitting exactly on it falls to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// `score < upper` stays in the bucket; a score equal to the threshold starts the next one.
    StartsNextBucket,
    /// `score <= upper` stays in the bucket; a score equal to the threshold closes the lower one.
    ClosesLowerBucket,
}

/// Index of the bucket `value` falls into, given ascending upper `thresholds`.
/// Returns `thresholds.len()` when the value is above every threshold.
pub(crate) fn bucket(value: f64, thresholds: &[f64], boundary: Boundary) -> usize {
    thresholds
        .iter()
        .position(|&upper| match boundary {
            Boundary::StartsNextBucket => value < upper,
            Boundary::ClosesLowerBucket => value <= upper,
        })
        .unwrap_or(thresholds.len())
}

const SIX_TIER_THRESHOLDS: [f64; 5] = [20.0, 35.0, 50.0, 65.0, 80.0];
const SIX_TIER_LABELS: [&str; 6] = [
    "Minimal Risk",
    "Low-Moderate Risk",
    "Moderate Risk",
    "Elevated Risk",
    "High Risk",
    "Extreme Risk",
];

const FOUR_BAND_THRESHOLDS: [f64; 3] = [30.0, 50.0, 70.0];
const FOUR_BAND_LABELS: [&str; 4] = ["Low", "Medium", "High", "Critical"];

/// Cutoff table used to label a composite score in [0, 100].
///
/// The two scales disagree on both cutoffs and boundary handling. They are kept
/// side by side rather than merged; pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskScale {
    /// Minimal / Low-Moderate / Moderate / Elevated / High / Extreme at 20, 35, 50, 65, 80.
    #[default]
    SixTier,
    /// Low / Medium / High / Critical at 30, 50, 70 (0.3, 0.5, 0.7 on the unit scale).
    FourBand,
}

impl RiskScale {
    pub fn thresholds(&self) -> &'static [f64] {
        match self {
            Self::SixTier => &SIX_TIER_THRESHOLDS,
            Self::FourBand => &FOUR_BAND_THRESHOLDS,
        }
    }

    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            Self::SixTier => &SIX_TIER_LABELS,
            Self::FourBand => &FOUR_BAND_LABELS,
        }
    }

    pub fn boundary(&self) -> Boundary {
        match self {
            Self::SixTier => Boundary::StartsNextBucket,
            Self::FourBand => Boundary::ClosesLowerBucket,
        }
    }

    pub fn classify(&self, composite: f64) -> RiskLevel {
        RiskLevel {
            scale: *self,
            rank: bucket(composite, self.thresholds(), self.boundary()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::SixTier => "six-tier",
            Self::FourBand => "four-band",
        }
    }
}

impl FromStr for RiskScale {
    type Err = BubbleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "six-tier" | "six" => Ok(Self::SixTier),
            "four-band" | "four" => Ok(Self::FourBand),
            other => Err(BubbleError::config_error(format!(
                "unknown risk scale '{}', expected six-tier or four-band",
                other
            ))),
        }
    }
}

impl fmt::Display for RiskScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordinal risk label; `rank` 0 is the calmest bucket of its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskLevel {
    scale: RiskScale,
    rank: usize,
}

impl RiskLevel {
    pub fn scale(&self) -> RiskScale {
        self.scale
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn label(&self) -> &'static str {
        self.scale.labels()[self.rank]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_tier_labels_between_thresholds() {
        let scale = RiskScale::SixTier;
        assert_eq!(scale.classify(0.0).label(), "Minimal Risk");
        assert_eq!(scale.classify(32.5).label(), "Low-Moderate Risk");
        assert_eq!(scale.classify(36.75).label(), "Moderate Risk");
        assert_eq!(scale.classify(42.0).label(), "Moderate Risk");
        assert_eq!(scale.classify(50.3).label(), "Elevated Risk");
        assert_eq!(scale.classify(79.99).label(), "High Risk");
        assert_eq!(scale.classify(100.0).label(), "Extreme Risk");
    }

    #[test]
    fn six_tier_threshold_starts_next_bucket() {
        let scale = RiskScale::SixTier;
        let expected = [
            (20.0, "Low-Moderate Risk"),
            (35.0, "Moderate Risk"),
            (50.0, "Elevated Risk"),
            (65.0, "High Risk"),
            (80.0, "Extreme Risk"),
        ];
        for (score, label) in expected {
            assert_eq!(scale.classify(score).label(), label, "score {}", score);
        }
        assert_eq!(scale.classify(19.999).label(), "Minimal Risk");
    }

    #[test]
    fn four_band_threshold_closes_lower_bucket() {
        let scale = RiskScale::FourBand;
        assert_eq!(scale.classify(30.0).label(), "Low");
        assert_eq!(scale.classify(30.01).label(), "Medium");
        assert_eq!(scale.classify(50.0).label(), "Medium");
        assert_eq!(scale.classify(70.0).label(), "High");
        assert_eq!(scale.classify(70.5).label(), "Critical");
    }

    #[test]
    fn ranks_are_ordered() {
        let scale = RiskScale::SixTier;
        assert!(scale.classify(10.0).rank() < scale.classify(90.0).rank());
        assert_eq!(scale.classify(90.0).rank(), scale.labels().len() - 1);
    }

    #[test]
    fn scale_parses_from_config_strings() {
        assert_eq!("six-tier".parse::<RiskScale>().unwrap(), RiskScale::SixTier);
        assert_eq!("FOUR_BAND".parse::<RiskScale>().unwrap(), RiskScale::FourBand);
        assert!("quintile".parse::<RiskScale>().is_err());
    }

    #[test]
    fn level_serializes_as_label() {
        let level = RiskScale::SixTier.classify(36.75);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"Moderate Risk\"");
    }
}
