use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BubbleError, Result};

/// How a raw metric value is turned into a risk in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormalizationRule {
    /// Linear position inside a fixed historical range, clamped.
    Range {
        min: f64,
        max: f64,
        #[serde(default)]
        invert: bool,
    },
    /// Distance from a target, expressed in multiples of `tolerance` and scaled.
    TargetDeviation {
        target: f64,
        tolerance: f64,
        scale: f64,
    },
}

impl NormalizationRule {
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range { min, max, invert: false }
    }

    /// Low values are the risky end of the range.
    pub fn inverted(min: f64, max: f64) -> Self {
        Self::Range { min, max, invert: true }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Range { min, max, .. } => check_range(min, max),
            Self::TargetDeviation { target, tolerance, scale } => {
                if !target.is_finite() || !scale.is_finite() {
                    return Err(BubbleError::validation_error(
                        "target deviation parameters must be finite",
                    ));
                }
                if !(tolerance.is_finite() && tolerance > 0.0) {
                    return Err(BubbleError::validation_error(format!(
                        "target deviation tolerance must be positive, got {}",
                        tolerance
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn apply(&self, value: f64) -> Result<f64> {
        match *self {
            Self::Range { min, max, invert } => percentile_normalize(value, min, max, invert),
            Self::TargetDeviation { target, tolerance, scale } => {
                self.validate()?;
                check_value(value)?;
                Ok(((value - target).abs() / tolerance * scale).clamp(0.0, 1.0))
            }
        }
    }

    /// True when a fractional target (e.g. 0.02 for 2%) meets a value that
    /// reads like a percentage (e.g. 2.0). Range rules never report this.
    pub fn unit_mismatch(&self, value: f64) -> bool {
        match *self {
            Self::Range { .. } => false,
            Self::TargetDeviation { target, .. } => target.abs() < 1.0 && value.abs() >= 1.0,
        }
    }
}

impl fmt::Display for NormalizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { min, max, invert: false } => write!(f, "range {} to {}", min, max),
            Self::Range { min, max, invert: true } => {
                write!(f, "range {} to {}, inverted", min, max)
            }
            Self::TargetDeviation { target, tolerance, .. } => {
                write!(f, "target {} +/- {}", target, tolerance)
            }
        }
    }
}

/// Rescale `value` into [0, 1] against the historical `[hist_min, hist_max]` range.
///
/// Values outside the range are clamped. With `invert` the result is `1 - x`,
/// for metrics where a low reading is the risky one (dividend yield, GDP growth).
/// A zero-width or reversed range is rejected instead of dividing by zero.
pub fn percentile_normalize(value: f64, hist_min: f64, hist_max: f64, invert: bool) -> Result<f64> {
    check_range(hist_min, hist_max)?;
    check_value(value)?;

    let pct = ((value - hist_min) / (hist_max - hist_min)).clamp(0.0, 1.0);
    Ok(if invert { 1.0 - pct } else { pct })
}

fn check_range(min: f64, max: f64) -> Result<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(BubbleError::validation_error(format!(
            "historical range bounds must be finite, got [{}, {}]",
            min, max
        )));
    }
    if max <= min {
        return Err(BubbleError::validation_error(format!(
            "historical range must satisfy min < max, got [{}, {}]",
            min, max
        )));
    }
    Ok(())
}

fn check_value(value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(BubbleError::validation_error(format!("metric value is not finite: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_endpoints_map_to_zero_and_one() {
        assert_eq!(percentile_normalize(10.0, 10.0, 40.0, false).unwrap(), 0.0);
        assert_eq!(percentile_normalize(40.0, 10.0, 40.0, false).unwrap(), 1.0);
        assert_eq!(percentile_normalize(-0.30, -0.30, 0.60, false).unwrap(), 0.0);
    }

    #[test]
    fn values_outside_range_are_clamped() {
        assert_eq!(percentile_normalize(55.0, 10.0, 40.0, false).unwrap(), 1.0);
        assert_eq!(percentile_normalize(-3.0, 10.0, 40.0, false).unwrap(), 0.0);
        assert_eq!(percentile_normalize(-3.0, 10.0, 40.0, true).unwrap(), 1.0);
    }

    #[test]
    fn invert_is_complement() {
        for value in [0.01, 0.015, 0.028, 0.04, 0.09] {
            let plain = percentile_normalize(value, 0.015, 0.040, false).unwrap();
            let inverted = percentile_normalize(value, 0.015, 0.040, true).unwrap();
            assert!((inverted - (1.0 - plain)).abs() < 1e-12);
        }
    }

    #[test]
    fn midpoint_is_linear() {
        let pe = percentile_normalize(15.5, 10.0, 40.0, false).unwrap();
        assert!((pe - 5.5 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        assert!(matches!(
            percentile_normalize(1.0, 5.0, 5.0, false),
            Err(BubbleError::Validation(_))
        ));
        assert!(percentile_normalize(1.0, 5.0, 2.0, false).is_err());
        assert!(percentile_normalize(1.0, f64::NAN, 2.0, false).is_err());
        assert!(percentile_normalize(f64::NAN, 0.0, 2.0, false).is_err());
    }

    #[test]
    fn target_deviation_scales_distance_from_target() {
        let rule = NormalizationRule::TargetDeviation { target: 0.02, tolerance: 0.05, scale: 0.7 };
        let risk = rule.apply(0.0).unwrap();
        assert!((risk - 0.28).abs() < 1e-12);

        // far from target saturates at 1
        assert_eq!(rule.apply(5.0).unwrap(), 1.0);
    }

    #[test]
    fn percent_value_against_fractional_target_is_flagged() {
        let rule = NormalizationRule::TargetDeviation { target: 0.02, tolerance: 0.05, scale: 0.7 };
        assert!(rule.unit_mismatch(2.0));
        assert!(rule.unit_mismatch(-1.5));
        assert!(!rule.unit_mismatch(0.0));
        assert!(!rule.unit_mismatch(0.025));

        let percent_rule = NormalizationRule::TargetDeviation { target: 2.0, tolerance: 5.0, scale: 0.7 };
        assert!(!percent_rule.unit_mismatch(2.5));
        assert!(!NormalizationRule::range(0.0, 0.1).unit_mismatch(50.0));
    }

    #[test]
    fn rule_round_trips_through_json_tag() {
        let json = r#"{"kind":"range","min":1.0,"max":5.0}"#;
        let rule: NormalizationRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule, NormalizationRule::range(1.0, 5.0));
    }
}
