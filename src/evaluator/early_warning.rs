use serde::Serialize;
use std::fmt;

use super::risk_analyzer::{bucket, Boundary};

pub const WARNING_THRESHOLD: f64 = 0.7;
pub const DANGER_THRESHOLD: f64 = 0.9;

const WARNING_SHARE_WEIGHT: f64 = 0.4;
const DANGER_SHARE_WEIGHT: f64 = 0.6;
const LEVEL_THRESHOLDS: [f64; 3] = [0.3, 0.6, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningLevel {
    Normal,
    Watch,
    Warning,
    Alert,
}

impl WarningLevel {
    fn from_index(index: f64) -> Self {
        match bucket(index, &LEVEL_THRESHOLDS, Boundary::ClosesLowerBucket) {
            0 => Self::Normal,
            1 => Self::Watch,
            2 => Self::Warning,
            _ => Self::Alert,
        }
    }
}

impl fmt::Display for WarningLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Counts of metric risks past the warning and danger lines, folded into one index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarlyWarning {
    pub monitored: usize,
    pub warnings: usize,
    pub dangers: usize,
    pub index: f64,
    pub level: WarningLevel,
}

impl EarlyWarning {
    pub fn from_risks(risks: &[f64]) -> Self {
        Self::with_thresholds(risks, WARNING_THRESHOLD, DANGER_THRESHOLD)
    }

    pub fn with_thresholds(risks: &[f64], warning: f64, danger: f64) -> Self {
        let monitored = risks.len();
        let warnings = risks.iter().filter(|&&r| r > warning).count();
        let dangers = risks.iter().filter(|&&r| r > danger).count();

        let index = if monitored == 0 {
            0.0
        } else {
            let n = monitored as f64;
            warnings as f64 / n * WARNING_SHARE_WEIGHT + dangers as f64 / n * DANGER_SHARE_WEIGHT
        };

        Self {
            monitored,
            warnings,
            dangers,
            index,
            level: WarningLevel::from_index(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strict() {
        let signal = EarlyWarning::from_risks(&[0.7, 0.71, 0.9, 0.95]);
        assert_eq!(signal.warnings, 3);
        assert_eq!(signal.dangers, 1);
    }

    #[test]
    fn index_mixes_warning_and_danger_shares() {
        let signal = EarlyWarning::from_risks(&[0.95, 0.95, 0.1, 0.1]);
        // 2/4 warnings * 0.4 + 2/4 dangers * 0.6
        assert!((signal.index - 0.5).abs() < 1e-12);
        assert_eq!(signal.level, WarningLevel::Watch);
    }

    #[test]
    fn level_bands_include_upper_bound() {
        assert_eq!(WarningLevel::from_index(0.3), WarningLevel::Normal);
        assert_eq!(WarningLevel::from_index(0.6), WarningLevel::Watch);
        assert_eq!(WarningLevel::from_index(0.8), WarningLevel::Warning);
        assert_eq!(WarningLevel::from_index(0.81), WarningLevel::Alert);
    }

    #[test]
    fn all_in_danger_is_alert() {
        let signal = EarlyWarning::from_risks(&[1.0; 6]);
        assert!((signal.index - 1.0).abs() < 1e-12);
        assert_eq!(signal.level, WarningLevel::Alert);
    }

    #[test]
    fn no_metrics_is_normal() {
        let signal = EarlyWarning::from_risks(&[]);
        assert_eq!(signal.index, 0.0);
        assert_eq!(signal.level, WarningLevel::Normal);
    }
}
