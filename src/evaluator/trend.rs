use serde::Serialize;

use crate::error::{BubbleError, Result};

const MIN_EXP_SCORE: f64 = 2.0;
const MIN_R_SQUARED: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthCheck {
    /// Per-period slope of `ln(price)`.
    pub slope: f64,
    pub r_squared: f64,
    /// `slope * r² * 100`: steep and well-fitted log growth scores high.
    pub exp_score: f64,
    pub is_exponential: bool,
}

/// Fit `ln(price) = a + b * t` by least squares and flag exponential growth.
pub fn check_exponential_growth(prices: &[f64]) -> Result<GrowthCheck> {
    if prices.len() < 3 {
        return Err(BubbleError::validation_error(format!(
            "need at least 3 prices, got {}",
            prices.len()
        )));
    }
    if let Some(bad) = prices.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
        return Err(BubbleError::validation_error(format!(
            "prices must be positive and finite, got {}",
            bad
        )));
    }

    let n = prices.len() as f64;
    let logs: Vec<f64> = prices.iter().map(|p| p.ln()).collect();
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = logs.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for (i, y) in logs.iter().enumerate() {
        let dx = i as f64 - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    // a flat series has no variance to explain
    let r_squared = if syy > 0.0 { sxy * sxy / (sxx * syy) } else { 0.0 };
    let exp_score = slope * r_squared * 100.0;

    Ok(GrowthCheck {
        slope,
        r_squared,
        exp_score,
        is_exponential: exp_score > MIN_EXP_SCORE && r_squared > MIN_R_SQUARED,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compounding_series_is_exponential() {
        let prices: Vec<f64> = (0..24).map(|i| 100.0 * 1.05f64.powi(i)).collect();
        let check = check_exponential_growth(&prices).unwrap();
        assert!((check.slope - 1.05f64.ln()).abs() < 1e-9);
        assert!((check.r_squared - 1.0).abs() < 1e-9);
        assert!(check.is_exponential);
    }

    #[test]
    fn slow_linear_series_is_not() {
        let prices: Vec<f64> = (0..24).map(|i| 100.0 + i as f64).collect();
        let check = check_exponential_growth(&prices).unwrap();
        assert!(check.exp_score < MIN_EXP_SCORE);
        assert!(!check.is_exponential);
    }

    #[test]
    fn flat_series_has_zero_fit() {
        let check = check_exponential_growth(&[1.0, 1.0, 1.0, 1.0]).unwrap();
        assert_eq!(check.slope, 0.0);
        assert_eq!(check.r_squared, 0.0);
        assert!(!check.is_exponential);
    }

    #[test]
    fn rejects_short_or_non_positive_series() {
        assert!(check_exponential_growth(&[1.0, 2.0]).is_err());
        assert!(check_exponential_growth(&[1.0, 0.0, 2.0]).is_err());
        assert!(check_exponential_growth(&[1.0, -3.0, 2.0]).is_err());
    }
}
