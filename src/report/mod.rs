use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

pub mod latex;
pub mod market_report;
pub mod benchmark;
pub mod robustness;
pub mod validation;
pub mod chart;

pub use market_report::MarketReport;
pub use benchmark::BenchmarkReport;
pub use robustness::RobustnessReport;
pub use validation::ValidationReport;
pub use chart::ComparisonFixture;

const RULE_WIDTH: usize = 70;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Section header used in the printed summaries.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title}\n{rule}")
}

/// Serialize `(key, value)` rows as a JSON object, keeping row order.
pub fn ordered_map<S, K, V>(rows: &[(K, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    K: Serialize,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(rows.len()))?;
    for (key, value) in rows {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Percent change of `value` relative to `base`.
pub fn relative_change(value: f64, base: f64) -> f64 {
    (value - base) / base * 100.0
}
