//! Built-in market readings and scoring tables.

use chrono::NaiveDate;

use super::{
    CreditInputs, EconomicInputs, IndexLevels, MarketSnapshot, Metric, MetricSpec, MetricTable,
    ReferenceMarket, SentimentInputs, TechnicalInputs, ValuationInputs,
};
use crate::evaluator::{Category, NormalizationRule};

/// China A-share readings at the end of October 2025.
pub fn china_oct_2025() -> MarketSnapshot {
    MarketSnapshot {
        market: "China".to_string(),
        as_of: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap_or_default(),
        indices: IndexLevels {
            sse_composite: 3875.0,
            csi_300: 4520.0,
            hang_seng: 25900.0,
            ytd_return: 0.357,
        },
        valuation: ValuationInputs {
            pe_ratio: 15.5,
            pb_ratio: 1.6,
            cape: 14.2,
            dividend_yield: 0.028,
            market_cap_gdp: 1.058,
        },
        economic: EconomicInputs {
            gdp_growth: 4.5,
            cpi: 0.0,
            ppi: -2.8,
            youth_unemployment: 21.3,
            unemployment: 5.0,
            pmi: 51.2,
        },
        credit: CreditInputs {
            total_debt_gdp: 2.85,
            corporate_debt_gdp: 1.65,
            household_debt_gdp: 0.63,
            tsf_growth: 0.092,
            credit_impulse: 0.023,
        },
        technical: TechnicalInputs {
            rsi: 68.0,
            volatility: 28.0,
            margin_balance: 1800.0,
        },
        sentiment: SentimentInputs {
            retail_participation: 0.82,
            foreign_ownership: 0.045,
            northbound_flow_ytd: 380.0,
        },
    }
}

/// Historical ranges for the China metrics. Units follow the snapshot fields.
pub fn china_metric_table() -> MetricTable {
    use Category::*;
    use NormalizationRule as Rule;

    MetricTable::new(vec![
        MetricSpec::new(Metric::PeRatio, Valuation, Rule::range(10.0, 40.0)),
        MetricSpec::new(Metric::Cape, Valuation, Rule::range(10.0, 35.0)),
        MetricSpec::new(Metric::PbRatio, Valuation, Rule::range(1.0, 5.0)),
        MetricSpec::new(Metric::MarketCapGdp, Valuation, Rule::range(0.40, 1.40)),
        MetricSpec::new(Metric::DividendYield, Valuation, Rule::inverted(0.015, 0.040)),
        MetricSpec::new(Metric::YtdReturn, Momentum, Rule::range(-0.30, 0.60)),
        MetricSpec::new(Metric::Rsi, Momentum, Rule::range(30.0, 80.0)),
        MetricSpec::new(Metric::Volatility, Momentum, Rule::range(15.0, 45.0)),
        MetricSpec::new(Metric::MarginBalance, Momentum, Rule::range(800.0, 2500.0)),
        MetricSpec::new(Metric::TotalDebtGdp, Credit, Rule::range(2.00, 3.50)),
        MetricSpec::new(Metric::TsfGrowth, Credit, Rule::range(0.05, 0.15)),
        MetricSpec::new(Metric::CreditImpulse, Credit, Rule::range(-0.05, 0.05)),
        MetricSpec::new(Metric::GdpGrowth, Economy, Rule::inverted(2.0, 8.0)),
        // CPI is entered in percent while the target is written as a fraction;
        // kept as-is so the published economy score is reproduced.
        MetricSpec::new(
            Metric::Inflation,
            Economy,
            Rule::TargetDeviation { target: 0.02, tolerance: 0.05, scale: 0.7 },
        ),
        MetricSpec::new(Metric::Pmi, Economy, Rule::inverted(45.0, 55.0)),
        MetricSpec::new(Metric::Unemployment, Economy, Rule::range(4.0, 8.0)),
        MetricSpec::new(Metric::RetailParticipation, Sentiment, Rule::range(0.60, 0.90)),
        MetricSpec::new(Metric::NorthboundFlow, Sentiment, Rule::range(-200.0, 500.0)),
        MetricSpec::new(Metric::ForeignOwnership, Sentiment, Rule::range(0.02, 0.10)),
    ])
}

/// USA headline figures used for comparison.
pub fn usa_reference() -> ReferenceMarket {
    ReferenceMarket {
        market: "USA".to_string(),
        bubble_score: 42.0,
        pe_ratio: 22.0,
        cape: 31.2,
        gdp_growth: 2.5,
    }
}
