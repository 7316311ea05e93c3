//! Nine-panel comparison dashboard rendered to SVG.
//!
//! Panel values are illustrative fixture data. Only the headline scores and
//! their labels come from the scorer.

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;
use serde::Serialize;
use std::f64::consts::TAU;
use std::fmt::Display;
use tracing::debug;

use crate::error::{BubbleError, Result};
use crate::evaluator::RiskScale;

const WIDTH: u32 = 1800;
const HEIGHT: u32 = 1700;
const FOOTER_HEIGHT: u32 = 60;
/// Share of one category slot covered by its bars.
const GROUP_WIDTH: f64 = 0.7;
const CIRCLE_STEPS: usize = 120;
const THESIS_LINE_HEIGHT: i32 = 22;

const SERIES_COLORS: [RGBColor; 3] = [
    RGBColor(0xe7, 0x4c, 0x3c),
    RGBColor(0x34, 0x98, 0xdb),
    RGBColor(0x27, 0xae, 0x60),
];
const ANNOTATION: RGBColor = RGBColor(0x27, 0xae, 0x60);
const THESIS_BACKGROUND: RGBColor = RGBColor(0xff, 0xfd, 0xe7);
const FOOTER_BACKGROUND: RGBColor = RGBColor(0xd5, 0xf5, 0xe3);

const CYCLE_PHASES: [(&str, (f64, f64)); 4] = [
    ("PEAK", (0.0, 1.5)),
    ("EXPANSION", (1.3, 0.0)),
    ("TROUGH", (0.0, -1.5)),
    ("CONTRACTION", (-1.3, 0.0)),
];

fn render<E: Display>(err: E) -> BubbleError {
    BubbleError::render_error(err.to_string())
}

fn series_color(index: usize) -> RGBColor {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

fn centered(size: u32) -> TextStyle<'static> {
    ("sans-serif", size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center))
}

/// One named row of bar heights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

impl BarSeries {
    pub fn new(name: impl Into<String>, values: &[f64]) -> Self {
        Self {
            name: name.into(),
            values: values.to_vec(),
        }
    }
}

/// Grouped bars over a set of labels, plus optional panel marks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGroup {
    pub title: &'static str,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub labels: Vec<&'static str>,
    pub series: Vec<BarSeries>,
    /// Shaded horizontal band `(low, high, caption)`.
    pub band: Option<(f64, f64, &'static str)>,
    pub reference_line: Option<(f64, &'static str)>,
    /// Print each bar's value above it.
    pub value_labels: bool,
    /// One line of text per label, drawn along the bottom of the panel.
    pub footnotes: Vec<String>,
}

impl BarGroup {
    fn new(
        title: &'static str,
        x_desc: &'static str,
        y_desc: &'static str,
        labels: &[&'static str],
        series: Vec<BarSeries>,
    ) -> Self {
        Self {
            title,
            x_desc,
            y_desc,
            labels: labels.to_vec(),
            series,
            band: None,
            reference_line: None,
            value_labels: false,
            footnotes: Vec::new(),
        }
    }

    fn with_band(mut self, low: f64, high: f64, caption: &'static str) -> Self {
        self.band = Some((low, high, caption));
        self
    }

    fn with_reference_line(mut self, level: f64, name: &'static str) -> Self {
        self.reference_line = Some((level, name));
        self
    }

    fn with_value_labels(mut self) -> Self {
        self.value_labels = true;
        self
    }

    fn with_footnotes(mut self, footnotes: Vec<String>) -> Self {
        self.footnotes = footnotes;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.labels.is_empty() || self.series.is_empty() {
            return Err(BubbleError::render_error(format!("panel '{}' has no bars", self.title)));
        }
        for series in &self.series {
            if series.values.len() != self.labels.len() {
                return Err(BubbleError::render_error(format!(
                    "panel '{}' has {} labels but {} values for {}",
                    self.title,
                    self.labels.len(),
                    series.values.len(),
                    series.name
                )));
            }
        }
        if !self.footnotes.is_empty() && self.footnotes.len() != self.labels.len() {
            return Err(BubbleError::render_error(format!(
                "panel '{}' has {} footnotes for {} labels",
                self.title,
                self.footnotes.len(),
                self.labels.len()
            )));
        }
        if let Some((low, high, _)) = self.band {
            if !(low < high) {
                return Err(BubbleError::render_error(format!(
                    "panel '{}' band must satisfy low < high, got [{}, {}]",
                    self.title, low, high
                )));
            }
        }
        Ok(())
    }

    /// Tallest bar in each label's group.
    fn group_tops(&self) -> Vec<f64> {
        (0..self.labels.len())
            .map(|i| self.series.iter().map(|s| s.values[i]).fold(f64::MIN, f64::max))
            .collect()
    }

    /// Value axis with headroom for annotations; always includes zero and the band.
    fn y_range(&self) -> (f64, f64) {
        let values = self.series.iter().flat_map(|s| s.values.iter().copied());
        let (lo, hi) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let hi = self.band.map_or(hi, |(_, high, _)| hi.max(high));
        let lo = if lo < 0.0 { lo * 1.3 } else { 0.0 };
        (lo, (hi * 1.25).max(1.0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: &'static str,
    pub risk: f64,
    pub expected_return: f64,
}

/// Where a market sits on the unit business-cycle circle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CyclePosition {
    pub code: &'static str,
    pub x: f64,
    pub y: f64,
    pub note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThesisSection {
    pub heading: String,
    pub lines: Vec<String>,
}

/// Data behind the comparison dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonFixture {
    pub primary_market: String,
    pub secondary_market: String,
    pub contributions: BarGroup,
    pub valuation: BarGroup,
    pub growth: BarGroup,
    pub risk_return: Vec<ScatterPoint>,
    pub frontier: [(f64, f64); 2],
    pub quadrant_labels: Vec<(&'static str, (f64, f64))>,
    pub sectors: BarGroup,
    pub cycle: Vec<CyclePosition>,
    pub technicals: BarGroup,
    pub scenarios: BarGroup,
    pub thesis: Vec<ThesisSection>,
    pub conclusion: String,
}

impl ComparisonFixture {
    pub fn china_vs_usa() -> Self {
        let (primary, secondary) = ("China", "USA");
        let pair = |a: &[f64], b: &[f64]| vec![BarSeries::new(primary, a), BarSeries::new(secondary, b)];
        let point = |name, risk, expected_return| ScatterPoint {
            name,
            risk,
            expected_return,
        };

        let valuation = BarGroup::new(
            "Valuation Multiples",
            "Valuation Metrics",
            "Multiple",
            &["P/E", "P/B", "CAPE", "EV/EBITDA", "P/S"],
            pair(&[15.5, 1.6, 14.2, 9.8, 1.2], &[22.0, 4.8, 31.2, 15.2, 2.8]),
        );
        let growth = BarGroup::new(
            "Growth & Returns",
            "Growth Metrics",
            "Growth Rate (%)",
            &["GDP Growth", "EPS Growth", "1Y Return", "Target 2-3Y"],
            pair(&[4.5, 12.0, 37.0, 35.0], &[2.5, 8.0, 22.0, 12.0]),
        )
        .with_value_labels();
        let scenario_probabilities = [0.30, 0.60, 0.10];

        let mut fixture = Self {
            primary_market: primary.to_string(),
            secondary_market: secondary.to_string(),
            contributions: BarGroup::new(
                "Bubble Score Breakdown",
                "Risk Components",
                "Contribution to Bubble Score (%)",
                &["Valuation", "Momentum", "Credit", "Economy", "Sentiment", "Technical"],
                pair(&[8.75, 12.0, 6.0, 3.0, 3.5, 2.5], &[16.25, 9.0, 7.0, 6.0, 5.5, 4.5]),
            )
            .with_band(10.0, 15.0, "HIGH RISK ZONE"),
            valuation,
            growth,
            risk_return: vec![
                point("China Stocks", 28.0, 12.0),
                point("USA Stocks", 16.0, 5.0),
                point("China Tech", 35.0, 18.0),
                point("USA Tech", 22.0, 8.0),
                point("EM", 24.0, 10.0),
                point("Europe", 18.0, 4.0),
                point("Japan", 20.0, 6.0),
                point("Gold", 12.0, 3.0),
            ],
            frontier: [(10.0, 2.0), (35.0, 18.0)],
            quadrant_labels: vec![("BEST", (10.0, 15.0)), ("WORST", (30.0, 2.0))],
            sectors: BarGroup::new(
                "Sector Opportunities",
                "Sectors",
                "P/E Ratio / Growth Premium",
                &["Tech", "Finance", "Consumer", "EV/Clean", "Healthcare"],
                vec![
                    BarSeries::new("China P/E", &[22.0, 6.0, 18.0, 25.0, 20.0]),
                    BarSeries::new("USA P/E", &[28.0, 13.0, 22.0, 35.0, 24.0]),
                    BarSeries::new("China Growth Premium", &[10.0, 3.0, 8.0, 15.0, 12.0]),
                ],
            ),
            cycle: vec![
                CyclePosition {
                    code: "USA",
                    x: 0.0,
                    y: 0.9,
                    note: "Late Cycle (10+ years)",
                },
                CyclePosition {
                    code: "CHN",
                    x: -0.7,
                    y: -0.5,
                    note: "Early Recovery (Post-crash)",
                },
            ],
            technicals: BarGroup::new(
                "Technical Indicators",
                "Technical Indicators",
                "Value (%)",
                &["RSI", "Above 200MA", "Bullish %", "New Highs"],
                pair(&[68.0, 75.0, 82.0, 45.0], &[72.0, 88.0, 78.0, 92.0]),
            )
            .with_reference_line(70.0, "Overbought"),
            scenarios: BarGroup::new(
                "3-Year Scenarios",
                "Scenarios",
                "Expected Return (%)",
                &["Pessimistic", "Base Case", "Optimistic"],
                pair(&[-20.0, 35.0, 60.0], &[-15.0, 12.0, 25.0]),
            )
            .with_reference_line(0.0, "Break-even")
            .with_footnotes(
                scenario_probabilities
                    .iter()
                    .map(|p| format!("p = {:.0}%", p * 100.0))
                    .collect(),
            ),
            thesis: Vec::new(),
            conclusion: "Key Conclusion: China offers superior risk-adjusted returns with a deep valuation \
                         discount, higher growth, and early cycle positioning vs an expensive, late-cycle US market"
                .to_string(),
        };
        fixture.thesis = fixture.derive_thesis();
        fixture
    }

    /// Summary text; the discount, growth and target figures are read off the bar panels.
    fn derive_thesis(&self) -> Vec<ThesisSection> {
        let (primary, secondary) = (self.primary_market.as_str(), self.secondary_market.as_str());
        let discounts = self.valuation_discounts();
        let average_discount = discounts.iter().sum::<f64>() / discounts.len().max(1) as f64;
        let pick = |group: &BarGroup, series: usize, index: usize| {
            group
                .series
                .get(series)
                .and_then(|s| s.values.get(index))
                .copied()
                .unwrap_or_default()
        };
        let section = |heading: String, lines: &[String]| ThesisSection {
            heading,
            lines: lines.to_vec(),
        };

        vec![
            section(
                format!("{} ADVANTAGES:", primary.to_uppercase()),
                &[
                    format!("{:.0}% average valuation discount", average_discount),
                    format!(
                        "Higher GDP growth ({}% vs {}%)",
                        pick(&self.growth, 0, 0),
                        pick(&self.growth, 1, 0)
                    ),
                    "Early in recovery cycle".to_string(),
                    "Massive stimulus starting".to_string(),
                    "Underowned by global funds".to_string(),
                ],
            ),
            section(
                format!("{} RISKS:", secondary.to_uppercase()),
                &[
                    format!("Expensive valuations (P/E {})", pick(&self.valuation, 1, 0)),
                    "Late cycle (10+ years)".to_string(),
                    format!("Limited upside ({}% target)", pick(&self.growth, 1, 3)),
                    "Crowded positioning".to_string(),
                    "Rising recession risk".to_string(),
                ],
            ),
            section(
                "RECOMMENDATION:".to_string(),
                &[
                    format!("Overweight {} (20-25%)", primary),
                    format!("Neutral {} (45-50%)", secondary),
                    format!(
                        "Target: {} {:+}% vs {} {:+}% (2-3 year horizon)",
                        primary,
                        pick(&self.growth, 0, 3),
                        secondary,
                        pick(&self.growth, 1, 3)
                    ),
                ],
            ),
        ]
    }

    pub fn artifact_name(&self) -> String {
        format!(
            "{}_vs_{}_final_analysis",
            self.primary_market.to_lowercase(),
            self.secondary_market.to_lowercase()
        )
    }

    pub fn validate(&self) -> Result<()> {
        for group in self.bar_groups() {
            group.validate()?;
        }
        if self.valuation.series.len() < 2 {
            return Err(BubbleError::render_error("valuation panel needs both markets"));
        }
        if self.risk_return.is_empty() {
            return Err(BubbleError::render_error("risk/return panel has no points"));
        }
        if self.cycle.is_empty() {
            return Err(BubbleError::render_error("market cycle panel has no positions"));
        }
        if self.thesis.is_empty() {
            return Err(BubbleError::render_error("thesis panel has no sections"));
        }
        Ok(())
    }

    fn bar_groups(&self) -> [&BarGroup; 6] {
        [
            &self.contributions,
            &self.valuation,
            &self.growth,
            &self.sectors,
            &self.technicals,
            &self.scenarios,
        ]
    }

    /// Percent by which the primary market's multiple sits below the secondary's.
    pub fn valuation_discounts(&self) -> Vec<f64> {
        match self.valuation.series.as_slice() {
            [primary, secondary, ..] => primary
                .values
                .iter()
                .zip(&secondary.values)
                .map(|(p, s)| if *s != 0.0 { (s - p) / s * 100.0 } else { 0.0 })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Signed relative difference printed over each valuation group.
    pub fn discount_labels(&self) -> Vec<String> {
        self.valuation_discounts().iter().map(|d| discount_label(*d)).collect()
    }

    /// Dashboard headline; both labels come from the same scale.
    pub fn title(&self, primary_score: f64, secondary_score: f64, scale: RiskScale) -> String {
        format!(
            "{} vs {}: Bubble Score {:.1}% ({}) | {:.1}% ({})",
            self.primary_market.to_uppercase(),
            self.secondary_market.to_uppercase(),
            primary_score,
            scale.classify(primary_score),
            secondary_score,
            scale.classify(secondary_score)
        )
    }

    pub fn render_svg(&self, primary_score: f64, secondary_score: f64, scale: RiskScale) -> Result<String> {
        self.validate()?;
        let title = self.title(primary_score, secondary_score, scale);
        debug!("rendering dashboard: {}", title);

        let discounts = self.discount_labels();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
            root.fill(&WHITE).map_err(render)?;
            let root = root.titled(&title, ("sans-serif", 26)).map_err(render)?;
            let body_height = root.dim_in_pixel().1.saturating_sub(FOOTER_HEIGHT);
            let (body, footer) = root.split_vertically(body_height);
            let panels = body.split_evenly((3, 3));

            draw_bars(&panels[0], &self.contributions, &[])?;
            draw_bars(&panels[1], &self.valuation, &discounts)?;
            draw_bars(&panels[2], &self.growth, &[])?;
            draw_scatter(&panels[3], &self.risk_return, self.frontier, &self.quadrant_labels)?;
            draw_bars(&panels[4], &self.sectors, &[])?;
            draw_cycle(&panels[5], &self.cycle)?;
            draw_bars(&panels[6], &self.technicals, &[])?;
            draw_bars(&panels[7], &self.scenarios, &[])?;
            draw_thesis(&panels[8], &self.thesis)?;

            footer.fill(&FOOTER_BACKGROUND).map_err(render)?;
            footer
                .draw_text(
                    &self.conclusion,
                    &("sans-serif", 17).into_font().color(&BLACK),
                    (20, (FOOTER_HEIGHT / 2) as i32 - 8),
                )
                .map_err(render)?;

            root.present().map_err(render)?;
        }
        Ok(svg)
    }
}

/// `-30%` when the primary market is cheaper, `+36%` when it is dearer.
fn discount_label(discount: f64) -> String {
    format!("{:+.0}%", -discount + 0.0)
}

/// Blank unless `x` sits on a bar group's center.
fn tick_label(labels: &[&str], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).map(|l| l.to_string()).unwrap_or_default()
}

/// Left edge of bar `series` out of `count` in the group centered on `index`.
fn bar_left(index: usize, series: usize, count: usize) -> f64 {
    index as f64 - GROUP_WIDTH / 2.0 + series as f64 * GROUP_WIDTH / count as f64
}

fn draw_bars(area: &DrawingArea<SVGBackend<'_>, Shift>, group: &BarGroup, annotations: &[String]) -> Result<()> {
    let n = group.labels.len();
    let x_max = n as f64 - 0.5;
    let (y_min, y_max) = group.y_range();
    let offset = (y_max - y_min) * 0.04;
    let count = group.series.len();
    let bar_width = GROUP_WIDTH / count as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(group.title, ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)
        .map_err(render)?;

    let labels = &group.labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|x: &f64| tick_label(labels, *x))
        .x_desc(group.x_desc)
        .y_desc(group.y_desc)
        .draw()
        .map_err(render)?;

    if let Some((low, high, caption)) = group.band {
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(-0.5, low), (x_max, high)],
                RED.mix(0.1).filled(),
            )))
            .map_err(render)?;
        chart
            .draw_series(std::iter::once(Text::new(
                caption,
                (-0.4, high - offset * 0.5),
                ("sans-serif", 13).into_font().color(&RED),
            )))
            .map_err(render)?;
    }

    for (j, series) in group.series.iter().enumerate() {
        let color = series_color(j);
        chart
            .draw_series(series.values.iter().enumerate().map(|(i, v)| {
                let x = bar_left(i, j, count);
                Rectangle::new([(x, 0.0), (x + bar_width, *v)], color.mix(0.8).filled())
            }))
            .map_err(render)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        if group.value_labels {
            chart
                .draw_series(series.values.iter().enumerate().map(|(i, v)| {
                    Text::new(
                        format!("{}%", v),
                        (bar_left(i, j, count) + bar_width * 0.1, v.max(0.0) + offset),
                        ("sans-serif", 12),
                    )
                }))
                .map_err(render)?;
        }
    }

    if let Some((level, name)) = group.reference_line {
        chart
            .draw_series(LineSeries::new(vec![(-0.5, level), (x_max, level)], RED.mix(0.5)))
            .map_err(render)?
            .label(name)
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.mix(0.5)));
    }

    if !annotations.is_empty() {
        let tops = group.group_tops();
        chart
            .draw_series(annotations.iter().zip(tops).enumerate().map(|(i, (text, top))| {
                Text::new(
                    text.clone(),
                    (i as f64 - 0.15, top.max(0.0) + offset),
                    ("sans-serif", 13).into_font().color(&ANNOTATION),
                )
            }))
            .map_err(render)?;
    }

    if !group.footnotes.is_empty() {
        chart
            .draw_series(group.footnotes.iter().enumerate().map(|(i, text)| {
                Text::new(text.clone(), (i as f64 - 0.2, y_min + offset), ("sans-serif", 13))
            }))
            .map_err(render)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render)?;
    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    points: &[ScatterPoint],
    frontier: [(f64, f64); 2],
    quadrant_labels: &[(&'static str, (f64, f64))],
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Risk-Reward", ("sans-serif", 18))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(5f64..40f64, 0f64..20f64)
        .map_err(render)?;
    chart
        .configure_mesh()
        .x_desc("Risk (Volatility %)")
        .y_desc("Expected Return (%)")
        .draw()
        .map_err(render)?;

    chart
        .draw_series(quadrant_labels.iter().map(|(text, at)| {
            Text::new(*text, *at, ("sans-serif", 22).into_font().color(&BLACK.mix(0.3)))
        }))
        .map_err(render)?;

    chart
        .draw_series(LineSeries::new(frontier.to_vec(), BLACK.mix(0.3)))
        .map_err(render)?
        .label("Efficient Frontier")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.3)));

    for (i, point) in points.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.8);
        let at = (point.risk, point.expected_return);
        chart
            .draw_series(std::iter::once(Circle::new(at, 8, color.filled())))
            .map_err(render)?;
        chart
            .draw_series(std::iter::once(Text::new(
                point.name,
                (point.risk + 0.6, point.expected_return + 0.4),
                ("sans-serif", 12),
            )))
            .map_err(render)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render)?;
    Ok(())
}

fn draw_cycle(area: &DrawingArea<SVGBackend<'_>, Shift>, positions: &[CyclePosition]) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Market Cycle Position", ("sans-serif", 18))
        .margin(12)
        .build_cartesian_2d(-2f64..2f64, -2f64..2f64)
        .map_err(render)?;

    let ring = (0..=CIRCLE_STEPS).map(|step| {
        let t = step as f64 / CIRCLE_STEPS as f64 * TAU;
        (t.cos(), t.sin())
    });
    chart
        .draw_series(LineSeries::new(ring, BLACK.mix(0.4)))
        .map_err(render)?;
    chart
        .draw_series(CYCLE_PHASES.iter().map(|(name, at)| Text::new(*name, *at, centered(14))))
        .map_err(render)?;

    for (i, position) in positions.iter().enumerate() {
        let at = (position.x, position.y);
        chart
            .draw_series(std::iter::once(Circle::new(at, 20, series_color(i).mix(0.8).filled())))
            .map_err(render)?;
        chart
            .draw_series([
                Text::new(position.code, at, centered(13)),
                Text::new(position.note, (position.x, position.y - 0.35), centered(12)),
            ])
            .map_err(render)?;
    }
    Ok(())
}

fn draw_thesis(area: &DrawingArea<SVGBackend<'_>, Shift>, sections: &[ThesisSection]) -> Result<()> {
    area.fill(&THESIS_BACKGROUND).map_err(render)?;

    let heading = ("sans-serif", 16, FontStyle::Bold).into_font().color(&BLACK);
    let body = ("sans-serif", 14).into_font().color(&BLACK);
    let mut y = 16;
    area.draw_text("INVESTMENT THESIS SUMMARY", &heading, (20, y))
        .map_err(render)?;
    for section in sections {
        y += THESIS_LINE_HEIGHT * 3 / 2;
        area.draw_text(&section.heading, &heading, (20, y)).map_err(render)?;
        for line in &section.lines {
            y += THESIS_LINE_HEIGHT;
            area.draw_text(&format!("- {}", line), &body, (36, y))
                .map_err(render)?;
        }
    }
    Ok(())
}
