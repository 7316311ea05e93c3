use std::fs;

use bubbleseer::evaluator::{BubbleScorer, RiskScale, Weights};
use bubbleseer::market::presets;
use bubbleseer::output::{Artifact, ArtifactSink, FileSink};
use bubbleseer::report::{BenchmarkReport, ComparisonFixture, MarketReport, RobustnessReport, ValidationReport};

fn china_report() -> MarketReport {
    let snapshot = presets::china_oct_2025();
    let card = BubbleScorer::new(RiskScale::SixTier)
        .score(&snapshot, &presets::china_metric_table(), &Weights::standard())
        .unwrap();
    MarketReport::new(snapshot, presets::usa_reference(), card)
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn every_report_lands_in_the_output_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = FileSink::new(tmp.path().join("out"));

    let market = china_report();
    let benchmark = BenchmarkReport::fixture();
    let robustness = RobustnessReport::build(RiskScale::SixTier).unwrap();
    let validation = ValidationReport::fixture();
    let fixture = ComparisonFixture::china_vs_usa();
    let svg = fixture
        .render_svg(market.card().composite, 42.0, RiskScale::SixTier)
        .unwrap();

    let artifacts = vec![
        Artifact::json(market.artifact_name(), &market.results()).unwrap(),
        Artifact::json(benchmark.artifact_name(), &benchmark).unwrap(),
        Artifact::json(robustness.artifact_name(), &robustness).unwrap(),
        Artifact::json(validation.artifact_name(), &validation).unwrap(),
        Artifact::svg(fixture.artifact_name(), svg),
    ];
    for artifact in &artifacts {
        sink.publish(artifact).await.unwrap();
    }

    let dir = sink.dir();
    let market_json = read_json(&dir.join("china_bubble_oct2025_results.json"));
    assert_eq!(market_json["bubble_analysis"]["composite_bubble_score"], 50.3);
    assert_eq!(market_json["comparison_usa"]["China_Advantage"], -8.3);

    let benchmark_json = read_json(&dir.join("benchmark_comparison_results.json"));
    assert_eq!(benchmark_json["performance_summary"]["DBN-FBD (Ours)"]["accuracy"], 100.0);

    let robustness_json = read_json(&dir.join("robustness_checks_results.json"));
    assert_eq!(robustness_json["summary"]["range"], 4.01);

    let validation_json = read_json(&dir.join("statistical_validation_results.json"));
    assert_eq!(validation_json["provenance"], "illustrative");
    assert_eq!(validation_json["out_of_sample"]["summary"]["dbn_mae"], 1.95);

    let svg = fs::read_to_string(dir.join("china_vs_usa_final_analysis.svg")).unwrap();
    assert!(svg.contains("<svg"));
}

#[tokio::test]
async fn rerun_overwrites_previous_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let sink = FileSink::new(tmp.path());

    let first = Artifact::json("run", &serde_json::json!({"n": 1})).unwrap();
    let second = Artifact::json("run", &serde_json::json!({"n": 2})).unwrap();
    sink.publish(&first).await.unwrap();
    let path = sink.publish(&second).await.unwrap().unwrap();

    assert_eq!(read_json(&path)["n"], 2);
}
