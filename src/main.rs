use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use bubbleseer::config::{self, Config};
use bubbleseer::evaluator::{check_exponential_growth, BubbleScorer, RiskScale, Weights};
use bubbleseer::market::{presets, MarketSnapshot, MetricTable};
use bubbleseer::output::{Artifact, ArtifactSink, FileSink, StdoutSink};
use bubbleseer::report::{BenchmarkReport, ComparisonFixture, MarketReport, RobustnessReport, ValidationReport};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory artifacts are written to (overrides BUBBLE_OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print JSON to stdout instead of writing files
    #[arg(long, global = true)]
    stdout_only: bool,

    /// Risk scale used for labels: six-tier or four-band
    #[arg(long, global = true)]
    scale: Option<RiskScale>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a market snapshot and write the market report
    Score {
        /// Snapshot JSON file (defaults to the built-in China Oct 2025 preset).
        /// With the built-in metric table, economic.cpi is read against a
        /// fractional 2% target, so 2.0 means 200% and saturates the risk.
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Metric table JSON file (defaults to the built-in table)
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
    /// Render the China vs USA comparison dashboard
    Compare,
    /// Compare detection methods over historical episodes
    Benchmark,
    /// Re-score under alternative specifications
    Robustness,
    /// Print the statistical-validation tables
    Validation,
    /// Check a price series for exponential growth
    Growth {
        /// Comma-separated prices, oldest first
        #[arg(long, value_delimiter = ',', required = true)]
        prices: Vec<f64>,
    },
    /// Run every report
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_config()
        .await?
        .with_overrides(cli.output_dir.clone(), cli.scale, cli.stdout_only);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Starting BubbleSeer");
    info!(
        "Risk scale {}, output {}",
        config.risk_scale,
        if config.stdout_only {
            "stdout".to_string()
        } else {
            config.output_dir.display().to_string()
        }
    );

    let sink: Box<dyn ArtifactSink> = if config.stdout_only {
        Box::new(StdoutSink)
    } else {
        Box::new(FileSink::new(config.output_dir.clone()))
    };

    match cli.command {
        Some(Commands::Score { snapshot, metrics }) => {
            run_score(&config, sink.as_ref(), snapshot, metrics).await?;
        }
        Some(Commands::Compare) => run_compare(&config, sink.as_ref()).await?,
        Some(Commands::Benchmark) => run_benchmark(sink.as_ref()).await?,
        Some(Commands::Robustness) => run_robustness(&config, sink.as_ref()).await?,
        Some(Commands::Validation) => run_validation(sink.as_ref()).await?,
        Some(Commands::Growth { prices }) => run_growth(&prices)?,
        Some(Commands::All) => {
            run_score(&config, sink.as_ref(), None, None).await?;
            run_compare(&config, sink.as_ref()).await?;
            run_benchmark(sink.as_ref()).await?;
            run_robustness(&config, sink.as_ref()).await?;
            run_validation(sink.as_ref()).await?;
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

fn build_report(config: &Config, snapshot: MarketSnapshot, table: &MetricTable) -> Result<MarketReport> {
    let card = BubbleScorer::new(config.risk_scale)
        .score(&snapshot, table, &Weights::standard())
        .with_context(|| format!("scoring {}", snapshot.market))?;
    Ok(MarketReport::new(snapshot, presets::usa_reference(), card))
}

async fn run_score(
    config: &Config,
    sink: &dyn ArtifactSink,
    snapshot: Option<PathBuf>,
    metrics: Option<PathBuf>,
) -> Result<()> {
    let snapshot = match snapshot {
        Some(path) => MarketSnapshot::from_json_file(&path)?,
        None => presets::china_oct_2025(),
    };
    let table = match metrics {
        Some(path) => MetricTable::from_json_file(&path)?,
        None => presets::china_metric_table(),
    };

    let report = build_report(config, snapshot, &table)?;
    println!("{}", report.summary());

    let ew = report.early_warning();
    if ew.dangers > 0 {
        warn!("{} metrics past the danger threshold", ew.dangers);
    }

    sink.publish(&Artifact::json(report.artifact_name(), &report.results())?)
        .await?;
    Ok(())
}

async fn run_compare(config: &Config, sink: &dyn ArtifactSink) -> Result<()> {
    let report = build_report(config, presets::china_oct_2025(), &presets::china_metric_table())?;
    let reference = presets::usa_reference();
    let fixture = ComparisonFixture::china_vs_usa();

    let svg = fixture
        .render_svg(report.card().composite, reference.bubble_score, config.risk_scale)
        .context("rendering comparison dashboard")?;
    println!("{}", fixture.title(report.card().composite, reference.bubble_score, config.risk_scale));

    sink.publish(&Artifact::svg(fixture.artifact_name(), svg)).await?;
    Ok(())
}

async fn run_benchmark(sink: &dyn ArtifactSink) -> Result<()> {
    let report = BenchmarkReport::fixture();
    println!("{}", report.summary());
    println!("{}", report.latex());

    sink.publish(&Artifact::json(report.artifact_name(), &report)?).await?;
    Ok(())
}

async fn run_robustness(config: &Config, sink: &dyn ArtifactSink) -> Result<()> {
    let report = RobustnessReport::build(config.risk_scale)?;
    println!("{}", report.summary_text());
    println!("{}", report.latex());

    if !report.is_robust() {
        warn!("Robustness check failed: max deviation {:.2}pp", report.max_deviation());
    }

    sink.publish(&Artifact::json(report.artifact_name(), &report)?).await?;
    Ok(())
}

async fn run_validation(sink: &dyn ArtifactSink) -> Result<()> {
    let report = ValidationReport::fixture();
    println!("{}", report.summary());
    println!("{}", report.granger_latex());
    println!("{}", report.regression_latex());

    sink.publish(&Artifact::json(report.artifact_name(), &report)?).await?;
    Ok(())
}

fn run_growth(prices: &[f64]) -> Result<()> {
    let check = check_exponential_growth(prices)?;
    println!("Log-price slope: {:.4} per period", check.slope);
    println!("R-squared: {:.3}", check.r_squared);
    println!("Exponential score: {:.2}", check.exp_score);
    println!(
        "{}",
        if check.is_exponential {
            "Exponential growth detected"
        } else {
            "No exponential growth"
        }
    );
    Ok(())
}
