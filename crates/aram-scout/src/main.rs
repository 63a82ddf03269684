// aram-scout entry point.
//
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Load config, apply command-line overrides
// 3. Fetch sources, join and compare
// 4. Print the report

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use aram_scout::app;
use aram_scout::config;
use aram_scout::fetch::HttpFetcher;
use aram_scout::report::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "aram-scout")]
#[command(about = "Find non-free ARAM champions that beat the free roster's win rate")]
#[command(version)]
struct Args {
    /// Config file (default: config/scout.toml, copied from defaults/ if missing)
    #[arg(short, long, env = "ARAM_SCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Win rate multiplier over the free roster average
    #[arg(long, env = "ARAM_SCOUT_COEFFICIENT")]
    coefficient: Option<f64>,

    /// Patch to average over; repeat or comma-separate to replace the configured list
    #[arg(long = "patch", env = "ARAM_SCOUT_PATCHES", value_delimiter = ',')]
    patches: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config_file(path),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;

    let patches = (!args.patches.is_empty()).then(|| args.patches.clone());
    let config = config
        .with_overrides(args.coefficient, patches)
        .context("invalid command-line override")?;
    info!(
        "Config loaded: patches {:?}, coefficient {}",
        config.patches, config.coefficient
    );

    let fetcher = HttpFetcher::new(&config.http).context("failed to build HTTP client")?;
    let report = app::run(&config, &fetcher).await.context("scouting run failed")?;

    let rendered = report
        .render(args.format)
        .context("failed to render report")?;
    print!("{rendered}");
    if args.format == OutputFormat::Json {
        println!();
    }

    Ok(())
}

/// Initialize tracing to stderr so the report on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aram_scout=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
