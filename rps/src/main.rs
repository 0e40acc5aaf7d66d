use clap::{Args, Parser};
use std::path::PathBuf;

mod config;
mod telemetry;

#[derive(Parser)]
#[command(version, about = "Rock, paper, scissor services")]
enum CliCommand {
    /// Run the aggregator in front of the rock, paper and scissor upstreams
    Aggregator(AggregatorArgs),
}

#[derive(Args)]
struct AggregatorArgs {
    /// YAML config file. Without one, the aggregator is configured from the
    /// environment.
    #[arg(long)]
    config_file_path: Option<PathBuf>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Aggregator(#[from] aggregator::errors::AggregatorError),
}

fn main() -> Result<(), CliError> {
    let cli = CliCommand::parse();

    match cli {
        CliCommand::Aggregator(args) => run_aggregator(args),
    }
}

fn run_aggregator(args: AggregatorArgs) -> Result<(), CliError> {
    let (common, aggregator_config) = config::Config::load(args.config_file_path.as_deref())?;

    let _sentry = telemetry::init_logging(common.logging.as_ref());
    telemetry::init_metrics(
        common.metrics.as_ref(),
        aggregator::metrics_defs::ALL_METRICS,
    )?;

    // A single event loop serves all requests and their upstream calls
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Err(e) = rt.block_on(aggregator::run(aggregator_config)) {
        tracing::error!(error = %e, "Aggregator stopped");
        return Err(e.into());
    }
    Ok(())
}
