//! Command-line front-end.
//!
//! Reads a JSON [`ProblemInstance`], runs the search and writes the
//! [`ScheduleSummary`] as JSON to `--out` or stdout. Logs go to stderr.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use u_rcpsp::models::ProblemInstance;
use u_rcpsp::{AlnsConfig, RcpspResult, ScheduleSummary, solve};

#[derive(Parser)]
#[command(name = "u-rcpsp")]
#[command(about = "Makespan minimization for RCPSP instances with time-varying capacities")]
struct Args {
    /// Problem instance (JSON: resources, tasks, capacities)
    #[arg(long)]
    instance: PathBuf,

    /// Search configuration (JSON, missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Iteration budget, overrides the configuration file
    #[arg(long)]
    iters: Option<usize>,

    /// Random seed, overrides the configuration file
    #[arg(long)]
    seed: Option<u64>,

    /// Output file for the summary; stdout if omitted
    #[arg(long)]
    out: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = load_config(&args)?;
    let instance: ProblemInstance = serde_json::from_str(&fs::read_to_string(&args.instance)?)?;
    tracing::info!(
        instance = %args.instance.display(),
        tasks = instance.tasks.len(),
        iterations = config.iterations,
        seed = config.seed,
        "Loaded instance"
    );

    let summary = solve(instance.into_problem()?, &config)?;
    write_summary(&summary, args.out.as_ref())?;

    tracing::info!(
        makespan = summary.makespan,
        total_utilization = summary.total_utilization,
        "Done"
    );
    Ok(())
}

fn load_config(args: &Args) -> RcpspResult<AlnsConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => AlnsConfig::default(),
    };
    if let Some(iters) = args.iters {
        config.iterations = iters;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

fn write_summary(summary: &ScheduleSummary, out: Option<&PathBuf>) -> RcpspResult<()> {
    let json = serde_json::to_string_pretty(summary)?;
    match out {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
