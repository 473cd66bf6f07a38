use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use spiral_config::determinism::SeedSource;
use st_matcher::{
    aggregate_batch, save_report, NetworkParams, RankMatrix, SweepConfig, SweepObserver,
    TestResult, TestSummary, DEFAULT_RUNS,
};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Hopfield assignment sweeps and batch aggregation for SpiralTorch"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every parameter configuration and write the CSV report
    Sweep(SweepArgs),

    /// Average convergence rates over numbered batch directories
    Aggregate(AggregateArgs),
}

#[derive(Args)]
struct SweepArgs {
    /// Sweep configuration (TOML). Built-in defaults apply when omitted
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Destination of the CSV report
    #[arg(long, default_value = "report.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Log file, truncated on start
    #[arg(long, default_value = "test.log", value_hint = ValueHint::FilePath)]
    log_file: PathBuf,

    /// Master seed; overrides the configuration and SPIRAL_DETERMINISTIC_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Rank matrix (CSV) used instead of the configured generator
    #[arg(long, value_hint = ValueHint::FilePath)]
    ranks: Option<PathBuf>,

    /// Trials per configuration, overriding the configuration file
    #[arg(long)]
    trials: Option<usize>,

    /// Run trials on the calling thread only
    #[arg(long)]
    sequential: bool,
}

#[derive(Args)]
struct AggregateArgs {
    /// Directory holding `1/report.csv` .. `N/report.csv`
    #[arg(long, default_value = "batch_results", value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Number of batch runs to read
    #[arg(long, default_value_t = DEFAULT_RUNS)]
    runs: usize,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Command::Sweep(args) => {
            spiral_config::tracing::init_tracing(Some(&args.log_file))?;
            run_sweep(args)
        }
        Command::Aggregate(args) => {
            spiral_config::tracing::init_tracing(None)?;
            run_aggregate(args)
        }
    }
}

fn run_sweep(args: &SweepArgs) -> Result<()> {
    let mut config = SweepConfig::load_or_default(args.config.as_deref())?;
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if args.sequential {
        config.parallel = false;
    }
    config.validate()?;

    let seed = SeedSource::resolve(args.seed.or(config.seed));
    info!(
        ?seed,
        trials = config.trials,
        size = config.size,
        sweep = config.sweep.as_str(),
        "starting sweep"
    );
    let mut rng = seed.rng();

    let ranks = match &args.ranks {
        Some(path) => {
            info!(path = %path.display(), "loading ranks");
            RankMatrix::load_csv(path)?
        }
        None => {
            info!(generator = config.ranks.as_str(), "generating ranks");
            config.ranks.generate(config.size, &mut rng)?
        }
    };

    let mut progress = ProgressLog::new(config.trials);
    let summaries = config
        .harness()
        .run_observed(&ranks, &config.params, &mut rng, &mut progress)?;

    save_report(&args.output, &summaries)?;
    info!(path = %args.output.display(), rows = summaries.len(), "report written");
    Ok(())
}

fn run_aggregate(args: &AggregateArgs) -> Result<()> {
    let rows = aggregate_batch(&args.root, args.runs)
        .with_context(|| format!("aggregating {} runs under {}", args.runs, args.root.display()))?;
    for row in rows {
        println!("{row}");
    }
    Ok(())
}

/// Stands in for a progress bar: per-trial debug lines, one info line per configuration.
struct ProgressLog {
    trials: usize,
    started: Option<Instant>,
}

impl ProgressLog {
    fn new(trials: usize) -> Self {
        Self {
            trials,
            started: None,
        }
    }
}

impl SweepObserver for ProgressLog {
    fn on_config_start(&mut self, _index: usize, _params: &NetworkParams) {
        self.started = Some(Instant::now());
    }

    fn on_trial_end(&mut self, trial: usize, result: &TestResult) {
        debug!(
            "trial {}/{}: valid={} score={:.3} epochs={}",
            trial + 1,
            self.trials,
            result.valid,
            result.score,
            result.epochs
        );
    }

    fn on_config_end(&mut self, index: usize, summary: &TestSummary) {
        let elapsed = self.started.map(|s| s.elapsed()).unwrap_or_default();
        info!(
            config = index,
            valid = summary.valid_trials,
            trials = summary.trials,
            "configuration finished in {elapsed:.2?}"
        );
    }
}
