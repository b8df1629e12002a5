//! Command-line front-end for the policy-gradient bandit testbed.
//!
//! Runs one configured experiment and writes results to stdout. Diagnostics
//! go to stderr via `tracing`, so stdout stays a clean data stream in all
//! three output modes.

use std::io::{self, BufWriter, Write};
use std::process;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use banditbed::{
    BanditError, BaselineKind, Experiment, ExperimentConfig, ValueEstimatorKind, learning_curve,
    summary,
};

/// What to print on stdout.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputMode {
    /// One line of space-separated rewards per run.
    Rewards,
    /// One `mean std_err` line per pull index, across runs.
    Curve,
    /// A single `mean std_err` line for the whole experiment.
    Summary,
}

#[derive(Parser, Debug)]
#[command(
    name = "experiment",
    about = "Run a policy-gradient bandit experiment and print rewards."
)]
struct Args {
    /// Value estimate feeding the advantage: known, last, or avg
    #[arg(long = "value-estimate", default_value = "last")]
    value_estimate: ValueEstimatorKind,

    /// Baseline: zero, value, trcov, trcov_grad, or naive_grad
    #[arg(long = "baseline", default_value = "zero")]
    baseline: BaselineKind,

    /// Value estimate feeding the baseline: known, last, or avg
    #[arg(long = "baseline-value-estimate", default_value = "avg")]
    baseline_value_estimate: ValueEstimatorKind,

    /// Step size for the online baselines
    #[arg(long = "baseline-stepsize", default_value_t = 0.1)]
    baseline_stepsize: f64,

    /// The policy step-size parameter (alpha)
    #[arg(short = 's', long = "stepsize", default_value_t = 0.1)]
    stepsize: f64,

    /// Value reported by the stateful estimators before any pull of an arm
    #[arg(long = "default-value", default_value_t = 0.0)]
    default_value: f64,

    /// Number of arms in the testbed
    #[arg(short = 'a', long = "num-arms", default_value_t = 10)]
    num_arms: usize,

    /// Number of runs for the experiment
    #[arg(short = 'r', long = "num-runs", default_value_t = 10_000)]
    num_runs: usize,

    /// Number of pulls per run
    #[arg(short = 'p', long = "num-pulls", default_value_t = 200)]
    num_pulls: usize,

    /// Seed of the agent stream
    #[arg(short = 'S', long = "seed", default_value_t = 0)]
    seed: u64,

    /// Seed of the bandit-generation stream
    #[arg(long = "bandit-seed", default_value_t = 1)]
    bandit_seed: u64,

    /// Expected arm mean in the generated bandits
    #[arg(long = "arm-mean", default_value_t = 0.0)]
    arm_mean: f64,

    /// What to print: raw rewards, the learning curve, or a summary point
    #[arg(long = "output", value_enum, default_value_t = OutputMode::Rewards)]
    output: OutputMode,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), BanditError> {
    let config = ExperimentConfig {
        value_estimator: args.value_estimate,
        baseline: args.baseline,
        baseline_value_estimator: args.baseline_value_estimate,
        baseline_step_size: args.baseline_stepsize,
        step_size: args.stepsize,
        default_value: args.default_value,
        num_arms: args.num_arms,
        num_runs: args.num_runs,
        num_pulls: args.num_pulls,
        seed: args.seed,
        bandit_seed: args.bandit_seed,
        arm_mean: args.arm_mean,
    };
    let mut experiment = Experiment::new(config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match args.output {
        OutputMode::Rewards => {
            experiment.run(&mut out)?;
        }
        OutputMode::Curve => {
            let table = experiment.run(&mut io::sink())?;
            for stat in learning_curve(&table) {
                writeln!(out, "{} {}", stat.mean, stat.std_err)?;
            }
        }
        OutputMode::Summary => {
            let table = experiment.run(&mut io::sink())?;
            let point = summary(&table);
            writeln!(out, "{} {}", point.mean, point.std_err)?;
        }
    }
    out.flush()?;
    Ok(())
}
