//! Aggregate statistics over a rewards table.
//!
//! The experiment runner returns rewards as a runs × pulls table; the two
//! aggregations here reproduce the usual ways of reading it. A learning
//! curve averages down the columns (how reward evolves with pull index), a
//! summary averages the per-run means (one point per configuration, as used
//! in parameter studies). Standard errors use the population standard
//! deviation over `num_runs`.

/// Mean reward at one pull index, across runs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PullStat {
    pub mean: f64,
    pub std_err: f64,
}

/// Whole-experiment summary: mean of per-run mean rewards.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudyPoint {
    pub mean: f64,
    pub std_err: f64,
}

fn mean_and_std(samples: impl Iterator<Item = f64> + Clone, n: usize) -> (f64, f64) {
    let mean = samples.clone().sum::<f64>() / n as f64;
    let var = samples.map(|x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;
    (mean, var.sqrt())
}

/// Per-pull mean reward and its standard error across runs.
///
/// Empty input gives an empty curve; every run must have the same number of
/// pulls (the runner guarantees this).
pub fn learning_curve(table: &[Vec<f64>]) -> Vec<PullStat> {
    let Some(first) = table.first() else {
        return Vec::new();
    };
    let num_runs = table.len();
    let sqrt_runs = (num_runs as f64).sqrt();
    (0..first.len())
        .map(|pull| {
            let (mean, sigma) = mean_and_std(table.iter().map(|run| run[pull]), num_runs);
            PullStat {
                mean,
                std_err: sigma / sqrt_runs,
            }
        })
        .collect()
}

/// Mean of per-run mean rewards and the standard error of that mean.
pub fn summary(table: &[Vec<f64>]) -> StudyPoint {
    if table.is_empty() {
        return StudyPoint {
            mean: 0.0,
            std_err: 0.0,
        };
    }
    let num_runs = table.len();
    let run_means = table
        .iter()
        .map(|run| run.iter().sum::<f64>() / run.len() as f64);
    let (mean, sigma) = mean_and_std(run_means, num_runs);
    StudyPoint {
        mean,
        std_err: sigma / (num_runs as f64).sqrt(),
    }
}
