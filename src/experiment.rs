//! The experiment runner: runs × pulls of the policy-gradient step.
//!
//! One runner owns the policy, both estimators, and the baseline for the
//! whole experiment; a fresh bandit is drawn per run and everything is reset
//! against it. Two independent seeded streams keep the experiment
//! decomposable: the bandit stream only ever generates arm means, the agent
//! stream drives sampling and reward draws, so changing the agent seed never
//! changes which bandits are faced.

use std::io::Write;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::{
    Bandit, BanditError, Baseline, BaselineKind, GibbsPolicy, Policy, ValueEstimator,
    ValueEstimatorKind, policy_gradient_step,
};

/// Rewards observed by an experiment, indexed `[run][pull]`.
pub type RewardTable = Vec<Vec<f64>>;

/// Full configuration of one experiment.
///
/// Defaults match the reference testbed: a 10-arm standard-normal bandit,
/// last-reward value estimate, no baseline, 10,000 runs of 200 pulls.
///
/// # Example
///
/// ```rust
/// use banditbed::{BaselineKind, ExperimentConfig};
///
/// let config = ExperimentConfig {
///     baseline: BaselineKind::Value,
///     num_runs: 100,
///     ..ExperimentConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Value estimate feeding the advantage term.
    pub value_estimator: ValueEstimatorKind,
    /// Variance-reduction baseline.
    pub baseline: BaselineKind,
    /// Value estimate feeding the baseline (may differ from the advantage's).
    pub baseline_value_estimator: ValueEstimatorKind,
    /// Step size for the online baselines.
    pub baseline_step_size: f64,
    /// Policy gradient-ascent step size (alpha).
    pub step_size: f64,
    /// Reported by the stateful estimators for arms with no observations.
    pub default_value: f64,
    /// Arms per bandit.
    pub num_arms: usize,
    /// Independent runs, each against a fresh bandit.
    pub num_runs: usize,
    /// Pulls per run.
    pub num_pulls: usize,
    /// Seed of the agent stream (sampling and reward draws).
    pub seed: u64,
    /// Seed of the bandit-generation stream.
    pub bandit_seed: u64,
    /// Shift added to every randomly drawn arm mean.
    pub arm_mean: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            value_estimator: ValueEstimatorKind::Last,
            baseline: BaselineKind::Zero,
            baseline_value_estimator: ValueEstimatorKind::Average,
            baseline_step_size: 0.1,
            step_size: 0.1,
            default_value: 0.0,
            num_arms: 10,
            num_runs: 10_000,
            num_pulls: 200,
            seed: 0,
            bandit_seed: 1,
            arm_mean: 0.0,
        }
    }
}

impl ExperimentConfig {
    /// Reject degenerate experiment shapes before any run starts.
    pub fn validate(&self) -> Result<(), BanditError> {
        if self.num_arms == 0 {
            return Err(BanditError::InvalidConfiguration(
                "num_arms must be at least 1",
            ));
        }
        if self.num_runs == 0 {
            return Err(BanditError::InvalidConfiguration(
                "num_runs must be at least 1",
            ));
        }
        if self.num_pulls == 0 {
            return Err(BanditError::InvalidConfiguration(
                "num_pulls must be at least 1",
            ));
        }
        Ok(())
    }
}

/// One configured experiment: policy, estimators, and baseline, reused (and
/// reset) across runs.
pub struct Experiment {
    config: ExperimentConfig,
    policy: GibbsPolicy,
    values: Box<dyn ValueEstimator>,
    baseline: Box<dyn Baseline>,
    baseline_values: Box<dyn ValueEstimator>,
}

impl Experiment {
    /// Build the agent stack from `config`, failing fast on a degenerate
    /// shape.
    pub fn new(config: ExperimentConfig) -> Result<Self, BanditError> {
        config.validate()?;
        let policy = GibbsPolicy::new(config.num_arms);
        let values = config.value_estimator.build(config.default_value);
        let baseline = config.baseline.build(config.baseline_step_size);
        let baseline_values = config
            .baseline_value_estimator
            .build(config.default_value);
        Ok(Self {
            config,
            policy,
            values,
            baseline,
            baseline_values,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run the full experiment, writing one line of space-separated rewards
    /// per run to `out`, and return the rewards table.
    ///
    /// Rewards are written with `f64`'s `Display`, which round-trips through
    /// parsing. Output and the returned table hold identical values.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<RewardTable, BanditError> {
        info!(
            value_estimator = %self.config.value_estimator,
            baseline = %self.config.baseline,
            num_arms = self.config.num_arms,
            num_runs = self.config.num_runs,
            num_pulls = self.config.num_pulls,
            "starting experiment"
        );

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut bandit_rng = StdRng::seed_from_u64(self.config.bandit_seed);

        let mut table = Vec::with_capacity(self.config.num_runs);
        for run in 0..self.config.num_runs {
            let bandit = Bandit::gaussian(
                &mut bandit_rng,
                self.config.num_arms,
                self.config.arm_mean,
            )?;
            self.policy.reset();
            self.values.reset(&bandit);
            self.baseline_values.reset(&bandit);
            self.baseline.reset();

            let mut rewards = Vec::with_capacity(self.config.num_pulls);
            for _ in 0..self.config.num_pulls {
                let reward = policy_gradient_step(
                    &mut rng,
                    self.config.step_size,
                    &bandit,
                    &mut self.policy,
                    &mut *self.values,
                    &mut *self.baseline,
                    &mut *self.baseline_values,
                )?;
                write!(out, "{reward} ")?;
                rewards.push(reward);
            }
            writeln!(out)?;
            debug!(run, mean_reward = rewards.iter().sum::<f64>() / rewards.len() as f64);
            table.push(rewards);
        }
        Ok(table)
    }
}
