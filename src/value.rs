//! Per-arm value estimation.
//!
//! The gradient step scales its update by an estimate of the pulled arm's
//! value. Three interchangeable strategies are provided: an oracle that
//! reads the bandit's true means, a last-reward tracker, and a running
//! average. All of them are re-initialized against a fresh bandit at every
//! run boundary.

use std::fmt;
use std::str::FromStr;

use crate::{Bandit, BanditError};

/// Per-arm scalar value estimates, updated from observed rewards.
pub trait ValueEstimator {
    /// Re-initialize per-arm state, sized to `bandit.num_arms()`.
    fn reset(&mut self, bandit: &Bandit);

    /// Fold one observed `(arm, reward)` pair into the estimate.
    fn update(&mut self, arm: usize, reward: f64);

    /// Current scalar estimate for `arm`.
    fn value(&self, arm: usize) -> f64;
}

/// Oracle estimator: reports the bandit's true arm means.
///
/// The only component with access to environment ground truth. Useful as a
/// best-possible reference point when comparing baselines, since it removes
/// estimation noise from the advantage entirely.
#[derive(Debug, Clone, Default)]
pub struct KnownValues {
    means: Vec<f64>,
}

impl KnownValues {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValueEstimator for KnownValues {
    fn reset(&mut self, bandit: &Bandit) {
        self.means = bandit.arm_means();
    }

    fn update(&mut self, _arm: usize, _reward: f64) {}

    fn value(&self, arm: usize) -> f64 {
        self.means[arm]
    }
}

/// Remembers the most recent reward observed per arm.
#[derive(Debug, Clone)]
pub struct LastReward {
    default_value: f64,
    last: Vec<f64>,
}

impl LastReward {
    /// `default_value` is reported for arms that have not been pulled yet.
    pub fn new(default_value: f64) -> Self {
        Self {
            default_value,
            last: Vec::new(),
        }
    }
}

impl ValueEstimator for LastReward {
    fn reset(&mut self, bandit: &Bandit) {
        self.last = vec![self.default_value; bandit.num_arms()];
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.last[arm] = reward;
    }

    fn value(&self, arm: usize) -> f64 {
        self.last[arm]
    }
}

/// Arithmetic mean of the rewards observed per arm.
#[derive(Debug, Clone)]
pub struct RunningAverage {
    default_value: f64,
    totals: Vec<f64>,
    pulls: Vec<u64>,
}

impl RunningAverage {
    /// `default_value` is reported for arms that have not been pulled yet.
    pub fn new(default_value: f64) -> Self {
        Self {
            default_value,
            totals: Vec::new(),
            pulls: Vec::new(),
        }
    }
}

impl ValueEstimator for RunningAverage {
    fn reset(&mut self, bandit: &Bandit) {
        self.totals = vec![0.0; bandit.num_arms()];
        self.pulls = vec![0; bandit.num_arms()];
    }

    fn update(&mut self, arm: usize, reward: f64) {
        self.totals[arm] += reward;
        self.pulls[arm] += 1;
    }

    fn value(&self, arm: usize) -> f64 {
        if self.pulls[arm] == 0 {
            self.default_value
        } else {
            self.totals[arm] / self.pulls[arm] as f64
        }
    }
}

/// Which value-estimation strategy to use.
///
/// Parses from the configuration keys `known`, `last`, and `avg`
/// (`average` is accepted as an alias).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueEstimatorKind {
    /// True arm means (oracle).
    Known,
    /// Most recent reward per arm.
    Last,
    /// Running average of rewards per arm.
    Average,
}

impl ValueEstimatorKind {
    /// Canonical configuration key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Known => "known",
            Self::Last => "last",
            Self::Average => "avg",
        }
    }

    /// Build a fresh estimator of this kind.
    ///
    /// `default_value` is what the stateful kinds report for arms with no
    /// observations; the oracle kind has no use for it.
    pub fn build(self, default_value: f64) -> Box<dyn ValueEstimator> {
        match self {
            Self::Known => Box::new(KnownValues::new()),
            Self::Last => Box::new(LastReward::new(default_value)),
            Self::Average => Box::new(RunningAverage::new(default_value)),
        }
    }
}

impl fmt::Display for ValueEstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueEstimatorKind {
    type Err = BanditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "known" => Ok(Self::Known),
            "last" => Ok(Self::Last),
            "avg" | "average" => Ok(Self::Average),
            _ => Err(BanditError::UnknownValueEstimator(s.to_string())),
        }
    }
}
