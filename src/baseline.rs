//! Variance-reduction baselines for the policy-gradient estimator.
//!
//! A baseline is the scalar subtracted from the estimated return before the
//! gradient step. Subtracting an action-independent scalar leaves the
//! gradient estimate unbiased but changes its variance; the strategies here
//! differ in how much policy knowledge and tracking lag they trade for
//! variance.
//!
//! Collaborators are passed per call: the batch strategies hold no state at
//! all, and the two online strategies own nothing but their running scalar.

use std::fmt;
use std::str::FromStr;

use crate::{BanditError, PROB_FLOOR, Policy, ValueEstimator};

/// A scalar baseline for the policy-gradient update.
pub trait Baseline {
    /// Clear internal state at a run boundary. Default: nothing to clear.
    fn reset(&mut self) {}

    /// Fold one observation in. Default: the stateless strategies ignore it.
    fn update(
        &mut self,
        _arm: usize,
        _reward: f64,
        _policy: &dyn Policy,
        _values: &dyn ValueEstimator,
    ) {
    }

    /// The baseline value to subtract this step.
    fn value(&self, policy: &dyn Policy, values: &dyn ValueEstimator) -> f64;
}

fn grad_norm_sq(policy: &dyn Policy, arm: usize) -> f64 {
    policy.grad(arm).iter().map(|g| g * g).sum()
}

/// No baseline: subtract nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroBaseline;

impl Baseline for ZeroBaseline {
    fn value(&self, _policy: &dyn Policy, _values: &dyn ValueEstimator) -> f64 {
        0.0
    }
}

/// Expected value of the current policy: `Σ_a prob(a) · value(a)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueBaseline;

impl Baseline for ValueBaseline {
    fn value(&self, policy: &dyn Policy, values: &dyn ValueEstimator) -> f64 {
        (0..policy.num_arms())
            .map(|arm| policy.prob(arm) * values.value(arm))
            .sum()
    }
}

/// Baseline minimizing the trace of the gradient-estimator covariance.
///
/// Each arm is weighted by `‖grad(a)‖² / prob(a)` and the baseline is the
/// weighted average of the value estimates under those weights. Degenerate
/// weights (all zero, or non-finite despite the probability floor) fall back
/// to 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceCovBaseline;

impl Baseline for TraceCovBaseline {
    fn value(&self, policy: &dyn Policy, values: &dyn ValueEstimator) -> f64 {
        let mut weighted = 0.0;
        let mut total = 0.0;
        for arm in 0..policy.num_arms() {
            let w = grad_norm_sq(policy, arm) / policy.prob(arm).max(PROB_FLOOR);
            weighted += w * values.value(arm);
            total += w;
        }
        if total <= 0.0 || !total.is_finite() {
            return 0.0;
        }
        weighted / total
    }
}

/// Online approximation of [`TraceCovBaseline`].
///
/// Tracks a running scalar moved toward each observed arm's value estimate,
/// with the step amplified by `‖grad(arm)‖² / prob(arm)²`.
#[derive(Debug, Clone, Copy)]
pub struct TraceCovGradBaseline {
    step_size: f64,
    b: f64,
}

impl TraceCovGradBaseline {
    pub fn new(step_size: f64) -> Self {
        Self { step_size, b: 0.0 }
    }
}

impl Baseline for TraceCovGradBaseline {
    fn reset(&mut self) {
        self.b = 0.0;
    }

    fn update(
        &mut self,
        arm: usize,
        _reward: f64,
        policy: &dyn Policy,
        values: &dyn ValueEstimator,
    ) {
        let p = policy.prob(arm).max(PROB_FLOOR);
        let weight = grad_norm_sq(policy, arm) / (p * p);
        self.b += self.step_size * (values.value(arm) - self.b) * weight;
    }

    fn value(&self, _policy: &dyn Policy, _values: &dyn ValueEstimator) -> f64 {
        self.b
    }
}

/// Exponential running average of the observed arms' value estimates.
///
/// Ignores the policy entirely; the cheapest online baseline.
#[derive(Debug, Clone, Copy)]
pub struct NaiveGradBaseline {
    step_size: f64,
    b: f64,
}

impl NaiveGradBaseline {
    pub fn new(step_size: f64) -> Self {
        Self { step_size, b: 0.0 }
    }
}

impl Baseline for NaiveGradBaseline {
    fn reset(&mut self) {
        self.b = 0.0;
    }

    fn update(
        &mut self,
        arm: usize,
        _reward: f64,
        _policy: &dyn Policy,
        values: &dyn ValueEstimator,
    ) {
        self.b += self.step_size * (values.value(arm) - self.b);
    }

    fn value(&self, _policy: &dyn Policy, _values: &dyn ValueEstimator) -> f64 {
        self.b
    }
}

/// Which baseline strategy to use.
///
/// Parses from the configuration keys `zero`, `value`, `trcov`,
/// `trcov_grad`, and `naive_grad`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaselineKind {
    /// Always 0.
    Zero,
    /// Expected value under the current policy.
    Value,
    /// Trace-of-covariance weighted average (batch).
    TraceCov,
    /// Trace-of-covariance running scalar (online).
    TraceCovGrad,
    /// Plain running scalar, no gradient weighting (online).
    NaiveGrad,
}

impl BaselineKind {
    /// Canonical configuration key for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Value => "value",
            Self::TraceCov => "trcov",
            Self::TraceCovGrad => "trcov_grad",
            Self::NaiveGrad => "naive_grad",
        }
    }

    /// Build a fresh baseline of this kind.
    ///
    /// `step_size` feeds the two online kinds; the batch kinds have no use
    /// for it.
    pub fn build(self, step_size: f64) -> Box<dyn Baseline> {
        match self {
            Self::Zero => Box::new(ZeroBaseline),
            Self::Value => Box::new(ValueBaseline),
            Self::TraceCov => Box::new(TraceCovBaseline),
            Self::TraceCovGrad => Box::new(TraceCovGradBaseline::new(step_size)),
            Self::NaiveGrad => Box::new(NaiveGradBaseline::new(step_size)),
        }
    }
}

impl fmt::Display for BaselineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaselineKind {
    type Err = BanditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "value" => Ok(Self::Value),
            "trcov" => Ok(Self::TraceCov),
            "trcov_grad" => Ok(Self::TraceCovGrad),
            "naive_grad" => Ok(Self::NaiveGrad),
            _ => Err(BanditError::UnknownBaseline(s.to_string())),
        }
    }
}
