//! Gaussian multi-armed bandit environment.
//!
//! A bandit is an ordered set of arms, each paying a unit-variance Gaussian
//! reward around a fixed mean. The bandit itself is immutable after
//! construction; every stochastic operation draws from a caller-supplied
//! stream, so two bandits built from identically seeded streams are
//! indistinguishable.

use rand::RngCore;
use rand_distr::{Distribution, Normal, StandardNormal};

use crate::BanditError;

/// A stationary K-armed bandit with `Normal(mean_i, 1)` reward arms.
///
/// # Example
///
/// ```rust
/// use banditbed::Bandit;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let bandit = Bandit::from_means(&[0.0, 5.0]).unwrap();
/// let mut rng = StdRng::seed_from_u64(1);
/// let reward = bandit.pull(1, &mut rng).unwrap();
/// assert!(reward.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct Bandit {
    arms: Vec<Normal<f64>>,
}

impl Bandit {
    /// Build a bandit with explicit per-arm means and unit variance.
    pub fn from_means(means: &[f64]) -> Result<Self, BanditError> {
        if means.is_empty() {
            return Err(BanditError::InvalidConfiguration(
                "a bandit needs at least one arm",
            ));
        }
        let arms = means
            .iter()
            .map(|&m| Normal::new(m, 1.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| BanditError::InvalidConfiguration("arm mean is not usable"))?;
        Ok(Self { arms })
    }

    /// Build a bandit with `num_arms` arms whose means are drawn standard
    /// normal from `rng` and shifted by `base_mean`.
    ///
    /// Consumes exactly `num_arms` draws from `rng`, so bandit generation
    /// stays reproducible independently of how the bandit is later pulled.
    pub fn gaussian(
        rng: &mut dyn RngCore,
        num_arms: usize,
        base_mean: f64,
    ) -> Result<Self, BanditError> {
        if num_arms == 0 {
            return Err(BanditError::InvalidConfiguration(
                "a bandit needs at least one arm",
            ));
        }
        let mut means = Vec::with_capacity(num_arms);
        for _ in 0..num_arms {
            let offset: f64 = StandardNormal.sample(rng);
            means.push(base_mean + offset);
        }
        Self::from_means(&means)
    }

    /// Number of arms.
    pub fn num_arms(&self) -> usize {
        self.arms.len()
    }

    /// Ground-truth expected reward per arm.
    ///
    /// Only the oracle value estimator is allowed to read this; everything
    /// else has to learn from pulls.
    pub fn arm_means(&self) -> Vec<f64> {
        self.arms.iter().map(|arm| arm.mean()).collect()
    }

    /// Draw one reward from `arm`, advancing `rng`.
    ///
    /// Fails if `arm` is not a valid index. A correctly normalized policy
    /// never produces one, so hitting this error indicates a bug in the
    /// caller's sampling.
    pub fn pull(&self, arm: usize, rng: &mut dyn RngCore) -> Result<f64, BanditError> {
        let dist = self.arms.get(arm).ok_or(BanditError::OutOfRange {
            arm,
            num_arms: self.arms.len(),
        })?;
        Ok(dist.sample(rng))
    }
}
