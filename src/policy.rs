//! Gibbs (softmax) action-selection policy.
//!
//! The policy owns a per-arm preference vector and exposes exactly the three
//! queries the gradient step needs: sampling, selection probability, and the
//! probability-scaled gradient of log-probability. Randomness is always
//! passed in by the caller, so the same policy can be driven from any seeded
//! stream.

use rand::Rng;
use rand::RngCore;

/// A parametric action-selection distribution over arms.
///
/// Object-safe so baselines can take `&dyn Policy`; randomness comes in
/// through `&mut dyn RngCore` rather than being owned by the policy.
pub trait Policy {
    /// Reset parameters to their initial state.
    fn reset(&mut self);

    /// Sample an arm index from the current distribution.
    fn sample_arm(&self, rng: &mut dyn RngCore) -> usize;

    /// Selection probability of `arm`.
    fn prob(&self, arm: usize) -> f64;

    /// Gradient of `log prob(arm)` with respect to the parameters, scaled by
    /// `prob(arm)`.
    ///
    /// Callers that need the unscaled score function divide the result by
    /// [`prob`](Policy::prob).
    fn grad(&self, arm: usize) -> Vec<f64>;

    /// Replace the parameter vector. The length must match.
    fn set_params(&mut self, params: Vec<f64>);

    /// Current parameter vector.
    fn params(&self) -> &[f64];

    /// Number of arms the policy selects over.
    fn num_arms(&self) -> usize;
}

/// Softmax policy over per-arm preferences.
///
/// Selection probability is `exp(prefs[i]) / Z` with `Z = Σ_j exp(prefs[j])`.
/// Preferences start at zero (uniform selection) and move under gradient
/// ascent.
///
/// # Example
///
/// ```rust
/// use banditbed::{GibbsPolicy, Policy};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let policy = GibbsPolicy::new(3);
/// let mut rng = StdRng::seed_from_u64(7);
/// let arm = policy.sample_arm(&mut rng);
/// assert!(arm < 3);
/// assert!((policy.prob(arm) - 1.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct GibbsPolicy {
    prefs: Vec<f64>,
}

impl GibbsPolicy {
    /// A fresh policy over `num_arms` arms (at least one) with zero
    /// preferences.
    pub fn new(num_arms: usize) -> Self {
        debug_assert!(num_arms > 0, "a policy needs at least one arm");
        Self {
            prefs: vec![0.0; num_arms],
        }
    }

    fn normalizer(&self) -> f64 {
        self.prefs.iter().map(|p| p.exp()).sum()
    }
}

impl Policy for GibbsPolicy {
    fn reset(&mut self) {
        for p in &mut self.prefs {
            *p = 0.0;
        }
    }

    /// Inverse-CDF sampling over the unnormalized weights: draw `x` in
    /// `[0, Z)` and walk the partial sums in index order until they cover
    /// `x`. If the partial sums undershoot `x` from accumulated rounding,
    /// the last arm is returned; if `Z` itself degenerates (overflow to
    /// infinity, or total underflow to zero), the draw falls back to a
    /// uniform arm index from the same stream.
    fn sample_arm(&self, rng: &mut dyn RngCore) -> usize {
        let z = self.normalizer();
        if !z.is_finite() || z <= 0.0 {
            return rng.random_range(0..self.prefs.len());
        }
        let x = rng.random_range(0.0..z);
        let mut cumulative = 0.0;
        for (arm, p) in self.prefs.iter().enumerate() {
            cumulative += p.exp();
            if cumulative >= x {
                return arm;
            }
        }
        // Numerical fallback.
        self.prefs.len() - 1
    }

    fn prob(&self, arm: usize) -> f64 {
        self.prefs[arm].exp() / self.normalizer()
    }

    fn grad(&self, arm: usize) -> Vec<f64> {
        let z = self.normalizer();
        let probs: Vec<f64> = self.prefs.iter().map(|p| p.exp() / z).collect();
        let p_arm = probs[arm];
        probs
            .iter()
            .enumerate()
            .map(|(i, &p_i)| {
                let indicator = if i == arm { 1.0 } else { 0.0 };
                indicator * p_arm - p_arm * p_i
            })
            .collect()
    }

    fn set_params(&mut self, params: Vec<f64>) {
        debug_assert_eq!(params.len(), self.prefs.len());
        self.prefs = params;
    }

    fn params(&self) -> &[f64] {
        &self.prefs
    }

    fn num_arms(&self) -> usize {
        self.prefs.len()
    }
}
