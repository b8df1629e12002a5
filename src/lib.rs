//! `banditbed`: a policy-gradient testbed for multi-armed bandits.
//!
//! The crate simulates reinforcement-learning experiments on stationary
//! Gaussian bandits to study policy-gradient methods and, in particular,
//! variance-reduction baselines. Each experiment run draws a fresh bandit,
//! resets a softmax policy to uniform, and performs gradient ascent on the
//! per-arm preferences from a stream of sampled pulls.
//!
//! The pieces compose through three small trait seams:
//!
//! - [`Policy`] — sampling, selection probability, and the (probability-
//!   scaled) gradient of log-probability. [`GibbsPolicy`] is the softmax
//!   implementation over a preference vector.
//! - [`ValueEstimator`] — per-arm scalar value estimates: [`KnownValues`]
//!   (oracle), [`LastReward`], and [`RunningAverage`], selected by
//!   [`ValueEstimatorKind`].
//! - [`Baseline`] — the scalar subtracted from the estimated return before
//!   the gradient step: [`ZeroBaseline`], [`ValueBaseline`],
//!   [`TraceCovBaseline`], [`TraceCovGradBaseline`], and
//!   [`NaiveGradBaseline`], selected by [`BaselineKind`].
//!
//! [`policy_gradient_step`] wires one interaction together; [`Experiment`]
//! iterates it over runs × pulls, writing one line of space-separated
//! rewards per run; [`learning_curve`] and [`summary`] aggregate the
//! resulting table.
//!
//! # Why baselines
//!
//! The REINFORCE estimator `(value(arm) − b) · ∇log π(arm)` is unbiased for
//! any action-independent `b`, but its variance depends strongly on the
//! choice. The five strategies span the design space: nothing (`zero`), the
//! state value under the current policy (`value`), the covariance-trace
//! minimizer computed in batch over all arms (`trcov`), its online
//! stochastic approximation (`trcov_grad`), and a policy-agnostic running
//! average (`naive_grad`). All five share one calling convention: policy and
//! value-estimator collaborators are passed per call, so the batch variants
//! hold no state and the online variants own only their running scalar.
//!
//! # Determinism
//!
//! Nothing in the crate owns randomness. Every sampling operation takes
//! `&mut dyn RngCore`, and the runner threads two independently seeded
//! `StdRng` streams — one generating bandits, one driving the agent — so
//! experiments are reproducible and the environment sequence is invariant
//! under agent-seed changes.
//!
//! # Example
//!
//! ```rust
//! use banditbed::{BaselineKind, Experiment, ExperimentConfig, ValueEstimatorKind, summary};
//!
//! let mut experiment = Experiment::new(ExperimentConfig {
//!     value_estimator: ValueEstimatorKind::Average,
//!     baseline: BaselineKind::Value,
//!     num_arms: 5,
//!     num_runs: 20,
//!     num_pulls: 50,
//!     ..ExperimentConfig::default()
//! })?;
//! let mut out = Vec::new();
//! let table = experiment.run(&mut out)?;
//! let point = summary(&table);
//! assert!(point.mean.is_finite());
//! # Ok::<(), banditbed::BanditError>(())
//! ```
//!
//! **Non-goals:** no persistence beyond the textual reward stream, no
//! parallel runs, no online hyperparameter tuning, no non-Gaussian reward
//! models.

#![forbid(unsafe_code)]

mod bandit;
pub use bandit::*;

mod baseline;
pub use baseline::*;

mod error;
pub use error::*;

mod experiment;
pub use experiment::*;

mod policy;
pub use policy::*;

mod stats;
pub use stats::*;

mod step;
pub use step::*;

mod value;
pub use value::*;
