//! End-to-end experiment scenarios and output contracts.
//!
//! The runner's promises:
//!
//! 1. **Reproducibility**: identical configurations yield byte-identical
//!    output; the bandit stream is independent of the agent stream.
//! 2. **Output fidelity**: the emitted text parses back to exactly the
//!    rewards in the returned table.
//! 3. **Shape**: one line per run, `num_pulls` rewards per line.
//! 4. **Factories**: every supported kind string builds, unknown strings
//!    fail with the configuration error.
//! 5. **Learning**: with a clearly separated best arm, the policy ends up
//!    preferring it.

use banditbed::{
    Bandit, BanditError, BaselineKind, Experiment, ExperimentConfig, GibbsPolicy, Policy,
    RunningAverage, ValueEstimator, ValueEstimatorKind, ZeroBaseline, learning_curve,
    policy_gradient_step, summary,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn tiny_config() -> ExperimentConfig {
    ExperimentConfig {
        num_arms: 4,
        num_runs: 3,
        num_pulls: 10,
        ..ExperimentConfig::default()
    }
}

fn run_to_string(config: ExperimentConfig) -> (String, Vec<Vec<f64>>) {
    let mut out = Vec::new();
    let table = Experiment::new(config).unwrap().run(&mut out).unwrap();
    (String::from_utf8(out).unwrap(), table)
}

// ---------------------------------------------------------------------------
// 1. Reproducibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn identical_configs_are_byte_identical(seed in any::<u64>(), bandit_seed in any::<u64>()) {
        let config = ExperimentConfig { seed, bandit_seed, ..tiny_config() };
        let (text_a, table_a) = run_to_string(config.clone());
        let (text_b, table_b) = run_to_string(config);
        prop_assert_eq!(text_a, text_b);
        prop_assert_eq!(table_a, table_b);
    }
}

#[test]
fn bandit_stream_is_independent_of_agent_seed() {
    // The bandit stream only generates arm means, so the sequence of bandits
    // is fixed by the bandit seed alone.
    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(1);
    for _ in 0..5 {
        let a = Bandit::gaussian(&mut rng_a, 6, 0.0).unwrap();
        let b = Bandit::gaussian(&mut rng_b, 6, 0.0).unwrap();
        assert_eq!(a.arm_means(), b.arm_means());
    }
}

// ---------------------------------------------------------------------------
// 2. Output fidelity
// ---------------------------------------------------------------------------

#[test]
fn emitted_rewards_parse_back_exactly() {
    let (text, table) = run_to_string(tiny_config());
    let parsed: Vec<Vec<f64>> = text
        .lines()
        .map(|line| {
            line.split_whitespace()
                .map(|tok| tok.parse::<f64>().unwrap())
                .collect()
        })
        .collect();
    assert_eq!(parsed, table);
}

// ---------------------------------------------------------------------------
// 3. Shape
// ---------------------------------------------------------------------------

#[test]
fn single_arm_run_emits_exactly_num_pulls_rewards() {
    let config = ExperimentConfig {
        num_arms: 1,
        num_runs: 1,
        num_pulls: 25,
        ..ExperimentConfig::default()
    };
    let (text, table) = run_to_string(config);
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].len(), 25);
    assert_eq!(text.lines().count(), 1);
    assert_eq!(text.split_whitespace().count(), 25);
}

#[test]
fn every_baseline_kind_completes_a_small_experiment() {
    for baseline in [
        BaselineKind::Zero,
        BaselineKind::Value,
        BaselineKind::TraceCov,
        BaselineKind::TraceCovGrad,
        BaselineKind::NaiveGrad,
    ] {
        let config = ExperimentConfig {
            baseline,
            value_estimator: ValueEstimatorKind::Average,
            ..tiny_config()
        };
        let (_, table) = run_to_string(config);
        assert!(
            table.iter().flatten().all(|r| r.is_finite()),
            "baseline={baseline}"
        );
    }
}

// ---------------------------------------------------------------------------
// 4. Factories
// ---------------------------------------------------------------------------

#[test]
fn every_supported_kind_string_round_trips() {
    for s in ["known", "last", "avg"] {
        let kind: ValueEstimatorKind = s.parse().unwrap();
        assert_eq!(kind.as_str(), s);
    }
    for s in ["zero", "value", "trcov", "trcov_grad", "naive_grad"] {
        let kind: BaselineKind = s.parse().unwrap();
        assert_eq!(kind.as_str(), s);
    }
}

#[test]
fn unknown_kind_strings_are_configuration_errors() {
    assert!(matches!(
        "ucb".parse::<ValueEstimatorKind>(),
        Err(BanditError::UnknownValueEstimator(_))
    ));
    assert!(matches!(
        "ucb".parse::<BaselineKind>(),
        Err(BanditError::UnknownBaseline(_))
    ));
}

// ---------------------------------------------------------------------------
// 5. Learning
// ---------------------------------------------------------------------------

#[test]
fn two_arm_scenario_shifts_preferences_toward_the_better_arm() {
    // Means [0, 5]: after a few hundred pulls the policy should strongly
    // prefer arm 1.
    let bandit = Bandit::from_means(&[0.0, 5.0]).unwrap();
    let mut policy = GibbsPolicy::new(2);
    let mut values = RunningAverage::new(0.0);
    values.reset(&bandit);
    let mut baseline_values = RunningAverage::new(0.0);
    baseline_values.reset(&bandit);
    let mut baseline = ZeroBaseline;
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..300 {
        policy_gradient_step(
            &mut rng,
            0.1,
            &bandit,
            &mut policy,
            &mut values,
            &mut baseline,
            &mut baseline_values,
        )
        .unwrap();
    }
    assert!(
        policy.prob(1) > 0.9,
        "prob(arm 1)={} params={:?}",
        policy.prob(1),
        policy.params()
    );
}

#[test]
fn learning_curve_improves_on_an_easy_testbed() {
    let config = ExperimentConfig {
        value_estimator: ValueEstimatorKind::Average,
        baseline: BaselineKind::Value,
        num_arms: 2,
        num_runs: 200,
        num_pulls: 100,
        arm_mean: 0.0,
        ..ExperimentConfig::default()
    };
    let (_, table) = run_to_string(config);
    let curve = learning_curve(&table);
    assert_eq!(curve.len(), 100);

    let early: f64 = curve[..10].iter().map(|s| s.mean).sum::<f64>() / 10.0;
    let late: f64 = curve[90..].iter().map(|s| s.mean).sum::<f64>() / 10.0;
    assert!(late > early, "early={early} late={late}");
}

#[test]
fn summary_agrees_with_the_curve_mean() {
    let (_, table) = run_to_string(tiny_config());
    let point = summary(&table);
    let curve = learning_curve(&table);
    let curve_mean: f64 = curve.iter().map(|s| s.mean).sum::<f64>() / curve.len() as f64;
    // Mean of per-run means equals mean of per-pull means on a rectangular
    // table; the standard errors differ.
    assert!((point.mean - curve_mean).abs() < 1e-9);
}
