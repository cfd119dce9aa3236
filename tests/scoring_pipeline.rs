//! End-to-end tests: simulate sample paths for several models, build an
//! ensemble, and score everything against held-out observations.

use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};
use pathcast::core::{SamplePathSet, SamplePathStore};
use pathcast::ensemble::{EnsembleCombiner, EnsembleConfig, EnsembleMember, Share};
use pathcast::quantile::{estimate, ProbabilityGrid, QuantileEstimator};
use pathcast::scoring::{
    pinball_loss, sample_crps, CrpsMethod, ScoreEngine, ScoringConfig,
};
use pathcast::simulate::{
    BootstrapConfig, GaussianRandomWalk, ResidualBootstrap, Simulator,
};
use statrs::distribution::{ContinuousCDF, Normal};

const HORIZON: usize = 12;
const N_PATHS: usize = 1000;

/// Monthly turnover-like series with a linear trend and a mild cycle.
fn turnover(i: usize) -> f64 {
    300.0 + 5.0 * i as f64 + 3.0 * (i as f64).sin()
}

fn history() -> Vec<f64> {
    (0..60).map(turnover).collect()
}

fn observations() -> Vec<f64> {
    (60..60 + HORIZON).map(turnover).collect()
}

fn forecast_months() -> Vec<DateTime<Utc>> {
    (1..=HORIZON as u32)
        .map(|m| Utc.with_ymd_and_hms(2019, m, 1, 0, 0, 0).unwrap())
        .collect()
}

fn simulated_store() -> SamplePathStore {
    let history = history();
    let diffs: Vec<f64> = history.windows(2).map(|w| w[1] - w[0]).collect();
    let drift = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let residuals: Vec<f64> = diffs.iter().map(|d| d - drift).collect();
    let last = history[history.len() - 1];

    let naive = GaussianRandomWalk::from_history("naive", &history, false, Some(1)).unwrap();
    let drift_rw = GaussianRandomWalk::from_history("drift", &history, true, Some(2)).unwrap();
    let boot = ResidualBootstrap::new(
        "bootstrap",
        last,
        &residuals,
        BootstrapConfig::new().with_block_size(3).with_seed(3),
    )
    .unwrap()
    .with_drift(drift);

    let simulators: [&dyn Simulator; 3] = [&naive, &drift_rw, &boot];
    SamplePathStore::from_sets(simulators.iter().map(|s| {
        s.simulate(HORIZON, N_PATHS)
            .unwrap()
            .with_timestamps(forecast_months())
            .unwrap()
    }))
    .unwrap()
}

#[test]
fn decile_pinball_scenario() {
    // Step 12 cross-section: 500 paths at 400, 450 at 500, 50 at 600.
    let paths: Vec<Vec<f64>> = (0..N_PATHS)
        .map(|i| {
            let last = if i < 500 {
                400.0
            } else if i < 950 {
                500.0
            } else {
                600.0
            };
            let mut path = vec![450.0; HORIZON - 1];
            path.push(last);
            path
        })
        .collect();
    let set = SamplePathSet::new("ETS", paths).unwrap();

    let quantiles = QuantileEstimator::default().estimate_step(&set, HORIZON - 1).unwrap();
    assert_eq!(quantiles.len(), 9);
    let q90 = quantiles.get(0.9).unwrap();
    assert_relative_eq!(q90, 500.0, epsilon = 1e-9);

    assert_relative_eq!(pinball_loss(q90, 450.0, 0.9).unwrap(), 10.0, epsilon = 1e-9);

    let scores = ScoreEngine::default()
        .quantile_scores(&set, &[450.0; HORIZON])
        .unwrap();
    assert_relative_eq!(scores.get(HORIZON - 1, 0.9).unwrap(), 10.0, epsilon = 1e-9);
}

#[test]
fn trend_models_beat_naive_baseline() {
    let mut store = simulated_store();
    let observations = observations();

    let combiner = EnsembleCombiner::new(EnsembleConfig::new().with_name("ensemble"));
    let ensemble = combiner
        .combine_store(
            &store,
            &[("drift", Share::Weight(0.5)), ("bootstrap", Share::Weight(0.5))],
        )
        .unwrap();
    assert_eq!(ensemble.len(), 2 * N_PATHS);
    assert_eq!(ensemble.timestamps().unwrap(), forecast_months().as_slice());
    store.insert(ensemble).unwrap();

    let report = ScoreEngine::default()
        .evaluate(&store, &observations, "naive")
        .unwrap();

    assert_eq!(report.rows().len(), 4);
    assert_eq!(report.get("naive").unwrap().skill, 0.0);
    for model in ["drift", "bootstrap", "ensemble"] {
        let row = report.get(model).unwrap();
        assert!(row.skill > 0.0, "{model} skill {} should beat naive", row.skill);
        assert!(row.crps < report.get("naive").unwrap().crps);
    }
    assert_ne!(report.best().unwrap().model, "naive");

    // Rows are sorted best first.
    for pair in report.rows().windows(2) {
        assert!(pair[0].crps <= pair[1].crps);
    }
}

#[test]
fn ensemble_re_enters_quantile_pipeline() {
    let store = simulated_store();
    let drift = store.get("drift").unwrap();
    let boot = store.get("bootstrap").unwrap();

    let ensemble = EnsembleCombiner::default()
        .combine(&[
            EnsembleMember::weighted(drift, 3.0),
            EnsembleMember::weighted(boot, 1.0),
        ])
        .unwrap();
    assert_eq!(ensemble.len(), 2 * N_PATHS);

    let forecast = QuantileEstimator::new(ProbabilityGrid::percentiles())
        .forecast(&ensemble)
        .unwrap();
    assert_eq!(forecast.horizon(), HORIZON);
    for step in forecast.steps() {
        for pair in step.values().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    // Fan chart: interval widens with the horizon for a random walk.
    let fan = ensemble.to_forecast(0.8).unwrap();
    let lower = fan.lower().unwrap();
    let upper = fan.upper().unwrap();
    assert!(upper[HORIZON - 1] - lower[HORIZON - 1] > upper[0] - lower[0]);
    assert!(fan.coverage(&observations()).unwrap().is_some());
}

#[test]
fn dense_grid_crps_approaches_exact_crps() {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let n = 2000;
    let samples: Vec<f64> = (0..n)
        .map(|i| normal.inverse_cdf((i as f64 + 0.5) / n as f64))
        .collect();
    let set = SamplePathSet::new("normal", samples.iter().map(|&v| vec![v]).collect()).unwrap();
    let y = 0.3;

    let exact = ScoreEngine::new(ScoringConfig::new().with_crps_method(CrpsMethod::Exact))
        .crps(&set, 0, y)
        .unwrap();
    assert_relative_eq!(exact, sample_crps(&samples, y).unwrap(), epsilon = 1e-12);

    let dense = ScoreEngine::new(ScoringConfig::new().with_grid(ProbabilityGrid::uniform(999).unwrap()))
        .crps(&set, 0, y)
        .unwrap();
    let coarse = ScoreEngine::default().crps(&set, 0, y).unwrap();

    assert_relative_eq!(dense, exact, max_relative = 0.01);
    assert!((dense - exact).abs() < (coarse - exact).abs());
}

#[test]
fn estimate_matches_engine_grid() {
    let store = simulated_store();
    let naive = store.get("naive").unwrap();
    let levels = ProbabilityGrid::deciles();

    let via_fn = estimate(naive, 5, levels.levels()).unwrap();
    let via_estimator = QuantileEstimator::default().estimate_step(naive, 5).unwrap();
    assert_eq!(via_fn, via_estimator);
}
