//! Scoring simulated forecasts of monthly cafe turnover.
//!
//! Run with: cargo run --example cafe_turnover
//! Set RUST_LOG=pathcast=debug to see simulation and scoring events.

use pathcast::ensemble::{EnsembleCombiner, EnsembleConfig, EnsembleMember, Share};
use pathcast::quantile::{ProbabilityGrid, QuantileEstimator};
use pathcast::scoring::{CrpsMethod, ScoreEngine, ScoringConfig};
use pathcast::simulate::{
    simulate_all, BoxedSimulator, BootstrapConfig, GaussianRandomWalk, ResidualBootstrap,
};
use tracing_subscriber::EnvFilter;

const HORIZON: usize = 12;
const N_PATHS: usize = 1000;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pathcast=info")),
        )
        .init();

    println!("=== Cafe Turnover Example ===\n");

    // Eight years of monthly turnover with trend and yearly cycle
    let series: Vec<f64> = (0..96)
        .map(|i| {
            350.0 + 2.5 * i as f64
                + 25.0 * (i as f64 * std::f64::consts::PI / 6.0).sin()
                + 8.0 * (i as f64 * 0.7).cos()
        })
        .collect();
    let (history, held_out) = series.split_at(series.len() - HORIZON);
    println!(
        "Data: {} training months, {} held out\n",
        history.len(),
        held_out.len()
    );

    let diffs: Vec<f64> = history.windows(2).map(|w| w[1] - w[0]).collect();
    let drift = diffs.iter().sum::<f64>() / diffs.len() as f64;
    let residuals: Vec<f64> = diffs.iter().map(|d| d - drift).collect();

    let simulators: Vec<BoxedSimulator> = vec![
        Box::new(GaussianRandomWalk::from_history("naive", history, false, Some(11)).unwrap()),
        Box::new(GaussianRandomWalk::from_history("drift", history, true, Some(12)).unwrap()),
        Box::new(
            ResidualBootstrap::new(
                "block_bootstrap",
                history[history.len() - 1],
                &residuals,
                BootstrapConfig::new().with_block_size(6).with_seed(13),
            )
            .unwrap()
            .with_drift(drift),
        ),
    ];

    let mut store = simulate_all(&simulators, HORIZON, N_PATHS).unwrap();
    println!("--- Simulated Models ---");
    for name in store.models() {
        let set = store.get(name).unwrap();
        println!("  {:<16} {} paths x {} steps", name, set.len(), set.horizon());
    }

    // 1. Weighted ensemble of the trend models
    println!("\n--- Ensemble ---");
    let combiner = EnsembleCombiner::new(EnsembleConfig::new().with_name("ensemble"));
    let shares = [
        ("drift", Share::Weight(0.6)),
        ("block_bootstrap", Share::Weight(0.4)),
    ];
    let members: Vec<_> = shares
        .iter()
        .map(|&(name, share)| EnsembleMember {
            paths: store.get(name).unwrap(),
            share,
        })
        .collect();
    println!("Allocation: {:?}", combiner.allocation(&members).unwrap());
    let ensemble = combiner.combine_store(&store, &shares).unwrap();
    println!("Pooled paths: {}", ensemble.len());
    store.insert(ensemble).unwrap();

    // 2. Quantile fan for the ensemble
    println!("\n--- Ensemble Quantiles ---");
    let forecast = QuantileEstimator::new(ProbabilityGrid::from_levels(&[0.1, 0.5, 0.9]).unwrap())
        .forecast(store.get("ensemble").unwrap())
        .unwrap();
    println!("  {:>3} {:>9} {:>9} {:>9} {:>9}", "h", "q10", "q50", "q90", "actual");
    for (step, actual) in forecast.steps().iter().zip(held_out) {
        let v = step.values();
        println!(
            "  {:>3} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
            step.step() + 1,
            v[0],
            v[1],
            v[2],
            actual
        );
    }

    // 3. Evaluation against the naive baseline
    for (label, config) in [
        ("decile grid", ScoringConfig::new()),
        (
            "exact",
            ScoringConfig::new().with_crps_method(CrpsMethod::Exact),
        ),
    ] {
        println!("\n--- Evaluation ({}) ---", label);
        let report = ScoreEngine::new(config)
            .evaluate(&store, held_out, "naive")
            .unwrap();
        println!(
            "  {:<16} {:>9} {:>9} {:>9} {:>9}",
            "model", "crps", "skill%", "mae", "rmse"
        );
        for row in report.rows() {
            println!(
                "  {:<16} {:>9.3} {:>9.2} {:>9.3} {:>9.3}",
                row.model, row.crps, row.skill, row.mae, row.rmse
            );
        }
        if let Some(best) = report.best() {
            println!("Best: {}", best.model);
        }
    }

    // 4. Interval coverage of the pooled paths
    println!("\n--- 80% Interval Coverage ---");
    for name in store.models() {
        let fan = store.get(name).unwrap().to_forecast(0.8).unwrap();
        if let Some(coverage) = fan.coverage(held_out).unwrap() {
            println!("  {:<16} {:.1}%", name, coverage * 100.0);
        }
    }

    println!("\n=== Example Complete ===");
}
