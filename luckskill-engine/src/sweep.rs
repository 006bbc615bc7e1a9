//! Sensitivity of the luck-impact metric to the luck weight.
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::constants::{CONFIDENCE_LEVEL, MIN_INTERVAL_SAMPLES, SWEEP_DIVISIONS, SWEEP_POINTS};
use crate::error::EngineError;
use crate::params::SweepParams;
use crate::seed::StreamScope;
use crate::stats::student_t_interval;
use crate::trials::run_trials_scoped;

/// Mean luck impact at one weight with its 95% confidence bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub weight: f64,
    pub mean_impact: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Evenly spaced luck weights `0.00, 0.05, ..., 1.00`.
#[must_use]
pub fn sweep_weights() -> [f64; SWEEP_POINTS] {
    let mut weights = [0.0; SWEEP_POINTS];
    for (step, weight) in (0u32..).zip(weights.iter_mut()) {
        *weight = f64::from(step) / f64::from(SWEEP_DIVISIONS);
    }
    weights
}

/// Run a full trial set at every sweep weight and bound its mean impact.
///
/// Each weight draws from its own stream scope, so points are statistically
/// independent of each other and of a plain `run_trials` call.
///
/// # Errors
///
/// Returns `InsufficientSamples` when fewer than two simulations are
/// requested, `InvalidRange` for invalid parameters, and any scheduling
/// error. No points are returned on failure.
pub fn sweep_luck_weight(
    params: &SweepParams,
    config: &EngineConfig,
) -> Result<Vec<SweepPoint>, EngineError> {
    if params.num_simulations < MIN_INTERVAL_SAMPLES {
        return Err(EngineError::InsufficientSamples {
            required: MIN_INTERVAL_SAMPLES,
            actual: params.num_simulations,
        });
    }
    params.validate()?;
    log::debug!(
        "sweeping {SWEEP_POINTS} luck weights with {} trials each",
        params.num_simulations
    );

    let runner = config.runner()?;
    (0u32..)
        .zip(sweep_weights())
        .map(|(index, weight)| {
            let trial_params = params.at_weight(weight);
            let series = run_trials_scoped(
                &trial_params,
                config.seed,
                &runner,
                StreamScope::SweepPoint(index),
            )?;
            let interval = student_t_interval(&series.luck_impact, CONFIDENCE_LEVEL)?;
            log::trace!(
                "weight {weight:.2}: mean impact {:.4} [{:.4}, {:.4}]",
                interval.mean,
                interval.lower,
                interval.upper
            );
            Ok(SweepPoint {
                weight,
                mean_impact: interval.mean,
                lower_bound: interval.lower,
                upper_bound: interval.upper,
            })
        })
        .collect()
}
