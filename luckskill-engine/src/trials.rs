//! Repeated selection trials at a fixed luck weight.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, TrialRunner};
use crate::distribution::ScoreSampler;
use crate::error::EngineError;
use crate::numbers::{usize_to_f64, usize_to_u64};
use crate::params::TrialParams;
use crate::pool::ApplicantPool;
use crate::seed::{StreamScope, trial_rng};
use crate::selection::{overlap, top_k, top_k_raw};
use crate::stats::{Histogram, Summary};

/// Metrics recorded for one simulated selection round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Mean luck score of the applicants selected by composite score.
    pub mean_selected_luck: f64,
    /// How many of them a skill-only ranking would also have selected.
    pub top_skill_overlap: usize,
    /// `1 - overlap / num_selected`.
    pub luck_impact: f64,
}

/// Score one pool: composite selection against the skill-only baseline.
#[must_use]
pub fn evaluate_pool(pool: &ApplicantPool, luck_weight: f64, num_selected: usize) -> TrialOutcome {
    let composite = pool.composite_scores(luck_weight);
    let selected = top_k(&composite, num_selected);
    let skill_only = top_k_raw(pool.skill(), num_selected);
    let shared = overlap(&selected, &skill_only);
    let luck_impact = if selected.is_empty() {
        0.0
    } else {
        1.0 - usize_to_f64(shared) / usize_to_f64(selected.len())
    };
    TrialOutcome {
        mean_selected_luck: pool.mean_luck(&selected),
        top_skill_overlap: shared,
        luck_impact,
    }
}

/// Generate a fresh pool from `rng` and evaluate it.
pub fn run_trial<R: Rng + ?Sized>(
    params: &TrialParams,
    sampler: &ScoreSampler,
    rng: &mut R,
) -> TrialOutcome {
    let pool = ApplicantPool::generate(sampler, params.num_applicants, rng);
    evaluate_pool(&pool, params.luck_weight, params.num_selected)
}

/// Per-trial metrics as three parallel sequences in trial order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialSeries {
    pub luck_scores: Vec<f64>,
    pub top_skill_overlap: Vec<usize>,
    pub luck_impact: Vec<f64>,
}

impl TrialSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        self.luck_impact.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.luck_impact.is_empty()
    }

    #[must_use]
    pub fn overlap_as_f64(&self) -> Vec<f64> {
        self.top_skill_overlap
            .iter()
            .map(|&count| usize_to_f64(count))
            .collect()
    }

    /// Aggregate view of the three series; `None` when no trial ran.
    #[must_use]
    pub fn summary(&self) -> Option<TrialSummary> {
        Some(TrialSummary {
            luck_score: Summary::from_values(&self.luck_scores)?,
            top_skill_overlap: Summary::from_values(&self.overlap_as_f64())?,
            luck_impact: Summary::from_values(&self.luck_impact)?,
        })
    }

    #[must_use]
    pub fn histograms(&self, bins: usize) -> TrialHistograms {
        TrialHistograms {
            luck_score: Histogram::from_values(&self.luck_scores, bins),
            top_skill_overlap: Histogram::from_values(&self.overlap_as_f64(), bins),
            luck_impact: Histogram::from_values(&self.luck_impact, bins),
        }
    }
}

impl FromIterator<TrialOutcome> for TrialSeries {
    fn from_iter<I: IntoIterator<Item = TrialOutcome>>(iter: I) -> Self {
        let mut series = Self::default();
        for outcome in iter {
            series.luck_scores.push(outcome.mean_selected_luck);
            series.top_skill_overlap.push(outcome.top_skill_overlap);
            series.luck_impact.push(outcome.luck_impact);
        }
        series
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialSummary {
    pub luck_score: Summary,
    pub top_skill_overlap: Summary,
    pub luck_impact: Summary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialHistograms {
    pub luck_score: Histogram,
    pub top_skill_overlap: Histogram,
    pub luck_impact: Histogram,
}

/// Run `num_simulations` independent trials.
///
/// # Errors
///
/// Returns `InvalidRange` when the parameters fail validation, and the
/// scheduling errors of the configured execution strategy.
pub fn run_trials(params: &TrialParams, config: &EngineConfig) -> Result<TrialSeries, EngineError> {
    params.validate()?;
    let runner = config.runner()?;
    run_trials_scoped(params, config.seed, &runner, StreamScope::Trials)
}

pub(crate) fn run_trials_scoped(
    params: &TrialParams,
    base_seed: u64,
    runner: &TrialRunner,
    scope: StreamScope,
) -> Result<TrialSeries, EngineError> {
    log::debug!(
        "running {} trials: applicants={} selected={} luck_weight={:.2} distribution={} scope={scope:?}",
        params.num_simulations,
        params.num_applicants,
        params.num_selected,
        params.luck_weight,
        params.distribution,
    );
    let sampler = params.distribution.sampler()?;
    let outcomes = runner.map_trials(params.num_simulations, |trial| {
        let mut rng = trial_rng(base_seed, scope, usize_to_u64(trial));
        run_trial(params, &sampler, &mut rng)
    });
    Ok(outcomes.into_iter().collect())
}
