//! Luck-versus-skill selection engine
//!
//! Monte-Carlo estimation of how much a random attribute ("luck") changes who
//! is selected when a fixed-size cohort is picked from a large pool by a
//! weighted score. The crate is free of I/O; callers hand in parameters and
//! receive raw per-trial series or sweep records.

pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod numbers;
pub mod params;
pub mod pool;
pub mod seed;
pub mod selection;
pub mod stats;
pub mod sweep;
pub mod trials;

// Re-export commonly used types
pub use config::{EngineConfig, Execution};
pub use distribution::{DistributionSpec, ScoreDistribution, ScoreSampler};
pub use error::EngineError;
pub use params::{SweepParams, TrialParams, TrialParamsDocument, load_params};
pub use pool::ApplicantPool;
pub use seed::{StreamScope, derive_stream_seed, trial_rng};
pub use selection::{overlap, top_k, top_k_raw};
pub use stats::{ConfidenceInterval, Histogram, HistogramBin, RunningStats, Summary};
pub use sweep::{SweepPoint, sweep_luck_weight, sweep_weights};
pub use trials::{
    TrialHistograms, TrialOutcome, TrialSeries, TrialSummary, evaluate_pool, run_trial,
    run_trials,
};

/// Entry point bundling an [`EngineConfig`] with the two engine operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
}

impl SimulationEngine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the trial set described by `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the worker pool
    /// cannot be built.
    pub fn run_trials(&self, params: &TrialParams) -> Result<TrialSeries, EngineError> {
        trials::run_trials(params, &self.config)
    }

    /// Sweep the luck weight over its 21-point grid.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientSamples` below two simulations, or any error of
    /// [`SimulationEngine::run_trials`].
    pub fn sweep_luck_weight(&self, params: &SweepParams) -> Result<Vec<SweepPoint>, EngineError> {
        sweep::sweep_luck_weight(params, &self.config)
    }
}
