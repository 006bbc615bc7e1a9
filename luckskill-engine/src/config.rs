//! Engine execution settings.
use rayon::{ThreadPool, ThreadPoolBuilder};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SEED;
use crate::error::EngineError;

/// How the independent trials of one call are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Execution {
    /// Run every trial on the calling thread.
    Sequential,
    /// Fan trials out over rayon; `threads` selects a dedicated pool,
    /// `None` uses the global one.
    Parallel {
        #[serde(default)]
        threads: Option<usize>,
    },
}

impl Default for Execution {
    fn default() -> Self {
        Self::Parallel { threads: None }
    }
}

/// Settings shared by every engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base seed every per-trial stream is derived from.
    #[serde(default = "EngineConfig::default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub execution: Execution,
}

impl EngineConfig {
    const fn default_seed() -> u64 {
        DEFAULT_SEED
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn sequential(mut self) -> Self {
        self.execution = Execution::Sequential;
        self
    }

    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.execution = Execution::Parallel {
            threads: Some(threads),
        };
        self
    }

    /// Resolve the execution strategy into a runner. A dedicated pool is
    /// built here, once, and shared by every trial set run through it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for a thread count of zero and `ThreadPool`
    /// when rayon cannot start the workers.
    pub(crate) fn runner(&self) -> Result<TrialRunner, EngineError> {
        match self.execution {
            Execution::Sequential => Ok(TrialRunner::Sequential),
            Execution::Parallel { threads: None } => Ok(TrialRunner::Global),
            Execution::Parallel { threads: Some(0) } => {
                Err(EngineError::range("threads", "must be at least 1"))
            }
            Execution::Parallel {
                threads: Some(threads),
            } => {
                log::debug!("building worker pool with {threads} threads");
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map(TrialRunner::Pool)
                    .map_err(|err| EngineError::ThreadPool(err.to_string()))
            }
        }
    }
}

/// Schedule resolved from an [`EngineConfig`].
pub(crate) enum TrialRunner {
    Sequential,
    Global,
    Pool(ThreadPool),
}

impl TrialRunner {
    /// Run `job` for trial indices `0..count` and collect results in index
    /// order, whatever the schedule.
    pub(crate) fn map_trials<T, F>(&self, count: usize, job: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            Self::Sequential => (0..count).map(job).collect(),
            Self::Global => (0..count).into_par_iter().map(job).collect(),
            Self::Pool(pool) => pool.install(|| (0..count).into_par_iter().map(&job).collect()),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            execution: Execution::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schedule_preserves_index_order() {
        let configs = [
            EngineConfig::default(),
            EngineConfig::default().sequential(),
            EngineConfig::default().with_threads(3),
        ];
        for config in configs {
            let runner = config.runner().unwrap();
            let squares = runner.map_trials(100, |idx| idx * idx);
            assert_eq!(squares.len(), 100);
            assert!(squares.iter().enumerate().all(|(idx, &sq)| sq == idx * idx));
        }
    }

    #[test]
    fn dedicated_pool_is_reused_across_calls() {
        let runner = EngineConfig::default().with_threads(3).runner().unwrap();
        for _ in 0..5 {
            let widths = runner.map_trials(16, |_| rayon::current_num_threads());
            assert!(widths.iter().all(|&width| width == 3));
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = EngineConfig::default().with_threads(0);
        assert!(matches!(
            config.runner(),
            Err(EngineError::InvalidRange {
                field: "threads",
                ..
            })
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        let config: EngineConfig =
            serde_json::from_str(r#"{"seed": 9, "execution": {"kind": "sequential"}}"#).unwrap();
        assert_eq!(config, EngineConfig::default().with_seed(9).sequential());
    }
}
