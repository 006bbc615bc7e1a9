//! Error taxonomy for engine operations.
use thiserror::Error;

/// Errors raised when simulation inputs violate the engine's contract.
///
/// Every variant is deterministic given the inputs; there is no I/O and
/// therefore nothing to retry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },
    #[error("{field} out of range: {reason}")]
    InvalidRange { field: &'static str, reason: String },
    #[error("at least {required} simulations are required for a confidence interval (got {actual})")]
    InsufficientSamples { required: usize, actual: usize },
    #[error("distribution unavailable: {0}")]
    Distribution(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
    #[error("failed to parse simulation parameters: {0}")]
    Params(String),
}

impl EngineError {
    pub(crate) fn range(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRange {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = EngineError::InvalidParameter {
            name: "distribution",
            value: "gaussian".to_string(),
        };
        assert_eq!(err.to_string(), "invalid distribution: \"gaussian\"");

        let err = EngineError::range("luck_weight", "must be within [0, 1] (got 1.5)");
        assert!(err.to_string().starts_with("luck_weight out of range"));

        let err = EngineError::InsufficientSamples {
            required: 2,
            actual: 1,
        };
        assert!(err.to_string().contains("got 1"));
    }
}
