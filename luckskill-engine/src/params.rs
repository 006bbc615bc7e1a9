//! Simulation parameters and their validation.
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::constants::{
    DEFAULT_LUCK_WEIGHT, DEFAULT_NUM_APPLICANTS, DEFAULT_NUM_SELECTED, DEFAULT_NUM_SIMULATIONS,
};
use crate::distribution::{DistributionSpec, ScoreDistribution};
use crate::error::EngineError;

/// Inputs of one trial set at a fixed luck weight.
///
/// Deserialization goes through [`TrialParamsDocument`], so a decoded value
/// has already passed [`TrialParams::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrialParamsDocument")]
pub struct TrialParams {
    pub num_applicants: usize,
    pub num_selected: usize,
    pub luck_weight: f64,
    pub num_simulations: usize,
    pub distribution: ScoreDistribution,
}

/// Raw parameter document as written in a JSON file; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialParamsDocument {
    #[serde(default = "TrialParamsDocument::default_num_applicants")]
    pub num_applicants: usize,
    #[serde(default = "TrialParamsDocument::default_num_selected")]
    pub num_selected: usize,
    #[serde(default = "TrialParamsDocument::default_luck_weight")]
    pub luck_weight: f64,
    #[serde(default = "TrialParamsDocument::default_num_simulations")]
    pub num_simulations: usize,
    #[serde(default = "TrialParamsDocument::default_distribution")]
    pub distribution: DistributionSpec,
}

impl TrialParamsDocument {
    const fn default_num_applicants() -> usize {
        DEFAULT_NUM_APPLICANTS
    }

    const fn default_num_selected() -> usize {
        DEFAULT_NUM_SELECTED
    }

    const fn default_luck_weight() -> f64 {
        DEFAULT_LUCK_WEIGHT
    }

    const fn default_num_simulations() -> usize {
        DEFAULT_NUM_SIMULATIONS
    }

    fn default_distribution() -> DistributionSpec {
        ScoreDistribution::default().into()
    }
}

impl Default for TrialParamsDocument {
    fn default() -> Self {
        TrialParams::default().into()
    }
}

impl From<TrialParams> for TrialParamsDocument {
    fn from(params: TrialParams) -> Self {
        Self {
            num_applicants: params.num_applicants,
            num_selected: params.num_selected,
            luck_weight: params.luck_weight,
            num_simulations: params.num_simulations,
            distribution: params.distribution.into(),
        }
    }
}

impl TryFrom<TrialParamsDocument> for TrialParams {
    type Error = EngineError;

    fn try_from(doc: TrialParamsDocument) -> Result<Self, Self::Error> {
        let distribution = ScoreDistribution::try_from(doc.distribution)?;
        Self::new(
            doc.num_applicants,
            doc.num_selected,
            doc.luck_weight,
            doc.num_simulations,
            distribution,
        )
    }
}

impl TrialParams {
    /// Construct and validate a parameter set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when any bound in [`TrialParams::validate`] is
    /// violated.
    pub fn new(
        num_applicants: usize,
        num_selected: usize,
        luck_weight: f64,
        num_simulations: usize,
        distribution: ScoreDistribution,
    ) -> Result<Self, EngineError> {
        let params = Self {
            num_applicants,
            num_selected,
            luck_weight,
            num_simulations,
            distribution,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check every range constraint without clamping.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for an empty pool, an empty or oversized
    /// cohort, zero simulations, a luck weight outside `[0, 1]`, or invalid
    /// normal-distribution parameters.
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_luck_weight(self.luck_weight)?;
        self.sweep().validate()
    }

    /// Drop the luck weight, keeping everything the sweep varies over.
    #[must_use]
    pub fn sweep(&self) -> SweepParams {
        SweepParams {
            num_applicants: self.num_applicants,
            num_selected: self.num_selected,
            num_simulations: self.num_simulations,
            distribution: self.distribution,
        }
    }

    #[must_use]
    pub fn skill_weight(&self) -> f64 {
        1.0 - self.luck_weight
    }

    /// Stable hash of the canonical JSON encoding, usable as a cache key.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        XxHash64::oneshot(0, &canonical)
    }
}

impl Default for TrialParams {
    fn default() -> Self {
        Self {
            num_applicants: DEFAULT_NUM_APPLICANTS,
            num_selected: DEFAULT_NUM_SELECTED,
            luck_weight: DEFAULT_LUCK_WEIGHT,
            num_simulations: DEFAULT_NUM_SIMULATIONS,
            distribution: ScoreDistribution::default(),
        }
    }
}

/// Inputs of a luck-weight sweep; the weight itself comes from the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParams {
    pub num_applicants: usize,
    pub num_selected: usize,
    pub num_simulations: usize,
    pub distribution: ScoreDistribution,
}

impl SweepParams {
    /// Check the ranges shared with [`TrialParams`].
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` for the same conditions as
    /// [`TrialParams::validate`], except the luck weight.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.num_applicants == 0 {
            return Err(EngineError::range("num_applicants", "must be at least 1"));
        }
        if self.num_selected == 0 {
            return Err(EngineError::range("num_selected", "must be at least 1"));
        }
        if self.num_selected > self.num_applicants {
            return Err(EngineError::range(
                "num_selected",
                format!(
                    "cannot exceed num_applicants ({} > {})",
                    self.num_selected, self.num_applicants
                ),
            ));
        }
        if self.num_simulations == 0 {
            return Err(EngineError::range("num_simulations", "must be at least 1"));
        }
        self.distribution.validate()
    }

    /// Parameters of the trial set run at one sweep weight.
    #[must_use]
    pub fn at_weight(&self, luck_weight: f64) -> TrialParams {
        TrialParams {
            num_applicants: self.num_applicants,
            num_selected: self.num_selected,
            luck_weight,
            num_simulations: self.num_simulations,
            distribution: self.distribution,
        }
    }
}

fn validate_luck_weight(luck_weight: f64) -> Result<(), EngineError> {
    if (0.0..=1.0).contains(&luck_weight) {
        Ok(())
    } else {
        Err(EngineError::range(
            "luck_weight",
            format!("must be within [0, 1] (got {luck_weight})"),
        ))
    }
}

/// Parse and validate a JSON parameter document. Missing fields take their
/// defaults.
///
/// # Errors
///
/// Returns `Params` for malformed JSON, `InvalidParameter` for an unknown
/// distribution name, and `InvalidRange` when a value violates a bound.
pub fn load_params(json: &str) -> Result<TrialParams, EngineError> {
    let doc: TrialParamsDocument =
        serde_json::from_str(json).map_err(|err| EngineError::Params(err.to_string()))?;
    TrialParams::try_from(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = TrialParams::default();
        params.validate().unwrap();
        assert!((params.skill_weight() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn rejects_out_of_range_inputs_without_clamping() {
        let uniform = ScoreDistribution::Uniform;
        let cases = [
            (TrialParams::new(0, 1, 0.5, 1, uniform), "num_applicants"),
            (TrialParams::new(10, 0, 0.5, 1, uniform), "num_selected"),
            (TrialParams::new(10, 11, 0.5, 1, uniform), "num_selected"),
            (TrialParams::new(10, 5, 0.5, 0, uniform), "num_simulations"),
            (TrialParams::new(10, 5, -0.01, 1, uniform), "luck_weight"),
            (TrialParams::new(10, 5, 1.01, 1, uniform), "luck_weight"),
            (TrialParams::new(10, 5, f64::NAN, 1, uniform), "luck_weight"),
        ];
        for (result, expected) in cases {
            match result {
                Err(EngineError::InvalidRange { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected range error on {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn accepts_boundary_values() {
        TrialParams::new(1, 1, 0.0, 1, ScoreDistribution::Uniform).unwrap();
        TrialParams::new(100, 100, 1.0, 1, ScoreDistribution::Uniform).unwrap();
    }

    #[test]
    fn load_params_fills_defaults_and_validates() {
        let params = load_params(
            r#"{"num_applicants": 200, "distribution": {"name": "normal", "loc": 85, "scale": 10}}"#,
        )
        .unwrap();
        assert_eq!(params.num_applicants, 200);
        assert_eq!(params.num_selected, DEFAULT_NUM_SELECTED);
        assert_eq!(
            params.distribution,
            ScoreDistribution::Normal {
                loc: 85.0,
                scale: 10.0
            }
        );

        let err = load_params(r#"{"num_applicants": 5, "num_selected": 6}"#).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRange { .. }));

        let err = load_params(r#"{"distribution": {"name": "gaussian"}}"#).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidParameter {
                name: "distribution",
                ..
            }
        ));

        let err = load_params("{not json").unwrap_err();
        assert!(matches!(err, EngineError::Params(_)));
    }

    #[test]
    fn deserializing_params_directly_validates() {
        let decoded = serde_json::from_str::<TrialParams>(r#"{"luck_weight": 2.0}"#);
        assert!(decoded.is_err());
        let decoded: TrialParams = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded, TrialParams::default());
    }

    #[test]
    fn sweep_projection_round_trips_weight() {
        let params = TrialParams::new(50, 5, 0.3, 4, ScoreDistribution::Uniform).unwrap();
        let sweep = params.sweep();
        assert_eq!(sweep.at_weight(0.3), params);
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let base = TrialParams::default();
        let mut changed = base.clone();
        changed.luck_weight = 0.06;
        assert_eq!(base.fingerprint(), TrialParams::default().fingerprint());
        assert_ne!(base.fingerprint(), changed.fingerprint());
    }
}
