//! Score distributions used to generate applicant attributes.
use rand::Rng;
use rand::distributions::Distribution as _;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::fmt;

use crate::constants::{DEFAULT_NORMAL_LOC, DEFAULT_NORMAL_SCALE, SCORE_MAX, SCORE_MIN};
use crate::error::EngineError;
use crate::numbers::truncate_score;

/// Distribution that skill and luck scores are drawn from.
///
/// Validated once at the boundary so the per-applicant loop never branches
/// on a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DistributionSpec", into = "DistributionSpec")]
pub enum ScoreDistribution {
    /// Integers 0..=100, each equally likely.
    #[default]
    Uniform,
    /// Gaussian draws clamped to [0, 100] and truncated toward zero.
    Normal { loc: f64, scale: f64 },
}

/// Name-keyed form used by parameter files and command-line input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl ScoreDistribution {
    /// Resolve a distribution by name. `loc` and `scale` are ignored for
    /// `uniform` and required for `normal`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for an unknown name or a missing normal
    /// parameter, and `InvalidRange` for a non-finite `loc` or a
    /// non-positive `scale`.
    pub fn from_name(
        name: &str,
        loc: Option<f64>,
        scale: Option<f64>,
    ) -> Result<Self, EngineError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "normal" => {
                let loc = loc.ok_or_else(|| missing("loc"))?;
                let scale = scale.ok_or_else(|| missing("scale"))?;
                Self::normal(loc, scale)
            }
            _ => Err(EngineError::InvalidParameter {
                name: "distribution",
                value: name.to_string(),
            }),
        }
    }

    /// Gaussian distribution with the given mean and standard deviation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `loc` is not finite or `scale` is not a
    /// positive finite number.
    pub fn normal(loc: f64, scale: f64) -> Result<Self, EngineError> {
        let distribution = Self::Normal { loc, scale };
        distribution.validate()?;
        Ok(distribution)
    }

    /// Check the numeric parameters of an already-constructed value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ScoreDistribution::normal`].
    pub fn validate(&self) -> Result<(), EngineError> {
        if let Self::Normal { loc, scale } = *self {
            if !loc.is_finite() {
                return Err(EngineError::range("loc", format!("must be finite (got {loc})")));
            }
            if !scale.is_finite() || scale <= 0.0 {
                return Err(EngineError::range(
                    "scale",
                    format!("must be a positive number (got {scale})"),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Normal { .. } => "normal",
        }
    }

    /// Build the sampler used inside a trial.
    ///
    /// # Errors
    ///
    /// Returns `Distribution` if the Gaussian cannot be constructed.
    pub fn sampler(&self) -> Result<ScoreSampler, EngineError> {
        match *self {
            Self::Uniform => Ok(ScoreSampler::Uniform),
            Self::Normal { loc, scale } => Normal::new(loc, scale)
                .map(ScoreSampler::Normal)
                .map_err(|err| EngineError::Distribution(err.to_string())),
        }
    }
}

impl fmt::Display for ScoreDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Normal { loc, scale } => write!(f, "normal(loc={loc}, scale={scale})"),
        }
    }
}

impl DistributionSpec {
    /// Whether the name resolves to the Gaussian, using the same matching
    /// rules as [`ScoreDistribution::from_name`].
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.name.trim().eq_ignore_ascii_case("normal")
    }

    /// Fill an absent `loc` or `scale` of a normal spec with the defaults.
    /// Other names pass through untouched.
    #[must_use]
    pub fn with_normal_defaults(self) -> Self {
        if !self.is_normal() {
            return self;
        }
        Self {
            loc: self.loc.or(Some(DEFAULT_NORMAL_LOC)),
            scale: self.scale.or(Some(DEFAULT_NORMAL_SCALE)),
            ..self
        }
    }
}

impl TryFrom<DistributionSpec> for ScoreDistribution {
    type Error = EngineError;

    fn try_from(spec: DistributionSpec) -> Result<Self, Self::Error> {
        Self::from_name(&spec.name, spec.loc, spec.scale)
    }
}

impl From<ScoreDistribution> for DistributionSpec {
    fn from(value: ScoreDistribution) -> Self {
        match value {
            ScoreDistribution::Uniform => Self {
                name: value.label().to_string(),
                loc: None,
                scale: None,
            },
            ScoreDistribution::Normal { loc, scale } => Self {
                name: value.label().to_string(),
                loc: Some(loc),
                scale: Some(scale),
            },
        }
    }
}

fn missing(name: &'static str) -> EngineError {
    EngineError::InvalidParameter {
        name,
        value: "missing (required by the normal distribution)".to_string(),
    }
}

/// Ready-to-draw form of a [`ScoreDistribution`].
#[derive(Debug, Clone)]
pub enum ScoreSampler {
    Uniform,
    Normal(Normal),
}

impl ScoreSampler {
    /// Draw one integer score in `[SCORE_MIN, SCORE_MAX]`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        match self {
            Self::Uniform => rng.gen_range(SCORE_MIN..=SCORE_MAX),
            Self::Normal(normal) => truncate_score(normal.sample(rng)),
        }
    }

    /// Fill a fresh vector with `count` independent draws.
    pub fn draw_many<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.draw(rng)).collect()
    }
}
