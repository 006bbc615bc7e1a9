use anyhow::{Context, Result};
use luckskill_engine::{DistributionSpec, TrialParams, TrialParamsDocument};
use std::fs;
use std::path::Path;

/// Parameter values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamOverrides {
    pub applicants: Option<usize>,
    pub selected: Option<usize>,
    pub luck_weight: Option<f64>,
    pub simulations: Option<usize>,
    pub distribution: Option<String>,
    pub loc: Option<f64>,
    pub scale: Option<f64>,
}

/// Read a JSON parameter document; absent fields keep their defaults.
pub fn read_params_file(path: &Path) -> Result<TrialParamsDocument> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Resolve the effective parameters: explicit flag, then parameter file,
/// then built-in default. Validation happens once, on the merged result.
pub fn resolve_params(file: Option<&Path>, overrides: &ParamOverrides) -> Result<TrialParams> {
    let mut doc = match file {
        Some(path) => read_params_file(path)?,
        None => TrialParamsDocument::default(),
    };
    apply_overrides(&mut doc, overrides);
    log::debug!("resolved parameter document: {doc:?}");
    TrialParams::try_from(doc).context("invalid simulation parameters")
}

fn apply_overrides(doc: &mut TrialParamsDocument, overrides: &ParamOverrides) {
    if let Some(applicants) = overrides.applicants {
        doc.num_applicants = applicants;
    }
    if let Some(selected) = overrides.selected {
        doc.num_selected = selected;
    }
    if let Some(luck_weight) = overrides.luck_weight {
        doc.luck_weight = luck_weight;
    }
    if let Some(simulations) = overrides.simulations {
        doc.num_simulations = simulations;
    }

    let DistributionSpec { name, loc, scale } = doc.distribution.clone();
    doc.distribution = DistributionSpec {
        name: overrides.distribution.clone().unwrap_or(name),
        loc: overrides.loc.or(loc),
        scale: overrides.scale.or(scale),
    }
    .with_normal_defaults();
}

#[cfg(test)]
mod tests {
    use super::*;
    use luckskill_engine::constants::{DEFAULT_NORMAL_LOC, DEFAULT_NORMAL_SCALE};
    use luckskill_engine::{EngineError, ScoreDistribution};

    fn temp_file(label: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "luckskill-params-{label}-{}.json",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let params = resolve_params(None, &ParamOverrides::default()).unwrap();
        assert_eq!(params, TrialParams::default());
    }

    #[test]
    fn flags_override_file_values() {
        let path = temp_file(
            "override",
            r#"{"num_applicants": 500, "num_selected": 50, "luck_weight": 0.2,
                "distribution": {"name": "normal", "loc": 70, "scale": 5}}"#,
        );
        let overrides = ParamOverrides {
            selected: Some(25),
            scale: Some(12.0),
            ..ParamOverrides::default()
        };
        let params = resolve_params(Some(&path), &overrides).unwrap();
        assert_eq!(params.num_applicants, 500);
        assert_eq!(params.num_selected, 25);
        assert!((params.luck_weight - 0.2).abs() < f64::EPSILON);
        assert_eq!(
            params.distribution,
            ScoreDistribution::Normal {
                loc: 70.0,
                scale: 12.0
            }
        );
    }

    #[test]
    fn normal_without_loc_or_scale_uses_defaults() {
        let overrides = ParamOverrides {
            distribution: Some("normal".to_string()),
            ..ParamOverrides::default()
        };
        let params = resolve_params(None, &overrides).unwrap();
        assert_eq!(
            params.distribution,
            ScoreDistribution::Normal {
                loc: DEFAULT_NORMAL_LOC,
                scale: DEFAULT_NORMAL_SCALE
            }
        );

        let path = temp_file("normal-defaults", r#"{"distribution": {"name": "normal", "loc": 60}}"#);
        let params = resolve_params(Some(&path), &ParamOverrides::default()).unwrap();
        assert_eq!(
            params.distribution,
            ScoreDistribution::Normal {
                loc: 60.0,
                scale: DEFAULT_NORMAL_SCALE
            }
        );
    }

    #[test]
    fn unknown_distribution_surfaces_engine_error() {
        let overrides = ParamOverrides {
            distribution: Some("gaussian".to_string()),
            ..ParamOverrides::default()
        };
        let err = resolve_params(None, &overrides).unwrap_err();
        let engine_err = err.downcast_ref::<EngineError>().expect("engine error");
        assert!(matches!(engine_err, EngineError::InvalidParameter { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/nonexistent/luckskill-params.json");
        let err = resolve_params(Some(path), &ParamOverrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("luckskill-params.json"));
    }
}
