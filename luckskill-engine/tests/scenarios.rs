use luckskill_engine::{
    EngineConfig, EngineError, ScoreDistribution, SimulationEngine, SweepParams, TrialParams,
    load_params, sweep_luck_weight,
};

fn uniform(num_applicants: usize, num_selected: usize, luck_weight: f64) -> TrialParams {
    TrialParams::new(
        num_applicants,
        num_selected,
        luck_weight,
        50,
        ScoreDistribution::Uniform,
    )
    .unwrap()
}

#[test]
fn series_are_bounded_for_many_parameter_sets() {
    let engine = SimulationEngine::new(EngineConfig::default().with_seed(3));
    let distributions = [
        ScoreDistribution::Uniform,
        ScoreDistribution::normal(85.0, 10.0).unwrap(),
        ScoreDistribution::normal(20.0, 60.0).unwrap(),
    ];
    for distribution in distributions {
        for (applicants, selected) in [(1, 1), (7, 3), (250, 25), (300, 300)] {
            for weight in [0.0, 0.05, 0.5, 1.0] {
                let params =
                    TrialParams::new(applicants, selected, weight, 12, distribution).unwrap();
                let series = engine.run_trials(&params).unwrap();
                assert_eq!(series.len(), 12);
                assert_eq!(series.luck_scores.len(), 12);
                assert_eq!(series.top_skill_overlap.len(), 12);
                for idx in 0..series.len() {
                    let impact = series.luck_impact[idx];
                    assert!((0.0..=1.0).contains(&impact));
                    assert!(series.top_skill_overlap[idx] <= selected);
                    assert!((0.0..=100.0).contains(&series.luck_scores[idx]));
                }
            }
        }
    }
}

#[test]
fn zero_luck_weight_reproduces_skill_ranking() {
    let series = run(uniform(100, 10, 0.0));
    assert!(series.luck_impact.iter().all(|&impact| impact == 0.0));
}

#[test]
fn selecting_every_applicant_has_no_luck_impact() {
    for weight in [0.0, 0.35, 1.0] {
        let series = run(uniform(100, 100, weight));
        assert!(series.luck_impact.iter().all(|&impact| impact == 0.0));
        assert!(series.top_skill_overlap.iter().all(|&shared| shared == 100));
    }
}

#[test]
fn unknown_distribution_is_invalid_parameter() {
    let err = ScoreDistribution::from_name("gaussian", Some(50.0), Some(10.0)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter { .. }));

    let err = load_params(r#"{"distribution": {"name": "gaussian"}}"#).unwrap_err();
    assert!(matches!(err, EngineError::InvalidParameter { .. }));
}

#[test]
fn sweep_has_twenty_one_bracketed_points() {
    let params = SweepParams {
        num_applicants: 80,
        num_selected: 8,
        num_simulations: 15,
        distribution: ScoreDistribution::Uniform,
    };
    let points = sweep_luck_weight(&params, &EngineConfig::default()).unwrap();
    assert_eq!(points.len(), 21);
    for (idx, point) in points.iter().enumerate() {
        let expected = f64::from(u32::try_from(idx).unwrap()) * 0.05;
        assert!((point.weight - expected).abs() < 1e-9);
        assert!(point.lower_bound <= point.mean_impact);
        assert!(point.mean_impact <= point.upper_bound);
    }
    assert!(points[20].mean_impact > points[0].mean_impact);
}

#[test]
fn sweep_is_reproducible_for_a_seed() {
    let params = uniform(120, 12, 0.5).sweep();
    let config = EngineConfig::default().with_seed(11);
    let first = sweep_luck_weight(&params, &config).unwrap();
    let second = sweep_luck_weight(&params, &config.sequential()).unwrap();
    assert_eq!(first, second);
}

fn run(params: TrialParams) -> luckskill_engine::TrialSeries {
    SimulationEngine::default().run_trials(&params).unwrap()
}
