//! End-to-end checks of the scoring contract through the public API.

use std::sync::Arc;

use riskgauge::estimation::{index_from_rho, EstimatorSettings, RiskIndexMapper, NEUTRAL_INDEX};
use riskgauge::games::heuristic::round_score;
use riskgauge::games::{stake_ladder, GameDefaults, GameRequest, LotteryStrategy, ScoreDispatcher};
use riskgauge::monitoring::MemorySink;
use riskgauge::{Choice, Estimator, RiskError};

use Choice::{Risky, Safe};

fn quiet() -> Arc<MemorySink> {
    Arc::new(MemorySink::new())
}

fn dispatcher(strategy: LotteryStrategy) -> ScoreDispatcher {
    ScoreDispatcher::new(
        GameDefaults::default(),
        EstimatorSettings::default(),
        strategy,
        quiet(),
    )
}

fn score_json(raw: &str) -> f64 {
    let request = GameRequest::from_json(raw).unwrap();
    dispatcher(LotteryStrategy::default()).score(&request).unwrap()
}

// ── Closed-form games ────────────────────────────────────────────────

#[test]
fn single_game() {
    assert_eq!(score_json(r#"{"game":"single","choice":"risky"}"#), 1.0);
    assert_eq!(score_json(r#"{"game":"single","choice":"safe"}"#), 0.0);
}

#[test]
fn switch_point_game() {
    assert_eq!(
        score_json(r#"{"game":"multiple","choices":["risky","risky","safe","safe"]}"#),
        0.5
    );
    assert_eq!(
        score_json(r#"{"game":"multiple","choices":["risky","risky","risky","risky"]}"#),
        1.0
    );
    assert_eq!(score_json(r#"{"game":"multiple","choices":[]}"#), 0.0);
}

#[test]
fn slider_game() {
    assert_eq!(score_json(r#"{"game":"slider","certainty":0}"#), 1.0);
    assert_eq!(score_json(r#"{"game":"slider","certainty":100}"#), 0.0);
    assert_eq!(score_json(r#"{"game":"slider","certainty":150}"#), 0.0);
}

#[test]
fn balloon_game() {
    let s = score_json(r#"{"game":"balloon","pumps":19,"popped":false}"#);
    assert!((s - 0.95).abs() < 1e-12);
    assert_eq!(score_json(r#"{"game":"balloon","pumps":25,"popped":true}"#), 1.0);
}

#[test]
fn budget_game() {
    let s = score_json(r#"{"game":"budget","risky_tokens":30,"total":100}"#);
    assert!((s - 0.3).abs() < 1e-12);
}

#[test]
fn unknown_game_is_rejected() {
    let err = GameRequest::from_json(r#"{"game":"roulette"}"#).unwrap_err();
    assert!(matches!(err, RiskError::UnknownGame(_)));
    assert!(err.is_input_error());
}

// ── Estimation ───────────────────────────────────────────────────────

#[test]
fn rho_hat_stays_in_bounds() {
    let patterns: Vec<Vec<Choice>> = vec![
        vec![Safe; 10],
        vec![Risky; 10],
        vec![Risky, Safe, Risky, Safe, Risky, Safe, Risky, Safe, Risky, Safe],
        vec![Safe, Risky, Safe, Risky, Safe, Risky, Safe, Risky, Safe, Risky],
    ];
    for bounds in [(-4.0, 4.0), (-1.0, 0.5), (0.5, 3.0), (-2.0, -1.5)] {
        let settings = EstimatorSettings {
            rho_bounds: bounds,
            ..Default::default()
        };
        let estimator = Estimator::new(settings, quiet());
        for choices in &patterns {
            let r = estimator.fit(choices, stake_ladder()).unwrap();
            assert!(
                r.rho_hat >= bounds.0 && r.rho_hat <= bounds.1,
                "rho_hat {} escaped {:?}",
                r.rho_hat,
                bounds
            );
        }
    }
}

#[test]
fn estimation_is_deterministic() {
    let choices = vec![Risky, Risky, Safe, Risky, Safe, Safe, Risky, Safe, Safe, Safe];
    let estimator = Estimator::new(EstimatorSettings::default(), quiet());
    let first = estimator.fit(&choices, stake_ladder()).unwrap();
    for _ in 0..5 {
        let again = estimator.fit(&choices, stake_ladder()).unwrap();
        assert_eq!(again.rho_hat, first.rho_hat);
    }
}

#[test]
fn monotonic_consistency() {
    let estimator = Estimator::new(EstimatorSettings::default(), quiet());
    let mapper = RiskIndexMapper::new(EstimatorSettings::default(), quiet());

    let safe = estimator.fit(&[Safe; 10], stake_ladder()).unwrap();
    assert!(safe.rho_hat > 0.0);
    assert!(mapper.index(&[Safe; 10], stake_ladder()) < 0.5);

    let risky = estimator.fit(&[Risky; 10], stake_ladder()).unwrap();
    assert!(risky.rho_hat < 0.0);
    assert!(mapper.index(&[Risky; 10], stake_ladder()) > 0.5);

    // Odd rungs favour the lottery by EV, even rungs the sure amount
    let ev_maximizer = [Risky, Safe, Risky, Safe, Risky, Safe, Risky, Safe, Risky, Safe];
    let index = mapper.index(&ev_maximizer, stake_ladder());
    assert!((index - 0.5).abs() < 0.1, "index = {}", index);
}

#[test]
fn index_matches_fitted_rho() {
    let choices = [Risky, Risky, Safe, Safe, Safe, Safe, Safe, Safe, Safe, Safe];
    let estimator = Estimator::new(EstimatorSettings::default(), quiet());
    let mapper = RiskIndexMapper::new(EstimatorSettings::default(), quiet());
    let rho = estimator.fit(&choices, stake_ladder()).unwrap().rho_hat;
    let index = mapper.index(&choices, stake_ladder());
    assert!((index - index_from_rho(rho)).abs() < 1e-12);
}

#[test]
fn empty_index_is_exactly_neutral() {
    let mapper = RiskIndexMapper::new(EstimatorSettings::default(), quiet());
    assert_eq!(mapper.index(&[], stake_ladder()), NEUTRAL_INDEX);
    assert_eq!(NEUTRAL_INDEX, 0.5);
}

// ── Lottery strategies ───────────────────────────────────────────────

#[test]
fn heuristic_negative_gap_rounds_are_fixed() {
    for scenario in stake_ladder().iter().filter(|sc| sc.ev_gap() < 0.0) {
        assert_eq!(round_score(Safe, scenario), 0.2);
        assert_eq!(round_score(Risky, scenario), 1.0);
    }
}

#[test]
fn mismatched_lottery_input_is_a_contract_error() {
    for strategy in [
        LotteryStrategy::MaximumLikelihood,
        LotteryStrategy::ExpectedValueHeuristic,
    ] {
        let request = GameRequest::Risk {
            choices: vec![Risky, Safe],
            strategy: Some(strategy),
        };
        let err = dispatcher(strategy).score(&request).unwrap_err();
        assert!(matches!(
            err,
            RiskError::LengthMismatch {
                choices: 2,
                scenarios: 10
            }
        ));
    }

    let estimator = Estimator::new(EstimatorSettings::default(), quiet());
    let err = estimator.fit(&[Risky, Safe], stake_ladder()).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn lottery_scores_are_in_range() {
    let choices = vec![Risky, Safe, Safe, Risky, Risky, Safe, Risky, Safe, Safe, Risky];
    for strategy in [
        LotteryStrategy::MaximumLikelihood,
        LotteryStrategy::ExpectedValueHeuristic,
        LotteryStrategy::SwitchPoint,
    ] {
        let s = dispatcher(strategy)
            .score(&GameRequest::Risk {
                choices: choices.clone(),
                strategy: None,
            })
            .unwrap();
        assert!(s.is_finite() && (0.0..=1.0).contains(&s), "{}: {}", strategy, s);
    }
}
