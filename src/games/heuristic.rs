//! Expected-value heuristic for the lottery ladder.
//!
//! Each round is scored from the EV gap `ce = EV(risky) - safe` and the
//! choice made, then the rounds are averaged.

use super::{Choice, Scenario};
use crate::error::{Result, RiskError};
use crate::estimation::NEUTRAL_INDEX;

const EPSILON: f64 = 1e-9;

/// Score one round.
///
/// | choice | gap    | score                                    |
/// |--------|--------|------------------------------------------|
/// | risky  | >= 0   | `0.6 + 0.4 * clip(ce / safe)`            |
/// | risky  | < 0    | `1.0`                                    |
/// | safe   | >= 0   | `0.4 - 0.4 * clip(ce / EV(risky))`       |
/// | safe   | < 0    | `0.2`                                    |
pub fn round_score(choice: Choice, scenario: &Scenario) -> f64 {
    let ev_risky = scenario.risky_expected_value();
    let ce = ev_risky - scenario.safe_value;

    let score = match (choice, ce >= 0.0) {
        (Choice::Risky, true) => {
            0.6 + 0.4 * (ce / (scenario.safe_value + EPSILON)).clamp(0.0, 1.0)
        }
        (Choice::Risky, false) => 1.0,
        (Choice::Safe, true) => 0.4 - 0.4 * (ce / (ev_risky + EPSILON)).clamp(0.0, 1.0),
        (Choice::Safe, false) => 0.2,
    };
    score.clamp(0.0, 1.0)
}

/// Mean round score. Empty input is neutral; a length mismatch is an error.
pub fn heuristic_score(choices: &[Choice], scenarios: &[Scenario]) -> Result<f64> {
    if choices.is_empty() {
        return Ok(NEUTRAL_INDEX);
    }
    if choices.len() != scenarios.len() {
        return Err(RiskError::LengthMismatch {
            choices: choices.len(),
            scenarios: scenarios.len(),
        });
    }
    let total: f64 = choices
        .iter()
        .zip(scenarios)
        .map(|(choice, scenario)| round_score(*choice, scenario))
        .sum();
    Ok(total / choices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{stake_ladder, Outcome};

    fn scenario(safe: f64, low: f64, high: f64) -> Scenario {
        Scenario::new(1, safe, vec![Outcome::new(low, 0.5), Outcome::new(high, 0.5)])
    }

    #[test]
    fn test_negative_gap_scores_are_fixed() {
        for (safe, low, high) in [(3.0, 0.5, 4.5), (100.0, 0.0, 1.0), (5.0, 4.0, 5.9)] {
            let sc = scenario(safe, low, high);
            assert!(sc.ev_gap() < 0.0);
            assert_eq!(round_score(Choice::Safe, &sc), 0.2);
            assert_eq!(round_score(Choice::Risky, &sc), 1.0);
        }
    }

    #[test]
    fn test_positive_gap_scores() {
        // EV 2.5 against 2.0: gap 0.5
        let sc = scenario(2.0, 0.5, 4.5);
        let risky = round_score(Choice::Risky, &sc);
        assert!((risky - (0.6 + 0.4 * 0.25)).abs() < 1e-6);
        let safe = round_score(Choice::Safe, &sc);
        assert!((safe - (0.4 - 0.4 * 0.2)).abs() < 1e-6);
    }

    #[test]
    fn test_large_gap_is_clipped() {
        let sc = scenario(1.0, 0.0, 100.0);
        assert!((round_score(Choice::Risky, &sc) - 1.0).abs() < 1e-9);
        assert!(round_score(Choice::Safe, &sc) >= 0.0);
    }

    #[test]
    fn test_mean_over_ladder() {
        let ladder = stake_ladder();
        let all_risky = heuristic_score(&[Choice::Risky; 10], ladder).unwrap();
        let all_safe = heuristic_score(&[Choice::Safe; 10], ladder).unwrap();
        assert!(all_risky > 0.5 && all_risky <= 1.0);
        assert!(all_safe < 0.5 && all_safe >= 0.0);
    }

    #[test]
    fn test_empty_is_neutral_and_mismatch_errors() {
        assert_eq!(heuristic_score(&[], stake_ladder()).unwrap(), 0.5);
        let err = heuristic_score(&[Choice::Safe; 4], stake_ladder()).unwrap_err();
        assert!(matches!(err, RiskError::LengthMismatch { .. }));
    }
}
