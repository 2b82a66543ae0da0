//! Logistic discrete-choice likelihood of a safe/risky sequence under CRRA utility.

use super::utility::{crra_utility, expected_utility};
use crate::games::{Choice, Scenario};

/// Smallest temperature used; non-positive inputs are clamped up to it.
pub const MIN_TEMPERATURE: f64 = 1e-6;

/// Floor for a chosen-option probability before taking its log.
pub const PROBABILITY_FLOOR: f64 = 1e-9;

/// Saturation point of [`stable_sigmoid`].
const SIGMOID_CUTOFF: f64 = 20.0;

/// Logistic function that never calls `exp` outside `[-20, 20]`.
pub fn stable_sigmoid(x: f64) -> f64 {
    if x > SIGMOID_CUTOFF {
        return 1.0;
    }
    if x < -SIGMOID_CUTOFF {
        return 0.0;
    }
    1.0 / (1.0 + (-x).exp())
}

pub fn effective_temperature(temperature: f64) -> f64 {
    if temperature > MIN_TEMPERATURE {
        temperature
    } else {
        MIN_TEMPERATURE
    }
}

/// Probability that a player with curvature `rho` takes the lottery in `scenario`.
pub fn risky_probability(scenario: &Scenario, rho: f64, temperature: f64) -> f64 {
    let eu_safe = crra_utility(scenario.safe_value, rho);
    let eu_risky = expected_utility(&scenario.risky_options, rho);
    let delta = (eu_risky - eu_safe) / effective_temperature(temperature);
    stable_sigmoid(delta)
}

/// Negative log-likelihood of `choices` at `rho`.
///
/// Pairs are zipped, so a longer side is truncated; callers that need the
/// lengths to agree check before calling.
pub fn negative_log_likelihood(
    rho: f64,
    choices: &[Choice],
    scenarios: &[Scenario],
    temperature: f64,
) -> f64 {
    let ll: f64 = choices
        .iter()
        .zip(scenarios)
        .map(|(choice, scenario)| {
            let p_risky = risky_probability(scenario, rho, temperature);
            let prob_chosen = match choice {
                Choice::Risky => p_risky,
                Choice::Safe => 1.0 - p_risky,
            };
            prob_chosen.max(PROBABILITY_FLOOR).ln()
        })
        .sum();
    -ll
}
