//! CRRA utility and expected utility of a lottery.

use crate::games::Outcome;

/// Floor applied to payoffs so the utility stays defined at and below zero.
pub const PAYOFF_FLOOR: f64 = 1e-9;

/// Constant-relative-risk-aversion utility.
///
/// `u(x) = x^(1-rho) / (1-rho)` for `rho != 1`, and `ln(x)` at `rho == 1`.
pub fn crra_utility(payoff: f64, rho: f64) -> f64 {
    let x = payoff.max(PAYOFF_FLOOR);
    if rho == 1.0 {
        return x.ln();
    }
    x.powf(1.0 - rho) / (1.0 - rho)
}

/// Probability-weighted utility of a lottery; missing probabilities are `1/n`.
pub fn expected_utility(lottery: &[Outcome], rho: f64) -> f64 {
    let n = lottery.len();
    lottery
        .iter()
        .map(|o| crra_utility(o.payoff, rho) * o.weight(n))
        .sum()
}
