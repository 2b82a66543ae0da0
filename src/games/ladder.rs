//! Lottery scenarios and the fixed stake ladder used by the `risk` game.
//!
//! Each rung offers a sure amount against a 50/50 lottery. Odd rungs favour
//! the lottery by expected value, even rungs favour the sure amount, so a
//! risk-neutral player alternates risky/safe and the ladder separates
//! risk-seeking from risk-averse curvature.

use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// One outcome of a lottery. A missing probability means uniform weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub payoff: f64,
    #[serde(
        default,
        deserialize_with = "floor_probability",
        skip_serializing_if = "Option::is_none"
    )]
    pub probability: Option<f64>,
}

fn floor_probability<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let p = Option::<f64>::deserialize(deserializer)?;
    Ok(p.map(|p| p.max(0.0)))
}

impl Outcome {
    pub fn new(payoff: f64, probability: f64) -> Self {
        Self {
            payoff,
            probability: Some(probability.max(0.0)),
        }
    }

    pub fn uniform(payoff: f64) -> Self {
        Self {
            payoff,
            probability: None,
        }
    }

    /// Weight of this outcome within a lottery of `n` outcomes.
    pub fn weight(&self, n: usize) -> f64 {
        match self.probability {
            Some(p) => p.max(0.0),
            None if n > 0 => 1.0 / n as f64,
            None => 0.0,
        }
    }
}

/// A sure amount offered against a lottery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub safe_value: f64,
    pub risky_options: Vec<Outcome>,
}

impl Scenario {
    pub fn new(id: u32, safe_value: f64, risky_options: Vec<Outcome>) -> Self {
        Self {
            id,
            safe_value,
            risky_options,
        }
    }

    /// Expected value of the risky lottery.
    pub fn risky_expected_value(&self) -> f64 {
        let n = self.risky_options.len();
        self.risky_options
            .iter()
            .map(|o| o.payoff * o.weight(n))
            .sum()
    }

    /// Expected-value gap of the lottery over the sure amount.
    pub fn ev_gap(&self) -> f64 {
        self.risky_expected_value() - self.safe_value
    }
}

/// (safe, low, high) per rung; the lottery is always 50/50.
const STAKES: [(f64, f64, f64); 10] = [
    (2.0, 0.5, 4.5),
    (3.0, 0.5, 4.5),
    (4.0, 1.0, 8.0),
    (5.0, 1.0, 8.0),
    (6.0, 1.5, 11.5),
    (7.0, 1.5, 11.5),
    (8.0, 2.0, 15.0),
    (9.0, 2.0, 15.0),
    (10.0, 2.5, 18.5),
    (11.0, 2.5, 18.5),
];

static LADDER: OnceLock<Vec<Scenario>> = OnceLock::new();

/// The process-wide ten-rung ladder (ids 1-10). Read-only.
pub fn stake_ladder() -> &'static [Scenario] {
    LADDER.get_or_init(|| {
        STAKES
            .iter()
            .zip(1u32..)
            .map(|(&(safe, low, high), id)| {
                Scenario::new(id, safe, vec![Outcome::new(low, 0.5), Outcome::new(high, 0.5)])
            })
            .collect()
    })
}
