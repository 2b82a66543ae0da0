use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RiskError;

/// One observed binary decision in a game round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Safe,
    Risky,
}

impl Choice {
    pub fn is_risky(self) -> bool {
        matches!(self, Choice::Risky)
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Safe => write!(f, "safe"),
            Choice::Risky => write!(f, "risky"),
        }
    }
}

impl FromStr for Choice {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Choice::Safe),
            "risky" => Ok(Choice::Risky),
            other => Err(RiskError::invalid_request_error(format!(
                "expected 'safe' or 'risky', got '{}'",
                other
            ))),
        }
    }
}

/// Parse a comma separated list such as `safe,risky,risky`.
pub fn parse_choices(raw: &str) -> Result<Vec<Choice>, RiskError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',').map(str::parse).collect()
}
