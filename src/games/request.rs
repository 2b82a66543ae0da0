use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Choice, LotteryStrategy};
use crate::error::{Result, RiskError};

/// Discriminator of a game request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Single,
    Multiple,
    Slider,
    Balloon,
    Budget,
    Risk,
}

impl GameKind {
    pub const ALL: [GameKind; 6] = [
        GameKind::Single,
        GameKind::Multiple,
        GameKind::Slider,
        GameKind::Balloon,
        GameKind::Budget,
        GameKind::Risk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Single => "single",
            GameKind::Multiple => "multiple",
            GameKind::Slider => "slider",
            GameKind::Balloon => "balloon",
            GameKind::Budget => "budget",
            GameKind::Risk => "risk",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| RiskError::unknown_game_error(tag))
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game interaction, tagged by `"game"`.
///
/// Optional fields override the configured defaults for this request only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameRequest {
    Single {
        choice: Choice,
    },
    Multiple {
        choices: Vec<Choice>,
    },
    Slider {
        certainty: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prize: Option<f64>,
    },
    Balloon {
        pumps: u32,
        popped: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_safe: Option<u32>,
    },
    Budget {
        risky_tokens: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        total: Option<u32>,
    },
    Risk {
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strategy: Option<LotteryStrategy>,
    },
}

impl GameRequest {
    pub fn kind(&self) -> GameKind {
        match self {
            GameRequest::Single { .. } => GameKind::Single,
            GameRequest::Multiple { .. } => GameKind::Multiple,
            GameRequest::Slider { .. } => GameKind::Slider,
            GameRequest::Balloon { .. } => GameKind::Balloon,
            GameRequest::Budget { .. } => GameKind::Budget,
            GameRequest::Risk { .. } => GameKind::Risk,
        }
    }

    /// Decode a JSON request body.
    ///
    /// An unrecognised `"game"` tag is reported as [`RiskError::UnknownGame`]
    /// rather than a generic decode failure.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let tag = value
            .get("game")
            .and_then(|g| g.as_str())
            .ok_or_else(|| RiskError::invalid_request_error("missing string field 'game'"))?;
        let kind = GameKind::from_tag(tag)?;
        serde_json::from_value(value).map_err(|e| {
            RiskError::invalid_request_error(format!("invalid '{}' request: {}", kind, e))
        })
    }
}

/// Response body of a scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub risk_score: f64,
}
