use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::heuristic::heuristic_score;
use super::ladder::{stake_ladder, Scenario};
use super::request::{GameKind, GameRequest};
use super::scoring::{
    balloon, budget, single_shot, slider, switch_point, DEFAULT_BALLOON_MAX_SAFE,
    DEFAULT_BUDGET_TOTAL, DEFAULT_SLIDER_PRIZE,
};
use super::Choice;
use crate::error::{Result, RiskError};
use crate::estimation::{EstimatorSettings, RiskIndexMapper};
use crate::monitoring::{tracing_sink, DiagnosticSink};

/// How the `risk` lottery game is turned into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotteryStrategy {
    /// Fit CRRA curvature and map it through the risk index.
    MaximumLikelihood,
    /// Average of per-round expected-value heuristics.
    ExpectedValueHeuristic,
    /// Position of the first safe pick along the ladder.
    SwitchPoint,
}

impl Default for LotteryStrategy {
    fn default() -> Self {
        LotteryStrategy::MaximumLikelihood
    }
}

impl fmt::Display for LotteryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LotteryStrategy::MaximumLikelihood => "maximum_likelihood",
            LotteryStrategy::ExpectedValueHeuristic => "expected_value_heuristic",
            LotteryStrategy::SwitchPoint => "switch_point",
        };
        f.write_str(name)
    }
}

impl FromStr for LotteryStrategy {
    type Err = RiskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "maximum_likelihood" | "mle" => Ok(LotteryStrategy::MaximumLikelihood),
            "expected_value_heuristic" | "heuristic" => {
                Ok(LotteryStrategy::ExpectedValueHeuristic)
            }
            "switch_point" => Ok(LotteryStrategy::SwitchPoint),
            other => Err(RiskError::invalid_request_error(format!(
                "unknown lottery strategy '{}'",
                other
            ))),
        }
    }
}

/// Defaults for the closed-form games when a request does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameDefaults {
    pub slider_prize: f64,
    pub balloon_max_safe: u32,
    pub budget_total: u32,
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            slider_prize: DEFAULT_SLIDER_PRIZE,
            balloon_max_safe: DEFAULT_BALLOON_MAX_SAFE,
            budget_total: DEFAULT_BUDGET_TOTAL,
        }
    }
}

/// What a request was scored as.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub game: GameKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<LotteryStrategy>,
    pub risk_score: f64,
}

/// Routes a game request to its scoring rule.
///
/// Stateless apart from read-only settings, so one instance can serve
/// concurrent callers; clones are cheap.
#[derive(Clone)]
pub struct ScoreDispatcher {
    defaults: GameDefaults,
    strategy: LotteryStrategy,
    ladder: Arc<[Scenario]>,
    mapper: RiskIndexMapper,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Default for ScoreDispatcher {
    fn default() -> Self {
        Self::new(
            GameDefaults::default(),
            EstimatorSettings::default(),
            LotteryStrategy::default(),
            tracing_sink(),
        )
    }
}

impl ScoreDispatcher {
    pub fn new(
        defaults: GameDefaults,
        estimation: EstimatorSettings,
        strategy: LotteryStrategy,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            defaults,
            strategy,
            ladder: Arc::from(stake_ladder().to_vec()),
            mapper: RiskIndexMapper::new(estimation, diagnostics.clone()),
            diagnostics,
        }
    }

    /// Replace the lottery ladder used by the `risk` game.
    pub fn with_ladder(mut self, ladder: Vec<Scenario>) -> Self {
        self.ladder = Arc::from(ladder);
        self
    }

    pub fn strategy(&self) -> LotteryStrategy {
        self.strategy
    }

    pub fn ladder(&self) -> &[Scenario] {
        &self.ladder
    }

    pub fn score(&self, request: &GameRequest) -> Result<f64> {
        self.evaluate(request).map(|outcome| outcome.risk_score)
    }

    /// Score with the request's own strategy, else the configured one.
    pub fn evaluate(&self, request: &GameRequest) -> Result<ScoreOutcome> {
        let strategy = match request {
            GameRequest::Risk {
                strategy: Some(s), ..
            } => *s,
            _ => self.strategy,
        };
        self.score_with_strategy(request, strategy)
    }

    /// Score with an explicit lottery strategy; ignored by non-lottery games.
    pub fn score_with_strategy(
        &self,
        request: &GameRequest,
        strategy: LotteryStrategy,
    ) -> Result<ScoreOutcome> {
        let game = request.kind();
        self.diagnostics
            .debug(&format!("Routing '{}' request", game));

        let (risk_score, strategy) = match request {
            GameRequest::Single { choice } => (single_shot(*choice), None),
            GameRequest::Multiple { choices } => (switch_point(choices), None),
            GameRequest::Slider { certainty, prize } => (
                slider(*certainty, prize.unwrap_or(self.defaults.slider_prize)),
                None,
            ),
            GameRequest::Balloon {
                pumps,
                popped,
                max_safe,
            } => (
                balloon(
                    *pumps,
                    *popped,
                    max_safe.unwrap_or(self.defaults.balloon_max_safe),
                ),
                None,
            ),
            GameRequest::Budget {
                risky_tokens,
                total,
            } => (
                budget(*risky_tokens, total.unwrap_or(self.defaults.budget_total)),
                None,
            ),
            GameRequest::Risk { choices, .. } => {
                (self.score_lottery(choices, strategy)?, Some(strategy))
            }
        };

        if !risk_score.is_finite() {
            return Err(RiskError::numeric_error(format!(
                "'{}' produced a non-finite score",
                game
            )));
        }

        Ok(ScoreOutcome {
            game,
            strategy,
            risk_score,
        })
    }

    /// Score a lottery choice sequence against the ladder.
    ///
    /// The sequence must be non-empty and cover the whole ladder.
    pub fn score_lottery(&self, choices: &[Choice], strategy: LotteryStrategy) -> Result<f64> {
        if choices.is_empty() {
            return Err(RiskError::empty_choices_error(
                "the risk game needs at least one choice",
            ));
        }
        if choices.len() != self.ladder.len() {
            return Err(RiskError::LengthMismatch {
                choices: choices.len(),
                scenarios: self.ladder.len(),
            });
        }

        match strategy {
            LotteryStrategy::MaximumLikelihood => Ok(self.mapper.index(choices, &self.ladder)),
            LotteryStrategy::ExpectedValueHeuristic => heuristic_score(choices, &self.ladder),
            LotteryStrategy::SwitchPoint => Ok(switch_point(choices)),
        }
    }

    /// Score on the blocking pool under a wall-clock limit.
    pub async fn score_offloaded(
        &self,
        request: GameRequest,
        timeout: Duration,
    ) -> Result<ScoreOutcome> {
        let dispatcher = self.clone();
        let handle = tokio::task::spawn_blocking(move || dispatcher.evaluate(&request));
        self.await_scoring(handle, timeout).await
    }

    async fn await_scoring(
        &self,
        handle: JoinHandle<Result<ScoreOutcome>>,
        timeout: Duration,
    ) -> Result<ScoreOutcome> {
        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => {
                self.diagnostics
                    .error(&format!("Scoring worker failed: {}", join_error));
                Err(RiskError::worker_error(join_error.to_string()))
            }
            Err(_) => {
                self.diagnostics.error(&format!(
                    "Scoring exceeded {} ms",
                    timeout.as_millis()
                ));
                Err(RiskError::Timeout(timeout.as_millis() as u64))
            }
        }
    }

    /// Score many requests concurrently; results keep input order.
    pub async fn score_batch(
        &self,
        requests: Vec<GameRequest>,
        timeout: Duration,
    ) -> Vec<Result<ScoreOutcome>> {
        join_all(
            requests
                .into_iter()
                .map(|request| self.score_offloaded(request, timeout)),
        )
        .await
    }
}
