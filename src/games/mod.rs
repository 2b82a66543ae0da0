pub mod choice;
pub mod dispatcher;
pub mod heuristic;
pub mod ladder;
pub mod request;
pub mod scoring;

pub use choice::{parse_choices, Choice};
pub use dispatcher::{GameDefaults, LotteryStrategy, ScoreDispatcher, ScoreOutcome};
pub use heuristic::heuristic_score;
pub use ladder::{stake_ladder, Outcome, Scenario};
pub use request::{GameKind, GameRequest, ScoreResponse};
