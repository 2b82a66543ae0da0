//! # riskgauge
//!
//! Scores a player's appetite for risk from short choice games.
//!
//! Simple games (single choice, switch point, slider, balloon, budget split)
//! have closed-form scores. The multi-round lottery game fits a CRRA
//! curvature `rho` by maximum likelihood under a logistic choice rule and maps
//! it to a `[0, 1]` risk index, or falls back to an expected-value heuristic
//! when that strategy is selected.
//!
//! Everything in [`estimation`] and [`games`] is a pure function of its
//! inputs. Logging goes through an explicitly passed
//! [`monitoring::DiagnosticSink`] and storage through a caller-owned
//! [`monitoring::ScoreRepository`].

pub mod config;
pub mod error;
pub mod estimation;
pub mod games;
pub mod monitoring;

pub use config::{load_config, Config};
pub use error::{Result, RiskError};
pub use estimation::{EstimationResult, Estimator, EstimatorSettings, RiskIndexMapper};
pub use games::{Choice, GameRequest, LotteryStrategy, Scenario, ScoreDispatcher};
