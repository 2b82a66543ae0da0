use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, Level};

use crate::error::{Result, RiskError};
use crate::estimation::EstimatorSettings;
use crate::games::{GameDefaults, LotteryStrategy};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub estimation: EstimatorSettings,
    pub lottery_strategy: LotteryStrategy,
    pub games: GameDefaults,

    // Runtime settings
    pub estimation_timeout_ms: u64,
    pub log_level: String,
    pub score_log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            estimation: EstimatorSettings::default(),
            lottery_strategy: LotteryStrategy::default(),
            games: GameDefaults::default(),
            estimation_timeout_ms: 2000,
            log_level: "info".to_string(),
            score_log_path: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.estimation
            .validate()
            .map_err(|e| RiskError::config_error(e.to_string()))?;
        if !(self.games.slider_prize > 0.0) || !self.games.slider_prize.is_finite() {
            return Err(RiskError::config_error("slider prize must be positive"));
        }
        if self.games.balloon_max_safe == 0 {
            return Err(RiskError::config_error("balloon max_safe must be positive"));
        }
        if self.games.budget_total == 0 {
            return Err(RiskError::config_error("budget total must be positive"));
        }
        if self.estimation_timeout_ms == 0 {
            return Err(RiskError::config_error("estimation timeout must be positive"));
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn tracing_level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| RiskError::config_error(format!("invalid log level '{}'", self.log_level)))
    }

    /// Apply `RISKGAUGE_*` overrides from any key/value source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RISKGAUGE_RHO_MIN") {
            self.estimation.rho_bounds.0 = parse_var("RISKGAUGE_RHO_MIN", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_RHO_MAX") {
            self.estimation.rho_bounds.1 = parse_var("RISKGAUGE_RHO_MAX", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_INITIAL_RHO") {
            self.estimation.initial_rho = parse_var("RISKGAUGE_INITIAL_RHO", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_TEMPERATURE") {
            self.estimation.temperature = parse_var("RISKGAUGE_TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_WEALTH_BASE") {
            self.estimation.wealth_base = Some(parse_var("RISKGAUGE_WEALTH_BASE", &v)?);
        }
        if let Some(v) = lookup("RISKGAUGE_MAX_ITERATIONS") {
            self.estimation.optimizer.max_iterations = parse_var("RISKGAUGE_MAX_ITERATIONS", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_LOTTERY_STRATEGY") {
            self.lottery_strategy = v
                .parse()
                .map_err(|e: RiskError| RiskError::config_error(e.to_string()))?;
        }
        if let Some(v) = lookup("RISKGAUGE_SLIDER_PRIZE") {
            self.games.slider_prize = parse_var("RISKGAUGE_SLIDER_PRIZE", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_BALLOON_MAX_SAFE") {
            self.games.balloon_max_safe = parse_var("RISKGAUGE_BALLOON_MAX_SAFE", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_BUDGET_TOTAL") {
            self.games.budget_total = parse_var("RISKGAUGE_BUDGET_TOTAL", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_TIMEOUT_MS") {
            self.estimation_timeout_ms = parse_var("RISKGAUGE_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("RISKGAUGE_LOG_LEVEL") {
            self.log_level = v;
        }
        if let Some(v) = lookup("RISKGAUGE_SCORE_LOG") {
            self.score_log_path = Some(PathBuf::from(v));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| RiskError::config_error(format!("{} has invalid value '{}'", name, raw)))
}

/// Defaults overridden by environment variables (after `.env` is loaded by the caller).
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();
    config.apply_overrides(|key| env::var(key).ok())?;
    config.validate()?;
    info!(
        "Loaded configuration: strategy {}, rho bounds {:?}, temperature {}",
        config.lottery_strategy, config.estimation.rho_bounds, config.estimation.temperature
    );
    Ok(config)
}
