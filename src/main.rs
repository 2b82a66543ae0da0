use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

use riskgauge::estimation::{index_from_rho, EstimationResult, Estimator};
use riskgauge::games::{parse_choices, stake_ladder, ScoreResponse};
use riskgauge::monitoring::{tracing_sink, JsonFileScoreRepository, ScoreRecord, ScoreRepository};
use riskgauge::{load_config, Config, GameRequest, LotteryStrategy, ScoreDispatcher};

const DEFAULT_SCORE_LOG: &str = "./logs/scores.json";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one JSON game request, or an array of them
    Score {
        /// Read requests from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
        /// Lottery strategy for `risk` requests that do not name one
        #[arg(long)]
        strategy: Option<LotteryStrategy>,
        /// Append each score to the score log
        #[arg(long)]
        record: bool,
    },
    /// Fit rho from a comma separated safe/risky sequence over the stake ladder
    Estimate {
        #[arg(long)]
        choices: String,
        #[arg(long)]
        temperature: Option<f64>,
    },
    /// Print the stake ladder
    Ladder,
    /// Print the effective configuration
    Config,
}

#[derive(Serialize)]
struct EstimateReport {
    #[serde(flatten)]
    result: EstimationResult,
    risk_index: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();
    let config = load_config().context("loading configuration failed")?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level()?)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    match cli.command {
        Some(Commands::Score {
            input,
            strategy,
            record,
        }) => run_score(config, input, strategy, record).await?,
        Some(Commands::Estimate {
            choices,
            temperature,
        }) => run_estimate(config, &choices, temperature)?,
        Some(Commands::Ladder) => {
            println!("{}", serde_json::to_string_pretty(stake_ladder())?);
        }
        Some(Commands::Config) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_score(
    config: Config,
    input: Option<PathBuf>,
    strategy: Option<LotteryStrategy>,
    record: bool,
) -> Result<()> {
    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let value: serde_json::Value = serde_json::from_str(&raw).context("input is not JSON")?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => vec![other],
    };

    let mut requests = Vec::with_capacity(items.len());
    for item in items {
        requests.push(GameRequest::from_value(item)?);
    }

    let dispatcher = ScoreDispatcher::new(
        config.games,
        config.estimation,
        strategy.unwrap_or(config.lottery_strategy),
        tracing_sink(),
    );

    let repository = match score_log_target(record, &config) {
        Some(path) => Some(JsonFileScoreRepository::new(path)?),
        None => None,
    };

    let timeout = Duration::from_millis(config.estimation_timeout_ms);
    let results = dispatcher.score_batch(requests, timeout).await;

    let mut failures = 0usize;
    for result in results {
        match result {
            Ok(outcome) => {
                info!("Scored {} with risk score: {:.4}", outcome.game, outcome.risk_score);
                let response = ScoreResponse {
                    risk_score: outcome.risk_score,
                };
                println!("{}", serde_json::to_string(&response)?);

                if let Some(repo) = &repository {
                    if let Err(e) = repo.save(ScoreRecord::from_outcome(&outcome)).await {
                        error!("Failed to record score: {}", e);
                    }
                }
            }
            Err(e) if e.is_input_error() => {
                failures += 1;
                error!("Rejected request: {}", e);
            }
            Err(e) => {
                failures += 1;
                error!("Unexpected error while scoring: {}", e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} request(s) could not be scored", failures);
    }
    Ok(())
}

fn run_estimate(mut config: Config, choices: &str, temperature: Option<f64>) -> Result<()> {
    if let Some(t) = temperature {
        config.estimation.temperature = t;
    }
    let choices = parse_choices(choices)?;

    let estimator = Estimator::new(config.estimation, tracing_sink());
    let result = estimator.fit(&choices, stake_ladder())?;
    let report = EstimateReport {
        risk_index: index_from_rho(result.rho_hat),
        result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Where `score --record` appends; nothing is recorded without the flag.
fn score_log_target(record: bool, config: &Config) -> Option<PathBuf> {
    if !record {
        return None;
    }
    Some(
        config
            .score_log_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORE_LOG)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_log_needs_record_flag() {
        let config = Config {
            score_log_path: Some(PathBuf::from("/tmp/scores.json")),
            ..Config::default()
        };
        assert_eq!(score_log_target(false, &config), None);
        assert_eq!(
            score_log_target(true, &config),
            Some(PathBuf::from("/tmp/scores.json"))
        );
        assert_eq!(
            score_log_target(true, &Config::default()),
            Some(PathBuf::from(DEFAULT_SCORE_LOG))
        );
    }
}
