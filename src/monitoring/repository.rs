use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::games::{GameKind, LotteryStrategy, ScoreOutcome};

/// One computed score, as handed to a repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: Uuid,
    pub game: GameKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<LotteryStrategy>,
    pub risk_score: f64,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    pub fn from_outcome(outcome: &ScoreOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            game: outcome.game,
            strategy: outcome.strategy,
            risk_score: outcome.risk_score,
            recorded_at: Utc::now(),
        }
    }
}

/// Storage for computed scores. Owned by the caller, never by the scoring core.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn save(&self, record: ScoreRecord) -> Result<()>;
    async fn list(&self) -> Result<Vec<ScoreRecord>>;
}

#[derive(Debug, Default)]
pub struct InMemoryScoreRepository {
    records: RwLock<Vec<ScoreRecord>>,
}

impl InMemoryScoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryScoreRepository {
    async fn save(&self, record: ScoreRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.records.read().await.clone())
    }
}

/// Appends records to a JSON array file.
///
/// The closing bracket is never written so the file can keep growing;
/// [`list`](ScoreRepository::list) repairs it on read.
#[derive(Debug)]
pub struct JsonFileScoreRepository {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileScoreRepository {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScoreRepository for JsonFileScoreRepository {
    async fn save(&self, record: ScoreRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        info!("Recording {} score {:.4}", record.game, record.risk_score);

        let json = serde_json::to_string_pretty(&record)?;
        // An existing but empty file still needs the opening bracket
        let has_entries = std::fs::metadata(&self.path)
            .map(|m| m.len() > 0)
            .unwrap_or(false);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if !has_entries {
            file.write_all(b"[\n")?;
        } else {
            file.write_all(b",\n")?;
        }
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<ScoreRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        let fixed_content = if !content.trim().ends_with(']') {
            format!("{}]", content)
        } else {
            content
        };

        let records: Vec<ScoreRecord> = serde_json::from_str(&fixed_content)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(score: f64) -> ScoreOutcome {
        ScoreOutcome {
            game: GameKind::Risk,
            strategy: Some(LotteryStrategy::MaximumLikelihood),
            risk_score: score,
        }
    }

    #[tokio::test]
    async fn test_in_memory_round_trip() {
        let repo = InMemoryScoreRepository::new();
        repo.save(ScoreRecord::from_outcome(&outcome(0.25))).await.unwrap();
        repo.save(ScoreRecord::from_outcome(&outcome(0.75))).await.unwrap();

        let records = repo.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].risk_score, 0.75);
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn test_json_file_append_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileScoreRepository::new(dir.path().join("nested").join("scores.json")).unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        let first = ScoreRecord::from_outcome(&outcome(0.1));
        let second = ScoreRecord {
            game: GameKind::Slider,
            strategy: None,
            ..ScoreRecord::from_outcome(&outcome(0.9))
        };
        repo.save(first.clone()).await.unwrap();
        repo.save(second.clone()).await.unwrap();

        let records = repo.list().await.unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[tokio::test]
    async fn test_json_file_starts_array_in_empty_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "").unwrap();

        let repo = JsonFileScoreRepository::new(&path).unwrap();
        assert!(repo.list().await.unwrap().is_empty());

        let record = ScoreRecord::from_outcome(&outcome(0.4));
        repo.save(record.clone()).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n"));
        assert_eq!(repo.list().await.unwrap(), vec![record]);
    }
}
