//! History, statistics and settings bookkeeping on top of an abstract
//! async key-value store.
//!
//! The store is eventually-consistent last-write-wins; history and stats
//! are two independent writes with no cross-key transaction.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use quizsolver_core_types::{Answer, HistoryEntry, Settings, SolveError, Stats};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage keys, kept identical to the original extension schema.
pub mod keys {
    pub const LAST_ANSWER: &str = "lastAnswer";
    pub const AUTO_FILL_ENABLED: &str = "autoFillEnabled";
    pub const AUTO_SUBMIT_ENABLED: &str = "autoSubmitEnabled";
    pub const USER_NAME: &str = "userName";
    pub const SETTINGS: &str = "settings";
    pub const HISTORY: &str = "history";
    pub const STATS: &str = "stats";
}

/// Most recent entries kept in history; the oldest are evicted past this.
pub const HISTORY_CAP: usize = 50;

/// Fixed per-solve time cost charged to the running totals.
pub const SOLVE_TIME_COST_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend failure: {0}")]
    Backend(String),
    #[error("io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for SolveError {
    fn from(err: StoreError) -> Self {
        SolveError::Storage(err.to_string())
    }
}

/// Async key-value persistence boundary (get/set whole JSON values).
#[async_trait]
pub trait StoragePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Derived statistics, computed fresh on every read.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct StatsView {
    pub solved: u64,
    pub average_time_secs: u64,
    pub average_confidence: u64,
}

/// Typed facade over the raw key-value port.
pub struct SolveStore<P> {
    port: P,
}

impl<P: StoragePort> SolveStore<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub async fn last_answer(&self) -> Result<Option<Answer>, StoreError> {
        self.read_typed(keys::LAST_ANSWER).await
    }

    pub async fn set_last_answer(&self, answer: &Answer) -> Result<(), StoreError> {
        self.write_typed(keys::LAST_ANSWER, answer).await
    }

    pub async fn auto_fill_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.read_typed(keys::AUTO_FILL_ENABLED).await?.unwrap_or(false))
    }

    pub async fn set_auto_fill_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.write_typed(keys::AUTO_FILL_ENABLED, &enabled).await
    }

    pub async fn auto_submit_enabled(&self) -> Result<bool, StoreError> {
        Ok(self
            .read_typed(keys::AUTO_SUBMIT_ENABLED)
            .await?
            .unwrap_or(false))
    }

    pub async fn set_auto_submit_enabled(&self, enabled: bool) -> Result<(), StoreError> {
        self.write_typed(keys::AUTO_SUBMIT_ENABLED, &enabled).await
    }

    pub async fn user_name(&self) -> Result<Option<String>, StoreError> {
        self.read_typed(keys::USER_NAME).await
    }

    pub async fn set_user_name(&self, name: &str) -> Result<(), StoreError> {
        self.write_typed(keys::USER_NAME, &name).await
    }

    pub async fn settings(&self) -> Result<Settings, StoreError> {
        Ok(self.read_typed(keys::SETTINGS).await?.unwrap_or_default())
    }

    pub async fn set_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        self.write_typed(keys::SETTINGS, settings).await
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>, StoreError> {
        Ok(self.read_typed(keys::HISTORY).await?.unwrap_or_default())
    }

    /// Push the answer to the front and truncate to [`HISTORY_CAP`] by
    /// dropping from the tail.
    pub async fn append_history(&self, answer: &Answer) -> Result<(), StoreError> {
        let mut history = self.history().await?;
        history.insert(0, answer.clone());
        history.truncate(HISTORY_CAP);
        debug!(entries = history.len(), "history updated");
        self.write_typed(keys::HISTORY, &history).await
    }

    /// Remove the entry at `index`. Returns false when out of range.
    pub async fn delete_history(&self, index: usize) -> Result<bool, StoreError> {
        let mut history = self.history().await?;
        if index >= history.len() {
            return Ok(false);
        }
        history.remove(index);
        self.write_typed(keys::HISTORY, &history).await?;
        Ok(true)
    }

    pub async fn clear_history(&self) -> Result<(), StoreError> {
        self.port.remove(keys::HISTORY).await
    }

    pub async fn stats(&self) -> Result<Stats, StoreError> {
        Ok(self.read_typed(keys::STATS).await?.unwrap_or_default())
    }

    /// Charge one solved answer to the running totals.
    pub async fn record_solved(&self, answer: &Answer) -> Result<Stats, StoreError> {
        let mut stats = self.stats().await?;
        stats.solved += 1;
        stats.total_time += SOLVE_TIME_COST_SECS;
        stats.total_confidence += u64::from(answer.confidence);
        self.write_typed(keys::STATS, &stats).await?;
        Ok(stats)
    }

    pub async fn stats_view(&self) -> Result<StatsView, StoreError> {
        let stats = self.stats().await?;
        Ok(StatsView {
            solved: stats.solved,
            average_time_secs: stats.average_time_secs(),
            average_confidence: stats.average_confidence(),
        })
    }

    async fn read_typed<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match self.port.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn write_typed<T: serde::Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        self.port.set(key, serde_json::to_value(value)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsolver_core_types::FontSize;

    fn answer(n: usize) -> Answer {
        Answer {
            answer_part: format!("answer {n}"),
            explanation_part: "vì sao".to_string(),
            confidence: 80,
            raw_text: format!("raw {n}"),
            timestamp: format!("01/01/2026, 00:00:{n:02}"),
        }
    }

    fn store() -> SolveStore<MemoryStore> {
        SolveStore::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn absent_keys_default() {
        let store = store();
        assert!(store.last_answer().await.unwrap().is_none());
        assert!(!store.auto_fill_enabled().await.unwrap());
        assert!(!store.auto_submit_enabled().await.unwrap());
        assert!(store.user_name().await.unwrap().is_none());
        assert_eq!(store.settings().await.unwrap(), Settings::default());
        assert!(store.history().await.unwrap().is_empty());
        assert_eq!(store.stats().await.unwrap(), Stats::default());
    }

    #[tokio::test]
    async fn history_capped_at_fifty_dropping_oldest() {
        let store = store();
        for n in 0..55 {
            store.append_history(&answer(n)).await.unwrap();
        }
        let history = store.history().await.unwrap();
        assert_eq!(history.len(), HISTORY_CAP);
        // Newest first; the five oldest (0..=4) are gone.
        assert_eq!(history[0].answer_part, "answer 54");
        assert_eq!(history[49].answer_part, "answer 5");
    }

    #[tokio::test]
    async fn stats_reads_are_idempotent() {
        let store = store();
        store.record_solved(&answer(0)).await.unwrap();
        store.record_solved(&answer(1)).await.unwrap();
        let first = store.stats_view().await.unwrap();
        let second = store.stats_view().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.solved, 2);
        assert_eq!(first.average_time_secs, SOLVE_TIME_COST_SECS);
        assert_eq!(first.average_confidence, 80);
    }

    #[tokio::test]
    async fn delete_and_clear_history() {
        let store = store();
        for n in 0..3 {
            store.append_history(&answer(n)).await.unwrap();
        }
        assert!(store.delete_history(1).await.unwrap());
        assert!(!store.delete_history(9).await.unwrap());
        let history = store.history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].answer_part, "answer 2");
        assert_eq!(history[1].answer_part, "answer 0");

        store.clear_history().await.unwrap();
        assert!(store.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn settings_last_write_wins() {
        let store = store();
        store
            .set_settings(&Settings {
                dark_mode: true,
                font_size: FontSize::Small,
                api_key: None,
            })
            .await
            .unwrap();
        let custom = Settings {
            dark_mode: false,
            font_size: FontSize::Large,
            api_key: Some("override".into()),
        };
        store.set_settings(&custom).await.unwrap();
        assert_eq!(store.settings().await.unwrap(), custom);
    }
}
