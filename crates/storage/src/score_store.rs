//! Typed access to the quiz's persisted keys.

use std::sync::Arc;

use quiz_core::model::{PlayerName, ScoreRecord};

use crate::repository::{KeyValueStore, StorageError};

/// Keys the app persists under.
pub mod keys {
    pub const PLAYER_NAME: &str = "player_name";
    pub const SCORES: &str = "quiz_scores";
    pub const BEST_SCORE: &str = "best_score";

    pub const ALL: [&str; 3] = [SCORES, PLAYER_NAME, BEST_SCORE];
}

/// Score history and player name on top of a `KeyValueStore`.
///
/// `quiz_scores` holds every record as one JSON array and is the source of
/// truth. `best_score` is a convenience copy refreshed after each save.
#[derive(Clone)]
pub struct ScoreStore {
    kv: Arc<dyn KeyValueStore>,
}

impl ScoreStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the name cannot be written.
    pub async fn save_player_name(&self, name: &PlayerName) -> Result<(), StorageError> {
        self.kv.set(keys::PLAYER_NAME, name.as_str()).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the name cannot be read.
    pub async fn player_name(&self) -> Result<Option<String>, StorageError> {
        self.kv.get(keys::PLAYER_NAME).await
    }

    /// Whether a player name has been saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the name cannot be read.
    pub async fn has_player_data(&self) -> Result<bool, StorageError> {
        Ok(self.player_name().await?.is_some())
    }

    /// Every stored score in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored JSON is corrupt,
    /// or a connection error if it cannot be read.
    pub async fn all_scores(&self) -> Result<Vec<ScoreRecord>, StorageError> {
        match self.kv.get(keys::SCORES).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append a score to the history, then refresh the cached best score.
    ///
    /// Failing to refresh the cache is logged and does not fail the save.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read or written.
    pub async fn save_score(&self, score: &ScoreRecord) -> Result<(), StorageError> {
        let mut scores = self.all_scores().await?;
        scores.push(score.clone());
        let json = serde_json::to_string(&scores)?;
        self.kv.set(keys::SCORES, &json).await?;
        tracing::debug!(score_id = %score.id(), total = scores.len(), "score appended");

        if let Err(err) = self.update_best_score(score).await {
            tracing::warn!(error = %err, "failed to refresh cached best score");
        }
        Ok(())
    }

    /// Best attempt derived from the full history: highest score, then fastest.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    pub async fn best_score(&self) -> Result<Option<ScoreRecord>, StorageError> {
        let scores = self.all_scores().await?;
        Ok(scores
            .into_iter()
            .reduce(|best, current| if current.beats(&best) { current } else { best }))
    }

    /// The cached `best_score` value as last written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be read or decoded.
    pub async fn cached_best_score(&self) -> Result<Option<ScoreRecord>, StorageError> {
        match self.kv.get(keys::BEST_SCORE).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn update_best_score(&self, candidate: &ScoreRecord) -> Result<(), StorageError> {
        // An unreadable cache is overwritten rather than trusted.
        let current = self.cached_best_score().await.unwrap_or(None);
        let replace = current.is_none_or(|best| candidate.beats(&best));
        if replace {
            let json = serde_json::to_string(candidate)?;
            self.kv.set(keys::BEST_SCORE, &json).await?;
        }
        Ok(())
    }

    /// Remove the score history, player name and cached best score in one batch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch delete fails.
    pub async fn clear_all_data(&self) -> Result<(), StorageError> {
        self.kv.remove_many(&keys::ALL).await?;
        tracing::info!("cleared all quiz data");
        Ok(())
    }
}
