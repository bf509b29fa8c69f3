use quiz_core::model::PlayerName;
use storage::score_store::ScoreStore;

use crate::error::PlayerError;

/// Player profile operations: display name and data reset.
#[derive(Clone)]
pub struct PlayerService {
    scores: ScoreStore,
}

impl PlayerService {
    #[must_use]
    pub fn new(scores: ScoreStore) -> Self {
        Self { scores }
    }

    /// Validate and store the display name.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::InvalidName` for a name outside 2..=20 characters,
    /// or `PlayerError::Storage` if it cannot be written.
    pub async fn save_player_name(&self, raw: &str) -> Result<PlayerName, PlayerError> {
        let name = PlayerName::parse(raw)?;
        self.scores.save_player_name(&name).await?;
        Ok(name)
    }

    /// # Errors
    ///
    /// Returns `PlayerError::Storage` if the name cannot be read.
    pub async fn player_name(&self) -> Result<Option<String>, PlayerError> {
        Ok(self.scores.player_name().await?)
    }

    /// Whether a player name has been stored. Scores alone do not count.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Storage` if the store cannot be read.
    pub async fn has_player_data(&self) -> Result<bool, PlayerError> {
        Ok(self.scores.has_player_data().await?)
    }

    /// Remove the name, the history and the cached best score.
    ///
    /// # Errors
    ///
    /// Returns `PlayerError::Storage` if the delete fails.
    pub async fn clear_all_data(&self) -> Result<(), PlayerError> {
        Ok(self.scores.clear_all_data().await?)
    }
}
