use quiz_core::model::{LeaderboardEntry, PlayerStats, ScoreRecord};
use quiz_core::ranking::{self, LEADERBOARD_LIMIT};
use quiz_core::seed::seed_leaderboard;
use storage::repository::StorageError;
use storage::score_store::ScoreStore;

/// Read-side queries over the stored score history.
///
/// History reads degrade instead of failing: a store that cannot be read
/// looks like a player with no games.
#[derive(Clone)]
pub struct StatsService {
    scores: ScoreStore,
    seed: Vec<LeaderboardEntry>,
    limit: usize,
}

impl StatsService {
    #[must_use]
    pub fn new(scores: ScoreStore) -> Self {
        Self {
            scores,
            seed: seed_leaderboard(),
            limit: LEADERBOARD_LIMIT,
        }
    }

    /// Replace the rows merged into every leaderboard.
    #[must_use]
    pub fn with_seed(mut self, seed: Vec<LeaderboardEntry>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Games played, best and average score, average time.
    pub async fn player_stats(&self) -> PlayerStats {
        PlayerStats::from_scores(&self.history().await)
    }

    /// Seed rows and recorded scores, ranked and truncated.
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        ranking::merge(&self.seed, &self.history().await, self.limit)
    }

    /// Best recorded attempt, by score then time.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the history cannot be read.
    pub async fn best_score(&self) -> Result<Option<ScoreRecord>, StorageError> {
        self.scores.best_score().await
    }

    async fn history(&self) -> Vec<ScoreRecord> {
        match self.scores.all_scores().await {
            Ok(scores) => scores,
            Err(err) => {
                tracing::warn!(error = %err, "could not read score history; treating as empty");
                Vec::new()
            }
        }
    }
}
