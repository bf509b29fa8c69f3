use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::ids::PlayerId;
use crate::model::score::ScoreRecord;

/// One row of the leaderboard.
///
/// `rank` is assigned by the ranking engine on every read and is `0` until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player_id: PlayerId,
    pub player_name: String,
    pub score_percent: u8,
    pub time_used_seconds: u32,
    pub completed_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// An unranked entry.
    #[must_use]
    pub fn new(
        player_id: PlayerId,
        player_name: impl Into<String>,
        score_percent: u8,
        time_used_seconds: u32,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            rank: 0,
            player_id,
            player_name: player_name.into(),
            score_percent,
            time_used_seconds,
            completed_at,
        }
    }

    /// Derive an unranked entry from a stored score, recomputing the
    /// percentage from the correct/total counts.
    #[must_use]
    pub fn from_score(score: &ScoreRecord) -> Self {
        Self::new(
            score.player_id().clone(),
            score.player_name(),
            score.percentage(),
            score.time_used_seconds(),
            score.completed_at(),
        )
    }

    #[must_use]
    pub fn badge(&self) -> RankBadge {
        RankBadge::for_rank(self.rank)
    }
}

/// Podium marker shown next to a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    Plain(u32),
}

impl RankBadge {
    #[must_use]
    pub fn for_rank(rank: u32) -> Self {
        match rank {
            1 => Self::Gold,
            2 => Self::Silver,
            3 => Self::Bronze,
            other => Self::Plain(other),
        }
    }
}

impl fmt::Display for RankBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankBadge::Gold => f.write_str("🥇"),
            RankBadge::Silver => f.write_str("🥈"),
            RankBadge::Bronze => f.write_str("🥉"),
            RankBadge::Plain(rank) => write!(f, "{rank}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::{QuestionId, ScoreId};
    use crate::model::score::PlayerAnswer;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn entry_from_score_recomputes_percentage() {
        let answers = vec![
            PlayerAnswer {
                question_id: QuestionId::new(1),
                selected_option_index: 2,
                is_correct: true,
                elapsed_seconds: 12,
            },
            PlayerAnswer {
                question_id: QuestionId::new(2),
                selected_option_index: 0,
                is_correct: true,
                elapsed_seconds: 30,
            },
        ];
        let score = ScoreRecord::from_answers(
            ScoreId::new("quiz_1"),
            PlayerId::new("player_1"),
            "Ada",
            3,
            answers,
            fixed_now(),
            fixed_now() + Duration::seconds(42),
        )
        .unwrap();

        let entry = LeaderboardEntry::from_score(&score);
        assert_eq!(entry.rank, 0);
        assert_eq!(entry.score_percent, 67);
        assert_eq!(entry.time_used_seconds, 42);
        assert_eq!(entry.player_name, "Ada");
    }

    #[test]
    fn podium_badges() {
        assert_eq!(RankBadge::for_rank(1), RankBadge::Gold);
        assert_eq!(RankBadge::for_rank(3), RankBadge::Bronze);
        assert_eq!(RankBadge::for_rank(4).to_string(), "4");
    }
}
