use serde::Serialize;

use crate::model::score::ScoreRecord;

/// Aggregate figures over every stored attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_games: u32,
    pub best_score: u8,
    pub average_score: u8,
    pub average_time: u32,
}

impl PlayerStats {
    /// Compute stats from stored scores. Averages are rounded to the nearest
    /// integer; everything is zero when there are no scores.
    #[must_use]
    pub fn from_scores(scores: &[ScoreRecord]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        let count = scores.len() as u64;
        let best_score = scores
            .iter()
            .map(ScoreRecord::score_percent)
            .max()
            .unwrap_or(0);
        let score_sum: u64 = scores.iter().map(|s| u64::from(s.score_percent())).sum();
        let time_sum: u64 = scores
            .iter()
            .map(|s| u64::from(s.time_used_seconds()))
            .sum();

        Self {
            total_games: u32::try_from(scores.len()).unwrap_or(u32::MAX),
            best_score,
            average_score: u8::try_from(rounded_mean(score_sum, count)).unwrap_or(100),
            average_time: u32::try_from(rounded_mean(time_sum, count)).unwrap_or(u32::MAX),
        }
    }
}

fn rounded_mean(sum: u64, count: u64) -> u64 {
    (sum * 2 + count) / (count * 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::{PlayerId, QuestionId, ScoreId};
    use crate::model::score::PlayerAnswer;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn score(correct: u32, secs: i64) -> ScoreRecord {
        let answers = (0..10)
            .map(|i| PlayerAnswer {
                question_id: QuestionId::new(i),
                selected_option_index: 0,
                is_correct: i < correct,
                elapsed_seconds: 0,
            })
            .collect();
        ScoreRecord::from_answers(
            ScoreId::generate(),
            PlayerId::new("player_1"),
            "Ada",
            10,
            answers,
            fixed_now(),
            fixed_now() + Duration::seconds(secs),
        )
        .unwrap()
    }

    #[test]
    fn empty_history_is_all_zero() {
        assert_eq!(PlayerStats::from_scores(&[]), PlayerStats::default());
    }

    #[test]
    fn aggregates_best_and_averages() {
        let scores = [score(8, 120), score(9, 180), score(7, 240)];
        let stats = PlayerStats::from_scores(&scores);
        assert_eq!(
            stats,
            PlayerStats {
                total_games: 3,
                best_score: 90,
                average_score: 80,
                average_time: 180,
            }
        );
    }

    #[test]
    fn averages_round_to_nearest() {
        let scores = [score(8, 100), score(9, 101)];
        let stats = PlayerStats::from_scores(&scores);
        assert_eq!(stats.average_score, 85);
        assert_eq!(stats.average_time, 101);
    }
}
