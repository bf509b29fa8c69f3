//! Leaderboard ordering.
//!
//! Entries are ordered by score (highest first), then by time used (fastest
//! first). Entries that tie on both keep their input order. Ranks are the
//! 1-based sorted position, so ties never share a rank.

use std::cmp::Ordering;

use crate::model::{LeaderboardEntry, ScoreRecord};

/// Number of rows shown on the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 20;

fn leaderboard_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score_percent
        .cmp(&a.score_percent)
        .then(a.time_used_seconds.cmp(&b.time_used_seconds))
}

/// Sort entries and assign ranks, returning new values.
#[must_use]
pub fn rank(entries: &[LeaderboardEntry]) -> Vec<LeaderboardEntry> {
    let mut ranked = entries.to_vec();
    // `sort_by` is stable, which keeps full ties in input order.
    ranked.sort_by(leaderboard_order);
    for (position, entry) in ranked.iter_mut().enumerate() {
        entry.rank = u32::try_from(position + 1).unwrap_or(u32::MAX);
    }
    ranked
}

/// Merge seed rows with recorded scores, rank everything and keep the top `limit`.
///
/// Seed rows come first so they win full ties against recorded scores.
#[must_use]
pub fn merge(
    seed: &[LeaderboardEntry],
    recorded: &[ScoreRecord],
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let combined: Vec<LeaderboardEntry> = seed
        .iter()
        .cloned()
        .chain(recorded.iter().map(LeaderboardEntry::from_score))
        .collect();
    let mut ranked = rank(&combined);
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerAnswer, PlayerId, QuestionId, ScoreId};
    use crate::seed::seed_leaderboard;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn entry(name: &str, score: u8, time: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(PlayerId::new(name), name, score, time, fixed_now())
    }

    fn scores_and_times(entries: &[LeaderboardEntry]) -> (Vec<u8>, Vec<u32>, Vec<u32>) {
        (
            entries.iter().map(|e| e.score_percent).collect(),
            entries.iter().map(|e| e.time_used_seconds).collect(),
            entries.iter().map(|e| e.rank).collect(),
        )
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn single_entry_is_rank_one() {
        let input = vec![entry("Player 1", 85, 200)];
        let ranked = rank(&input);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].player_name, "Player 1");
    }

    #[test]
    fn time_breaks_score_ties() {
        let input = vec![
            entry("Player 1", 85, 200),
            entry("Player 2", 95, 150),
            entry("Player 3", 85, 180),
        ];
        let ranked = rank(&input);
        assert_eq!(
            scores_and_times(&ranked),
            (vec![95, 85, 85], vec![150, 180, 200], vec![1, 2, 3])
        );
        assert_eq!(ranked[1].player_name, "Player 3");
        assert_eq!(ranked[2].player_name, "Player 1");
    }

    #[test]
    fn input_is_left_untouched() {
        let input = vec![entry("Player 1", 10, 5), entry("Player 2", 90, 5)];
        let _ = rank(&input);
        assert_eq!(input[0].player_name, "Player 1");
        assert_eq!(input[0].rank, 0);
    }

    #[test]
    fn full_ties_keep_input_order_with_distinct_ranks() {
        let input = vec![
            entry("first", 80, 100),
            entry("second", 80, 100),
            entry("third", 80, 100),
        ];
        let ranked = rank(&input);
        let names: Vec<_> = ranked.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert_eq!(scores_and_times(&ranked).2, vec![1, 2, 3]);
    }

    #[test]
    fn ordering_holds_for_adjacent_pairs_and_is_idempotent() {
        let input: Vec<_> = (0..40_u32)
            .map(|i| {
                let score = u8::try_from((i * 37) % 101).unwrap();
                entry(&format!("p{i}"), score, (i * 53) % 300)
            })
            .collect();
        let ranked = rank(&input);

        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.score_percent > b.score_percent
                    || (a.score_percent == b.score_percent
                        && a.time_used_seconds <= b.time_used_seconds)
            );
        }

        let again = rank(&ranked);
        assert_eq!(again, ranked);
        let expected: Vec<u32> = (1..=40).collect();
        assert_eq!(scores_and_times(&ranked).2, expected);
    }

    #[test]
    fn merge_ranks_before_truncating() {
        let seed = seed_leaderboard();
        let recorded: Vec<ScoreRecord> = (0..15)
            .map(|i| {
                let answers = (0..4)
                    .map(|q| PlayerAnswer {
                        question_id: QuestionId::new(q),
                        selected_option_index: 0,
                        is_correct: true,
                        elapsed_seconds: 0,
                    })
                    .collect();
                ScoreRecord::from_answers(
                    ScoreId::generate(),
                    PlayerId::new(format!("player_{i}")),
                    format!("Recorded {i}"),
                    4,
                    answers,
                    fixed_now(),
                    fixed_now() + Duration::seconds(60 + i),
                )
                .unwrap()
            })
            .collect();

        let board = merge(&seed, &recorded, LEADERBOARD_LIMIT);
        assert_eq!(board.len(), LEADERBOARD_LIMIT);
        // All 15 perfect scores outrank every seed row.
        assert!(board[..15].iter().all(|e| e.score_percent == 100));
        assert_eq!(board[0].time_used_seconds, 60);
        assert_eq!(board[15].score_percent, 98);
        assert_eq!(board[19].rank, 20);
    }

    #[test]
    fn merge_with_no_recorded_scores_is_ranked_seed() {
        let seed = seed_leaderboard();
        let board = merge(&seed, &[], LEADERBOARD_LIMIT);
        assert_eq!(board.len(), seed.len());
        assert_eq!(board, rank(&seed));
    }
}
