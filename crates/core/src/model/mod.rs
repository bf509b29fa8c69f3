mod ids;
mod leaderboard;
mod player;
mod question;
mod score;
mod stats;
mod tier;

pub use ids::{ParseIdError, PlayerId, QuestionId, ScoreId};

pub use leaderboard::{LeaderboardEntry, RankBadge};
pub use player::{DEFAULT_PLAYER_NAME, PlayerName, PlayerNameError};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError};
pub use score::{PlayerAnswer, ScoreError, ScoreRecord, ScoreRecordData, score_percent};
pub use stats::PlayerStats;
pub use tier::ScoreTier;
