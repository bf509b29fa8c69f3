use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{PlayerId, QuestionId, ScoreId};
use crate::time::elapsed_seconds;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("a score needs at least one question")]
    NoQuestions,

    #[error("{answers} answers recorded for only {total} questions")]
    TooManyAnswers { answers: usize, total: u32 },

    #[error("correct count ({correct}) exceeds total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },

    #[error("score percent {0} is above 100")]
    PercentOutOfRange(u8),
}

/// Percentage of correct answers, rounded half up.
///
/// Returns 0 when there are no questions.
#[must_use]
pub fn score_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    let percent = (correct * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

/// One answered question inside a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAnswer {
    pub question_id: QuestionId,
    pub selected_option_index: usize,
    pub is_correct: bool,
    /// Seconds since the session started, not since the previous answer.
    pub elapsed_seconds: u32,
}

/// Persisted shape of a score record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecordData {
    pub id: ScoreId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub score_percent: u8,
    pub total_questions: u32,
    pub correct_count: u32,
    pub time_used_seconds: u32,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub answers: Vec<PlayerAnswer>,
}

/// The immutable result of a finished quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScoreRecordData", into = "ScoreRecordData")]
pub struct ScoreRecord {
    id: ScoreId,
    player_id: PlayerId,
    player_name: String,
    score_percent: u8,
    total_questions: u32,
    correct_count: u32,
    time_used_seconds: u32,
    completed_at: DateTime<Utc>,
    answers: Vec<PlayerAnswer>,
}

impl ScoreRecord {
    /// Score an attempt from the answers recorded so far.
    ///
    /// Unanswered questions are simply absent from `answers` and count
    /// against the percentage because `total_questions` stays fixed.
    ///
    /// # Errors
    ///
    /// Returns `ScoreError::NoQuestions` for an empty quiz and
    /// `ScoreError::TooManyAnswers` if more answers than questions are given.
    pub fn from_answers(
        id: ScoreId,
        player_id: PlayerId,
        player_name: impl Into<String>,
        total_questions: u32,
        answers: Vec<PlayerAnswer>,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ScoreError> {
        if total_questions == 0 {
            return Err(ScoreError::NoQuestions);
        }
        if answers.len() > total_questions as usize {
            return Err(ScoreError::TooManyAnswers {
                answers: answers.len(),
                total: total_questions,
            });
        }

        let correct = answers.iter().filter(|a| a.is_correct).count();
        let correct_count = u32::try_from(correct).unwrap_or(total_questions);

        Ok(Self {
            id,
            player_id,
            player_name: player_name.into(),
            score_percent: score_percent(correct_count, total_questions),
            total_questions,
            correct_count,
            time_used_seconds: elapsed_seconds(started_at, completed_at),
            completed_at,
            answers,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ScoreId {
        &self.id
    }

    #[must_use]
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub fn score_percent(&self) -> u8 {
        self.score_percent
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn time_used_seconds(&self) -> u32 {
        self.time_used_seconds
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn answers(&self) -> &[PlayerAnswer] {
        &self.answers
    }

    /// Percentage recomputed from the raw counts rather than the stored field.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        score_percent(self.correct_count, self.total_questions)
    }

    /// Higher score wins; on equal score the faster attempt wins.
    #[must_use]
    pub fn beats(&self, other: &ScoreRecord) -> bool {
        self.score_percent > other.score_percent
            || (self.score_percent == other.score_percent
                && self.time_used_seconds < other.time_used_seconds)
    }
}

impl TryFrom<ScoreRecordData> for ScoreRecord {
    type Error = ScoreError;

    fn try_from(data: ScoreRecordData) -> Result<Self, Self::Error> {
        if data.correct_count > data.total_questions {
            return Err(ScoreError::CorrectExceedsTotal {
                correct: data.correct_count,
                total: data.total_questions,
            });
        }
        if data.score_percent > 100 {
            return Err(ScoreError::PercentOutOfRange(data.score_percent));
        }
        if data.answers.len() > data.total_questions as usize {
            return Err(ScoreError::TooManyAnswers {
                answers: data.answers.len(),
                total: data.total_questions,
            });
        }

        Ok(Self {
            id: data.id,
            player_id: data.player_id,
            player_name: data.player_name,
            score_percent: data.score_percent,
            total_questions: data.total_questions,
            correct_count: data.correct_count,
            time_used_seconds: data.time_used_seconds,
            completed_at: data.completed_at,
            answers: data.answers,
        })
    }
}

impl From<ScoreRecord> for ScoreRecordData {
    fn from(record: ScoreRecord) -> Self {
        Self {
            id: record.id,
            player_id: record.player_id,
            player_name: record.player_name,
            score_percent: record.score_percent,
            total_questions: record.total_questions,
            correct_count: record.correct_count,
            time_used_seconds: record.time_used_seconds,
            completed_at: record.completed_at,
            answers: record.answers,
        }
    }
}
