use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{PlayerAnswer, PlayerId, Question, ScoreId, ScoreRecord};
use quiz_core::time::elapsed_seconds;

use super::progress::{SessionProgress, progress_percent};
use crate::error::{QuestionBankError, SessionError};

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Where a quiz attempt currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for questions.
    Loading,
    InProgress {
        question_index: usize,
        selected: Option<usize>,
        remaining_seconds: u32,
    },
    Completed(CompletionReason),
    /// Quit before finishing; no score is produced.
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    AllAnswered,
    TimedOut,
}

/// What a successful `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { question_index: usize },
    Completed(ScoreRecord),
}

/// What a successful `tick` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tick {
    Running { remaining_seconds: u32 },
    TimedOut(ScoreRecord),
}

/// Who is taking the quiz; copied onto the score record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub player_id: PlayerId,
    pub player_name: String,
}

impl PlayerIdentity {
    #[must_use]
    pub fn new(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        Self {
            player_id,
            player_name: player_name.into(),
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine for one timed quiz attempt.
///
/// Time is always passed in by the caller so the machine stays deterministic.
/// The countdown itself is driven from outside through [`QuizSession::tick`].
pub struct QuizSession {
    player: PlayerIdentity,
    questions: Vec<Question>,
    phase: QuizPhase,
    answers: Vec<PlayerAnswer>,
    started_at: Option<DateTime<Utc>>,
    result: Option<ScoreRecord>,
}

impl QuizSession {
    /// A session in `Loading`, waiting for [`load`](Self::load).
    #[must_use]
    pub fn new(player: PlayerIdentity) -> Self {
        Self {
            player,
            questions: Vec::new(),
            phase: QuizPhase::Loading,
            answers: Vec::new(),
            started_at: None,
            result: None,
        }
    }

    /// Create and immediately load a session.
    ///
    /// # Errors
    ///
    /// See [`load`](Self::load).
    pub fn start(
        player: PlayerIdentity,
        questions: Vec<Question>,
        time_limit_seconds: u32,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        let mut session = Self::new(player);
        session.load(questions, time_limit_seconds, started_at)?;
        Ok(session)
    }

    /// Enter `InProgress(0)` with a full countdown and capture the start time.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` unless the session is `Loading`,
    /// and `QuestionBankError::Empty` / `InvalidTimeLimit` for unusable input.
    pub fn load(
        &mut self,
        questions: Vec<Question>,
        time_limit_seconds: u32,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Loading {
            return Err(SessionError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(QuestionBankError::Empty.into());
        }
        if time_limit_seconds == 0 {
            return Err(QuestionBankError::InvalidTimeLimit.into());
        }

        self.questions = questions;
        self.started_at = Some(started_at);
        self.phase = QuizPhase::InProgress {
            question_index: 0,
            selected: None,
            remaining_seconds: time_limit_seconds,
        };
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn player(&self) -> &PlayerIdentity {
        &self.player
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        matches!(self.phase, QuizPhase::InProgress { .. })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, QuizPhase::Completed(_))
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn answers(&self) -> &[PlayerAnswer] {
        &self.answers
    }

    /// The score, once the session is `Completed`.
    #[must_use]
    pub fn result(&self) -> Option<&ScoreRecord> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn question_index(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::InProgress { question_index, .. } => Some(question_index),
            _ => None,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.question_index().and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        match self.phase {
            QuizPhase::InProgress { selected, .. } => selected,
            _ => None,
        }
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        match self.phase {
            QuizPhase::InProgress {
                remaining_seconds, ..
            } => remaining_seconds,
            _ => 0,
        }
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.question_index()
            .is_some_and(|i| i + 1 == self.questions.len())
    }

    /// Percent of questions passed, computed before the current one is answered.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        match self.phase {
            QuizPhase::InProgress { question_index, .. } => {
                progress_percent(question_index, self.questions.len())
            }
            QuizPhase::Completed(_) => 100,
            QuizPhase::Loading | QuizPhase::Abandoned => 0,
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let position = self.question_index().map_or(total, |i| i + 1);
        SessionProgress {
            position,
            total,
            answered: self.answers.len(),
            percent: self.progress_percent(),
            remaining_seconds: self.remaining_seconds(),
            is_complete: self.is_complete(),
        }
    }

    /// Set or change the pending choice for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside `InProgress` and
    /// `SessionError::InvalidOption` if `index` is not an option.
    pub fn select_option(&mut self, index: usize) -> Result<(), SessionError> {
        let option_count = self
            .current_question()
            .map(|q| q.options().len())
            .ok_or(SessionError::NotInProgress)?;
        if index >= option_count {
            return Err(SessionError::InvalidOption { index });
        }
        if let QuizPhase::InProgress { selected, .. } = &mut self.phase {
            *selected = Some(index);
        }
        Ok(())
    }

    /// Record the pending choice and move to the next question, completing
    /// the session after the last one.
    ///
    /// On error the session is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` if nothing is selected and
    /// `SessionError::NotInProgress` outside `InProgress`.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        let QuizPhase::InProgress {
            question_index,
            selected,
            remaining_seconds,
        } = self.phase
        else {
            return Err(SessionError::NotInProgress);
        };
        let selected = selected.ok_or(SessionError::NoSelection)?;
        let question = self
            .questions
            .get(question_index)
            .ok_or(SessionError::NotInProgress)?;
        let started_at = self.started_at.ok_or(SessionError::NotInProgress)?;

        let answer = PlayerAnswer {
            question_id: question.id(),
            selected_option_index: selected,
            is_correct: question.is_correct(selected),
            elapsed_seconds: elapsed_seconds(started_at, now),
        };

        let next_index = question_index + 1;
        if next_index < self.questions.len() {
            self.answers.push(answer);
            self.phase = QuizPhase::InProgress {
                question_index: next_index,
                selected: None,
                remaining_seconds,
            };
            return Ok(Advance::Next {
                question_index: next_index,
            });
        }

        let mut answers = self.answers.clone();
        answers.push(answer);
        let record = self.score(answers.clone(), started_at, now)?;
        self.answers = answers;
        self.finish(record.clone(), CompletionReason::AllAnswered);
        Ok(Advance::Completed(record))
    }

    /// Count down one second. At zero the session completes with whatever
    /// answers were recorded, regardless of a pending selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside `InProgress`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<Tick, SessionError> {
        let QuizPhase::InProgress {
            question_index,
            selected,
            remaining_seconds,
        } = self.phase
        else {
            return Err(SessionError::NotInProgress);
        };

        let remaining_seconds = remaining_seconds.saturating_sub(1);
        if remaining_seconds > 0 {
            self.phase = QuizPhase::InProgress {
                question_index,
                selected,
                remaining_seconds,
            };
            return Ok(Tick::Running { remaining_seconds });
        }

        let started_at = self.started_at.ok_or(SessionError::NotInProgress)?;
        let record = self.score(self.answers.clone(), started_at, now)?;
        self.finish(record.clone(), CompletionReason::TimedOut);
        Ok(Tick::TimedOut(record))
    }

    /// Abandon the attempt. No score is produced.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInProgress` outside `InProgress`.
    pub fn quit(&mut self) -> Result<(), SessionError> {
        if !self.is_in_progress() {
            return Err(SessionError::NotInProgress);
        }
        self.phase = QuizPhase::Abandoned;
        Ok(())
    }

    fn score(
        &self,
        answers: Vec<PlayerAnswer>,
        started_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ScoreRecord, SessionError> {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        Ok(ScoreRecord::from_answers(
            ScoreId::generate(),
            self.player.player_id.clone(),
            self.player.player_name.clone(),
            total,
            answers,
            started_at,
            now,
        )?)
    }

    fn finish(&mut self, record: ScoreRecord, reason: CompletionReason) {
        self.result = Some(record);
        self.phase = QuizPhase::Completed(reason);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("player", &self.player.player_id)
            .field("questions_len", &self.questions.len())
            .field("phase", &self.phase)
            .field("answers_len", &self.answers.len())
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::QuestionId;
    use quiz_core::time::fixed_now;

    fn build_question(id: u32, correct: usize) -> Question {
        let options = ["a", "b", "c", "d"].map(String::from).to_vec();
        Question::new(QuestionId::new(id), format!("Q{id}"), options, correct, "")
            .unwrap()
    }

    fn build_session(count: u32, time_limit: u32) -> QuizSession {
        let questions = (1..=count).map(|id| build_question(id, 1)).collect();
        QuizSession::start(
            PlayerIdentity::new(PlayerId::new("player_1"), "Ada"),
            questions,
            time_limit,
            fixed_now(),
        )
        .unwrap()
    }

    fn at(secs: i64) -> DateTime<Utc> {
        fixed_now() + Duration::seconds(secs)
    }

    #[test]
    fn new_session_waits_in_loading() {
        let session = QuizSession::new(PlayerIdentity::new(PlayerId::new("p"), "Ada"));
        assert_eq!(session.phase(), QuizPhase::Loading);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn load_enters_first_question_with_full_clock() {
        let session = build_session(3, 1800);
        assert_eq!(
            session.phase(),
            QuizPhase::InProgress {
                question_index: 0,
                selected: None,
                remaining_seconds: 1800,
            }
        );
        assert_eq!(session.started_at(), Some(fixed_now()));
        assert!(session.answers().is_empty());
        assert_eq!(session.progress_percent(), 0);
    }

    #[test]
    fn load_twice_is_rejected() {
        let mut session = build_session(1, 60);
        let err = session
            .load(vec![build_question(9, 0)], 60, fixed_now())
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyStarted));
    }

    #[test]
    fn load_rejects_empty_question_list() {
        let mut session = QuizSession::new(PlayerIdentity::new(PlayerId::new("p"), "Ada"));
        let err = session.load(Vec::new(), 60, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::QuestionBank(QuestionBankError::Empty)
        ));
        assert_eq!(session.phase(), QuizPhase::Loading);
    }

    #[test]
    fn all_correct_scores_one_hundred() {
        let mut session = build_session(3, 1800);
        for (i, secs) in [10, 25, 40].into_iter().enumerate() {
            session.select_option(1).unwrap();
            let step = session.advance(at(secs)).unwrap();
            if i < 2 {
                assert_eq!(step, Advance::Next { question_index: i + 1 });
            }
        }

        assert_eq!(
            session.phase(),
            QuizPhase::Completed(CompletionReason::AllAnswered)
        );
        let record = session.result().unwrap();
        assert_eq!(record.score_percent(), 100);
        assert_eq!(record.correct_count(), 3);
        assert_eq!(record.total_questions(), 3);
        assert_eq!(record.time_used_seconds(), 40);
        assert_eq!(record.answers().len(), 3);
        assert_eq!(record.player_name(), "Ada");
    }

    #[test]
    fn advance_without_selection_leaves_state_alone() {
        let mut session = build_session(3, 1800);
        session.select_option(1).unwrap();
        session.advance(at(5)).unwrap();
        let before = session.phase();

        let err = session.advance(at(6)).unwrap_err();
        assert!(matches!(err, SessionError::NoSelection));
        assert!(err.is_user_input());
        assert_eq!(session.phase(), before);
        assert_eq!(session.question_index(), Some(1));
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn selection_can_change_before_advancing() {
        let mut session = build_session(2, 1800);
        session.select_option(0).unwrap();
        session.select_option(3).unwrap();
        session.select_option(1).unwrap();
        assert_eq!(session.selected(), Some(1));

        session.advance(at(3)).unwrap();
        assert_eq!(session.selected(), None);
        let answer = &session.answers()[0];
        assert_eq!(answer.selected_option_index, 1);
        assert!(answer.is_correct);
    }

    #[test]
    fn invalid_option_is_rejected() {
        let mut session = build_session(1, 60);
        let err = session.select_option(4).unwrap_err();
        assert!(matches!(err, SessionError::InvalidOption { index: 4 }));
        assert_eq!(session.selected(), None);
    }

    #[test]
    fn wrong_answers_count_against_score() {
        let mut session = build_session(3, 1800);
        for option in [1, 0, 2] {
            session.select_option(option).unwrap();
            session.advance(at(9)).unwrap();
        }
        let record = session.result().unwrap();
        assert_eq!(record.correct_count(), 1);
        assert_eq!(record.score_percent(), 33);
        assert!(!record.answers()[1].is_correct);
    }

    #[test]
    fn elapsed_seconds_are_cumulative_from_start() {
        let mut session = build_session(2, 1800);
        session.select_option(1).unwrap();
        session.advance(at(30)).unwrap();
        session.select_option(1).unwrap();
        session.advance(at(45)).unwrap();

        let elapsed: Vec<u32> = session.answers().iter().map(|a| a.elapsed_seconds).collect();
        assert_eq!(elapsed, vec![30, 45]);
    }

    #[test]
    fn progress_tracks_question_index() {
        let mut session = build_session(4, 1800);
        assert_eq!(session.progress().percent, 0);
        assert_eq!(session.progress().position, 1);
        session.select_option(1).unwrap();
        session.advance(at(1)).unwrap();
        assert_eq!(session.progress_percent(), 25);
        assert_eq!(session.progress().answered, 1);
    }

    #[test]
    fn tick_counts_down() {
        let mut session = build_session(2, 3);
        assert_eq!(
            session.tick(at(1)).unwrap(),
            Tick::Running {
                remaining_seconds: 2
            }
        );
        assert_eq!(session.remaining_seconds(), 2);
    }

    #[test]
    fn timeout_from_first_question_scores_zero() {
        let mut session = build_session(3, 2);
        session.select_option(1).unwrap();
        session.tick(at(1)).unwrap();
        let Tick::TimedOut(record) = session.tick(at(2)).unwrap() else {
            panic!("expected timeout");
        };

        assert_eq!(
            session.phase(),
            QuizPhase::Completed(CompletionReason::TimedOut)
        );
        assert_eq!(record.correct_count(), 0);
        assert_eq!(record.score_percent(), 0);
        assert!(record.answers().is_empty());
        assert_eq!(record.time_used_seconds(), 2);
    }

    #[test]
    fn timeout_keeps_recorded_answers_and_drops_pending_choice() {
        for answered in 0..3_usize {
            let mut session = build_session(3, 5);
            for _ in 0..answered {
                session.select_option(1).unwrap();
                session.advance(at(1)).unwrap();
            }
            session.select_option(1).unwrap();

            let mut outcome = None;
            for secs in 1..=5 {
                if let Tick::TimedOut(record) = session.tick(at(secs)).unwrap() {
                    outcome = Some(record);
                }
            }

            let record = outcome.expect("countdown reached zero");
            assert_eq!(record.answers().len(), answered);
            assert_eq!(record.correct_count() as usize, answered);
            assert_eq!(record.total_questions(), 3);
            assert!(session.is_complete());
        }
    }

    #[test]
    fn finished_session_rejects_further_input() {
        let mut session = build_session(1, 60);
        session.select_option(1).unwrap();
        session.advance(at(1)).unwrap();

        assert!(matches!(
            session.select_option(0),
            Err(SessionError::NotInProgress)
        ));
        assert!(matches!(
            session.advance(at(2)),
            Err(SessionError::NotInProgress)
        ));
        assert!(matches!(session.tick(at(2)), Err(SessionError::NotInProgress)));
        assert!(matches!(session.quit(), Err(SessionError::NotInProgress)));
    }

    #[test]
    fn quit_abandons_without_score() {
        let mut session = build_session(3, 60);
        session.select_option(1).unwrap();
        session.advance(at(1)).unwrap();
        session.quit().unwrap();

        assert_eq!(session.phase(), QuizPhase::Abandoned);
        assert!(session.result().is_none());
        assert!(matches!(session.tick(at(2)), Err(SessionError::NotInProgress)));
    }
}
